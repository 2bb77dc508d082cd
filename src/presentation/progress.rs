use crate::models::QueueSnapshot;

/// Queue progress bar width in percent.
///
/// The requester's own token is the denominator, not the queue size: the
/// bar fills as serving approaches the requester. A missing or zero token
/// yields 0.
pub fn progress_percentage(current_token: Option<u32>, token_number: Option<u32>) -> f64 {
    match (current_token, token_number) {
        (Some(current), Some(token)) if token > 0 => {
            (f64::from(current) / f64::from(token) * 100.0).clamp(0.0, 100.0)
        }
        _ => 0.0,
    }
}

pub fn snapshot_progress(snapshot: &QueueSnapshot) -> f64 {
    progress_percentage(snapshot.current_token, snapshot.token_number)
}

/// Share of the day's queue already seen, for receptionist cards.
pub fn completion_percentage(completed: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (f64::from(completed) / f64::from(total) * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_quarters() {
        assert_eq!(progress_percentage(Some(9), Some(12)), 75.0);
    }

    #[test]
    fn served_is_full() {
        assert_eq!(progress_percentage(Some(12), Some(12)), 100.0);
    }

    #[test]
    fn clamped_when_current_passes_token() {
        assert_eq!(progress_percentage(Some(30), Some(12)), 100.0);
    }

    #[test]
    fn zero_or_missing_token_is_zero() {
        assert_eq!(progress_percentage(Some(5), Some(0)), 0.0);
        assert_eq!(progress_percentage(Some(5), None), 0.0);
        assert_eq!(progress_percentage(None, Some(12)), 0.0);
        assert_eq!(progress_percentage(None, None), 0.0);
    }

    #[test]
    fn always_within_bounds() {
        for token in 0..40u32 {
            for current in 0..60u32 {
                let p = progress_percentage(Some(current), Some(token));
                assert!((0.0..=100.0).contains(&p), "{current}/{token} gave {p}");
            }
        }
    }

    #[test]
    fn completion() {
        assert_eq!(completion_percentage(5, 20), 25.0);
        assert_eq!(completion_percentage(0, 0), 0.0);
    }
}
