use futures_util::future::BoxFuture;

use crate::error::FetchError;

/// Something a view can fetch a fresh snapshot from: one authenticated
/// read that yields the parsed snapshot or a typed failure.
pub trait SnapshotSource: Send + Sync + 'static {
    type Snapshot: Clone + Send + Sync + 'static;

    /// Short label for logs, e.g. `GET /api/appointment/today`.
    fn describe(&self) -> String;

    fn fetch(&self) -> BoxFuture<'_, Result<Self::Snapshot, FetchError>>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use futures_util::FutureExt;

    use super::*;

    /// One scripted response and how long it takes to arrive.
    pub(crate) type Step<T> = (Duration, Result<T, FetchError>);

    /// Replays responses in call order. The last step repeats once the
    /// script runs out.
    pub(crate) struct ScriptedSource<T> {
        steps: Mutex<VecDeque<Step<T>>>,
        last: Mutex<Option<Step<T>>>,
        calls: AtomicUsize,
    }

    impl<T: Clone> ScriptedSource<T> {
        pub(crate) fn new(steps: Vec<Step<T>>) -> Self {
            Self {
                steps: Mutex::new(steps.into()),
                last: Mutex::new(None),
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn always(value: T) -> Self {
            Self::new(vec![(Duration::ZERO, Ok(value))])
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn next_step(&self) -> Step<T> {
            let mut steps = self.steps.lock().unwrap();
            let mut last = self.last.lock().unwrap();
            match steps.pop_front() {
                Some(step) => {
                    *last = Some(step.clone());
                    step
                }
                None => last
                    .clone()
                    .unwrap_or((Duration::ZERO, Err(FetchError::Transport("script empty".into())))),
            }
        }
    }

    impl<T: Clone + Send + Sync + 'static> SnapshotSource for ScriptedSource<T> {
        type Snapshot = T;

        fn describe(&self) -> String {
            "scripted".to_string()
        }

        fn fetch(&self) -> BoxFuture<'_, Result<T, FetchError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let (delay, result) = self.next_step();
            async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                result
            }
            .boxed()
        }
    }
}
