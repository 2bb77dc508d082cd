use std::sync::Arc;

use anyhow::Context;
use carequeue::api::QueueApiClient;
use carequeue::config::ClientConfig;
use carequeue::models::{AppointmentView, QueueDetail, QueueStatus, TodayQueues};
use carequeue::pages::{self, PageOptions};
use carequeue::presentation::{
    completion_percentage, filter_by_query, filter_by_status, patient_badge, snapshot_badge,
    snapshot_progress,
};
use carequeue::token::FileTokenProvider;
use carequeue::view::{RearmPolicy, SnapshotSource, ViewPhase, ViewState};
use carequeue::{FetchError, QueueView};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Notify;

#[derive(Parser, Debug)]
#[command(
    name = "carequeue",
    version,
    about = "Watch outpatient queues live. Type `r` + Enter to refresh, `q` + Enter to quit."
)]
struct Args {
    #[command(subcommand)]
    page: Page,

    /// Case-insensitive filter on doctor, department and reason.
    #[arg(short, long, global = true, default_value = "")]
    search: String,

    /// Restart the poll timer whenever new data arrives.
    #[arg(long, global = true)]
    reset_phase: bool,
}

#[derive(Subcommand, Debug)]
enum Page {
    /// Your appointments and their queue positions.
    Appointments,
    /// Live position for one appointment.
    Appointment { id: String },
    /// Reception dashboard: every queue running today.
    Today {
        /// Only show queues in this status (e.g. in-progress).
        #[arg(long)]
        status: Option<String>,
    },
    /// One doctor's queue with its patients.
    Queue { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    carequeue::init_tracing();

    let config = ClientConfig::from_env().context("Invalid CAREQUEUE_* configuration")?;
    let tokens = Arc::new(FileTokenProvider::new(config.token_file.clone()));
    let client = QueueApiClient::new(&config, tokens).context("Failed to create API client")?;

    let logout = Arc::new(Notify::new());
    let signal = logout.clone();
    let options = PageOptions {
        rearm: if args.reset_phase {
            RearmPolicy::ResetPhase
        } else {
            RearmPolicy::Stable
        },
        on_auth_failure: Some(Arc::new(move |_: &FetchError| signal.notify_one())),
    };

    let search = args.search.clone();
    match args.page {
        Page::Appointments => {
            let view = pages::patient_queue_list(client, &options);
            watch(view, logout, move |list| render_appointments(list, &search)).await
        }
        Page::Appointment { id } => {
            let view = pages::patient_queue_detail(client, &id, &options);
            watch(view, logout, |a| render_appointments(std::slice::from_ref(a), "")).await
        }
        Page::Today { status } => {
            let status = status.map(|s| QueueStatus::parse(&s));
            let view = pages::receptionist_dashboard(client, &options);
            watch(view, logout, move |today| render_today(today, status.as_ref(), &search)).await
        }
        Page::Queue { id } => {
            let view = pages::receptionist_queue_detail(client, &id, &options);
            watch(view, logout, render_queue).await
        }
    }
}

/// Render on every applied snapshot or error change until the user quits,
/// Ctrl-C arrives, or the backend rejects the session.
async fn watch<S, R>(view: QueueView<S>, logout: Arc<Notify>, render: R) -> anyhow::Result<()>
where
    S: SnapshotSource,
    R: Fn(&S::Snapshot) -> Vec<String>,
{
    let mut rx = view.subscribe();
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut last_key = None;

    loop {
        {
            let state = rx.borrow_and_update();
            let key = render_key(&state);
            if last_key.as_ref() != Some(&key) {
                print_state(&state, &render);
                last_key = Some(key);
            }
        }

        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            line = stdin.next_line() => {
                match line.context("Failed to read stdin")?.as_deref().map(str::trim) {
                    Some("q") | None => break,
                    // Detached: progress and results arrive through `rx`.
                    Some("r") if view.state().phase() == ViewPhase::Failed => {
                        view.spawn_retry();
                    }
                    Some("r") => {
                        view.spawn_refresh();
                    }
                    Some(_) => {}
                }
            }
            _ = tokio::signal::ctrl_c() => break,
            _ = logout.notified() => {
                println!("Session rejected by the server. Sign in again and restart.");
                break;
            }
        }
    }

    view.unmount();
    Ok(())
}

fn render_key<T>(state: &ViewState<T>) -> (ViewPhase, u64, Option<String>, bool) {
    (
        state.phase(),
        state.last_applied_seq(),
        state.error().map(str::to_string),
        state.refresh_disabled(),
    )
}

fn print_state<T, R>(state: &ViewState<T>, render: &R)
where
    R: Fn(&T) -> Vec<String>,
{
    match state.phase() {
        ViewPhase::Loading => println!("Loading…"),
        ViewPhase::Failed => {
            println!("Error: {}", state.error().unwrap_or("unknown error"));
            println!("Type `r` + Enter to retry.");
        }
        ViewPhase::Ready => {
            let updated = state
                .updated_at()
                .map(|t| t.with_timezone(&chrono::Local).format("%H:%M:%S").to_string())
                .unwrap_or_default();
            let refreshing = if state.refresh_disabled() { " · refreshing…" } else { "" };
            println!("── updated {updated}{refreshing} ──");
            if let Some(snapshot) = state.snapshot() {
                for line in render(snapshot) {
                    println!("{line}");
                }
            }
            if let Some(err) = state.error() {
                println!("(could not refresh: {err})");
            }
        }
    }
}

fn render_appointments(list: &[AppointmentView], search: &str) -> Vec<String> {
    let shown = filter_by_query(list, search);
    if shown.is_empty() {
        return vec!["No appointments.".to_string()];
    }
    shown
        .into_iter()
        .map(|a| {
            let q = &a.queue;
            format!(
                "[{}] {} · {} · token #{} · serving #{} · {} ahead · wait {} · {:.0}%",
                snapshot_badge(q).label(),
                a.doctor_name().unwrap_or("Unassigned"),
                a.department().unwrap_or("-"),
                opt(q.token_number),
                opt(q.current_token),
                opt(q.patients_ahead()),
                display(q.estimated_wait_time.as_ref()),
                snapshot_progress(q),
            )
        })
        .collect()
}

fn render_today(today: &TodayQueues, status: Option<&QueueStatus>, search: &str) -> Vec<String> {
    let stats = &today.stats;
    let mut lines = vec![format!(
        "Today: {} appointments · {} waiting · {} in progress · {} completed · {} cancelled",
        stats.total_appointments, stats.waiting, stats.in_progress, stats.completed, stats.cancelled
    )];
    let by_status: Vec<_> = filter_by_status(&today.queues, status).into_iter().cloned().collect();
    for q in filter_by_query(&by_status, search) {
        let s = &q.snapshot;
        lines.push(format!(
            "[{}] {} · {} · serving #{} · {}/{} done ({:.0}%) · avg {} min",
            snapshot_badge(s).label(),
            q.doctor_name().unwrap_or("Unassigned"),
            q.department().unwrap_or("-"),
            opt(s.current_token),
            opt(s.completed_patients),
            opt(s.total_patients_in_queue),
            completion_percentage(
                s.completed_patients.unwrap_or(0),
                s.total_patients_in_queue.unwrap_or(0)
            ),
            display(s.average_consultation_time.as_ref()),
        ));
    }
    for (department, d) in &today.department_stats {
        lines.push(format!(
            "  {department}: {} total · {} waiting · {} completed",
            d.total, d.waiting, d.completed
        ));
    }
    lines
}

fn render_queue(detail: &QueueDetail) -> Vec<String> {
    let mut lines = vec![format!(
        "{} · serving #{} · {} in queue",
        detail.doctor_name().unwrap_or("Queue"),
        opt(detail.snapshot.current_token),
        detail.patients.len()
    )];
    for p in &detail.patients {
        lines.push(format!(
            "  #{:<4} {:<24} [{}]",
            opt(p.token_number),
            p.name.as_deref().unwrap_or("-"),
            patient_badge(detail, p).label()
        ));
    }
    lines
}

fn opt(value: Option<u32>) -> String {
    display(value.as_ref())
}

fn display<T: std::fmt::Display>(value: Option<&T>) -> String {
    value.map_or_else(|| "-".to_string(), ToString::to_string)
}
