//! The four queue pages. Each one is the same view controller pointed at
//! a different endpoint with its own cadence.

use chrono::Local;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::api::{Endpoint, QueueApiClient};
use crate::config::PageKind;
use crate::error::FetchError;
use crate::models::{AppointmentView, QueueDetail, TodayQueues};
use crate::presentation::has_same_day_entry;
use crate::view::{AuthFailureHook, QueueView, RearmPolicy, SnapshotSource, ViewOptions};

/// Knobs shared by every page.
#[derive(Clone, Default)]
pub struct PageOptions {
    pub rearm: RearmPolicy,
    pub on_auth_failure: Option<AuthFailureHook>,
}

impl PageOptions {
    fn view_options<T>(&self, page: PageKind) -> ViewOptions<T> {
        let mut options = ViewOptions::every(page.poll_interval()).with_rearm(self.rearm);
        if let Some(hook) = &self.on_auth_failure {
            options = options.on_auth_failure(hook.clone());
        }
        options
    }
}

// ═══════════════════════════════════════════════════════════
// Sources
// ═══════════════════════════════════════════════════════════

pub struct PatientAppointmentsSource {
    client: QueueApiClient,
}

impl SnapshotSource for PatientAppointmentsSource {
    type Snapshot = Vec<AppointmentView>;

    fn describe(&self) -> String {
        Endpoint::PatientAppointments.to_string()
    }

    fn fetch(&self) -> BoxFuture<'_, Result<Self::Snapshot, FetchError>> {
        async move { self.client.patient_appointments().await }.boxed()
    }
}

pub struct PatientAppointmentSource {
    client: QueueApiClient,
    appointment_id: String,
}

impl SnapshotSource for PatientAppointmentSource {
    type Snapshot = AppointmentView;

    fn describe(&self) -> String {
        Endpoint::PatientAppointmentDetail(self.appointment_id.clone()).to_string()
    }

    fn fetch(&self) -> BoxFuture<'_, Result<Self::Snapshot, FetchError>> {
        async move { self.client.patient_appointment(&self.appointment_id).await }.boxed()
    }
}

pub struct TodayQueuesSource {
    client: QueueApiClient,
}

impl SnapshotSource for TodayQueuesSource {
    type Snapshot = TodayQueues;

    fn describe(&self) -> String {
        Endpoint::TodayQueues.to_string()
    }

    fn fetch(&self) -> BoxFuture<'_, Result<Self::Snapshot, FetchError>> {
        async move { self.client.today_queues().await }.boxed()
    }
}

pub struct QueueDetailSource {
    client: QueueApiClient,
    queue_id: String,
}

impl SnapshotSource for QueueDetailSource {
    type Snapshot = QueueDetail;

    fn describe(&self) -> String {
        Endpoint::QueueDetail(self.queue_id.clone()).to_string()
    }

    fn fetch(&self) -> BoxFuture<'_, Result<Self::Snapshot, FetchError>> {
        async move { self.client.queue_detail(&self.queue_id).await }.boxed()
    }
}

// ═══════════════════════════════════════════════════════════
// Page mounts
// ═══════════════════════════════════════════════════════════

/// Patient's appointment list. Polls only while one of the appointments
/// is today and still active.
pub fn patient_queue_list(client: QueueApiClient, options: &PageOptions) -> QueueView<PatientAppointmentsSource> {
    let view_options = options
        .view_options(PageKind::PatientQueueList)
        .poll_while(|list: Option<&Vec<AppointmentView>>| {
            list.is_some_and(|l| has_same_day_entry(l, Local::now().date_naive()))
        });
    QueueView::mount(PatientAppointmentsSource { client }, view_options)
}

/// One appointment's live queue position.
pub fn patient_queue_detail(
    client: QueueApiClient,
    appointment_id: &str,
    options: &PageOptions,
) -> QueueView<PatientAppointmentSource> {
    let source = PatientAppointmentSource {
        client,
        appointment_id: appointment_id.to_string(),
    };
    QueueView::mount(source, options.view_options(PageKind::PatientQueueDetail))
}

/// All of today's queues with day and department counters.
pub fn receptionist_dashboard(client: QueueApiClient, options: &PageOptions) -> QueueView<TodayQueuesSource> {
    QueueView::mount(
        TodayQueuesSource { client },
        options.view_options(PageKind::ReceptionistDashboard),
    )
}

/// One doctor's queue with its patient list.
pub fn receptionist_queue_detail(
    client: QueueApiClient,
    queue_id: &str,
    options: &PageOptions,
) -> QueueView<QueueDetailSource> {
    let source = QueueDetailSource {
        client,
        queue_id: queue_id.to_string(),
    };
    QueueView::mount(source, options.view_options(PageKind::ReceptionistQueueDetail))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::tests::{client_for, spawn_server};
    use crate::models::QueueStatus;
    use crate::presentation::{snapshot_badge, snapshot_progress, Badge};
    use crate::view::{FetchOutcome, ViewPhase};
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn patient_detail_progress_follows_the_queue() {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = Router::new()
            .route(
                "/api/appointment/get-appoinement-detail-patient/:id",
                get(|State(hits): State<Arc<AtomicUsize>>| async move {
                    let body = if hits.fetch_add(1, Ordering::SeqCst) == 0 {
                        json!({ "appointment": {
                            "_id": "a1", "tokenNumber": 12, "currentToken": 9, "status": "scheduled"
                        }})
                    } else {
                        json!({ "appointment": {
                            "_id": "a1", "tokenNumber": 12, "currentToken": 12, "status": "completed"
                        }})
                    };
                    Json(body)
                }),
            )
            .with_state(hits.clone());
        let base = spawn_server(router).await;

        let view = patient_queue_detail(client_for(&base, "t"), "a1", &PageOptions::default());
        assert_eq!(view.loaded().await, ViewPhase::Ready);

        let first = view.snapshot().unwrap();
        assert_eq!(snapshot_progress(&first.queue), 75.0);
        assert_eq!(snapshot_badge(&first.queue), Badge::Scheduled);

        assert_eq!(view.refresh().await, FetchOutcome::Applied);
        let second = view.snapshot().unwrap();
        assert_eq!(snapshot_progress(&second.queue), 100.0);
        assert_eq!(second.queue.status, Some(QueueStatus::Completed));
        assert_eq!(snapshot_badge(&second.queue), Badge::Completed);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn dashboard_auth_failure_reaches_hook() {
        let router = Router::new().route(
            "/api/appointment/today",
            get(|| async { (StatusCode::FORBIDDEN, Json(json!({ "message": "Forbidden" }))) }),
        );
        let base = spawn_server(router).await;

        let logged_out = Arc::new(AtomicUsize::new(0));
        let counter = logged_out.clone();
        let options = PageOptions {
            on_auth_failure: Some(Arc::new(move |_: &FetchError| {
                counter.fetch_add(1, Ordering::SeqCst);
            })),
            ..Default::default()
        };

        let view = receptionist_dashboard(client_for(&base, "t"), &options);
        assert_eq!(view.loaded().await, ViewPhase::Failed);
        assert_eq!(view.state().error(), Some("Forbidden"));
        assert_eq!(logged_out.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn patient_list_without_today_entry_does_not_poll() {
        let router = Router::new().route(
            "/api/appointment/get-all-appoinement-patient",
            get(|| async {
                Json(json!({ "appointments": [
                    { "_id": "old", "date": "2001-01-01", "status": "completed" }
                ]}))
            }),
        );
        let base = spawn_server(router).await;

        let view = patient_queue_list(client_for(&base, "t"), &PageOptions::default());
        assert_eq!(view.loaded().await, ViewPhase::Ready);
        assert!(!view.is_polling());
        assert_eq!(view.snapshot().map(|l| l.len()), Some(1));
    }

    #[tokio::test]
    async fn receptionist_queue_detail_loads_patients() {
        let router = Router::new().route(
            "/api/appointment/queue/:id",
            get(|| async {
                Json(json!({ "queue": {
                    "_id": "q1", "currentToken": 1,
                    "patients": [ { "patientName": "Asha", "tokenNumber": 1, "status": "in-progress" } ]
                }}))
            }),
        );
        let base = spawn_server(router).await;

        let view = receptionist_queue_detail(client_for(&base, "t"), "q1", &PageOptions::default());
        assert_eq!(view.loaded().await, ViewPhase::Ready);
        let detail = view.snapshot().unwrap();
        assert_eq!(detail.current_patient().and_then(|p| p.name.as_deref()), Some("Asha"));
        assert!(view.is_polling());
    }
}
