use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use mr_common::{
    GetTaskReply, GetTaskRequest, JobStatus, ReportTaskReply, ReportTaskRequest, ROUTE_HEALTH,
    ROUTE_JOB_STATUS, ROUTE_NEXT_TASK, ROUTE_REPORT_TASK,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::scheduler::Scheduler;

pub fn build_router(scheduler: Arc<Scheduler>) -> Router {
    Router::new()
        .route(ROUTE_HEALTH, get(health))
        .route(ROUTE_JOB_STATUS, get(job_status))
        .route(ROUTE_NEXT_TASK, post(get_task))
        .route(ROUTE_REPORT_TASK, post(report_task))
        .layer(TraceLayer::new_for_http())
        .with_state(scheduler)
}

/* ---------------- handlers HTTP ---------------- */

async fn health() -> &'static str {
    "ok"
}

async fn job_status(State(scheduler): State<Arc<Scheduler>>) -> Json<JobStatus> {
    Json(scheduler.status())
}

// GetTask: asigna una tarea o devuelve un centinela Wait/Finish
async fn get_task(
    State(scheduler): State<Arc<Scheduler>>,
    Json(req): Json<GetTaskRequest>,
) -> Json<GetTaskReply> {
    let task = scheduler.get_task();
    debug!("worker {} pidió tarea -> {} {}", req.worker_id, task.kind, task.id);
    Json(GetTaskReply { task })
}

// ReportTask: el worker avisa que terminó; se responde con la misma tarea
async fn report_task(
    State(scheduler): State<Arc<Scheduler>>,
    Json(req): Json<ReportTaskRequest>,
) -> Json<ReportTaskReply> {
    let outcome = scheduler.report_task(&req.task);
    debug!(
        "worker {} reportó tarea {} {} -> {:?}",
        req.worker_id, req.task.kind, req.task.id, outcome
    );
    Json(ReportTaskReply {
        task: req.task,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::JobSpec;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use mr_common::{ReportOutcome, TaskKind};
    use serde::{de::DeserializeOwned, Serialize};
    use std::time::Duration;
    use tower::ServiceExt;

    fn app() -> (Arc<Scheduler>, Router) {
        let job = JobSpec::new(vec!["a.txt".into()], 1).unwrap();
        let scheduler = Arc::new(Scheduler::new(job, Duration::from_secs(20)).unwrap());
        (Arc::clone(&scheduler), build_router(scheduler))
    }

    async fn post_json<Req: Serialize, Rep: DeserializeOwned>(
        app: &Router,
        uri: &str,
        body: &Req,
    ) -> Rep {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn worker_req() -> GetTaskRequest {
        GetTaskRequest {
            worker_id: "w-test".into(),
        }
    }

    #[tokio::test]
    async fn health_answers_ok() {
        let (_, app) = app();
        let req = Request::builder().uri(ROUTE_HEALTH).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn next_then_report_walks_the_job() {
        let (scheduler, app) = app();

        let reply: GetTaskReply = post_json(&app, ROUTE_NEXT_TASK, &worker_req()).await;
        let task = reply.task;
        assert_eq!(task.kind, TaskKind::Map);

        let reply: GetTaskReply = post_json(&app, ROUTE_NEXT_TASK, &worker_req()).await;
        assert_eq!(reply.task.kind, TaskKind::Wait);

        let reply: ReportTaskReply = post_json(
            &app,
            ROUTE_REPORT_TASK,
            &ReportTaskRequest {
                worker_id: "w-test".into(),
                task: task.clone(),
            },
        )
        .await;
        assert_eq!(reply.outcome, ReportOutcome::Accepted);
        assert_eq!(reply.task, task);
        assert!(scheduler.map_done());

        let reply: GetTaskReply = post_json(&app, ROUTE_NEXT_TASK, &worker_req()).await;
        assert_eq!(reply.task.kind, TaskKind::Reduce);
    }

    #[tokio::test]
    async fn status_reports_phase_counts() {
        let (scheduler, app) = app();
        scheduler.get_task();

        let req = Request::builder().uri(ROUTE_JOB_STATUS).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let status: JobStatus = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(status.map.total, 1);
        assert_eq!(status.map.in_progress, 1);
        assert_eq!(status.reduce.ready, 1);
        assert!(!status.done);
    }

    #[tokio::test]
    async fn malformed_body_is_rejected() {
        let (_, app) = app();
        let req = Request::builder()
            .method("POST")
            .uri(ROUTE_REPORT_TASK)
            .header("content-type", "application/json")
            .body(Body::from(r#"{"worker_id":"w","task":{"kind":"Sleep"}}"#))
            .unwrap();

        let resp = app.oneshot(req).await.unwrap();
        assert!(resp.status().is_client_error());
    }
}
