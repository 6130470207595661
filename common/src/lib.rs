pub mod app;
pub mod config;
pub mod files;
pub mod indexer;
pub mod job;
pub mod kv;
pub mod partition;
pub mod task;
pub mod wordcount;
pub mod worker;

pub use app::{app_by_name, MapReduceApp, APP_NAMES};
pub use job::{JobStatus, PhaseStatus};
pub use kv::KeyValue;
pub use task::{Task, TaskId, TaskKind, TaskStats};
pub use worker::{
    GetTaskReply, GetTaskRequest, ReportOutcome, ReportTaskReply, ReportTaskRequest, WorkerId,
    ROUTE_HEALTH, ROUTE_JOB_STATUS, ROUTE_NEXT_TASK, ROUTE_REPORT_TASK,
};
