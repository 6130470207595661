pub mod config;
pub mod executor;
pub mod rpc;
pub mod worker;

pub use config::WorkerConfig;
pub use worker::{Worker, WorkerError, WorkerSummary};
