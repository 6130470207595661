use mr_common::{
    GetTaskReply, GetTaskRequest, ReportTaskReply, ReportTaskRequest, Task, WorkerId,
    ROUTE_NEXT_TASK, ROUTE_REPORT_TASK,
};
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use thiserror::Error;

const CALL_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum RpcError {
    /// No se pudo conectar, enviar o leer la respuesta.
    #[error("error de transporte: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("el coordinador respondió con estado {0}")]
    Status(StatusCode),
    /// La respuesta no respeta el contrato (ej: tipo de tarea desconocido).
    #[error("respuesta inválida del coordinador: {0}")]
    Protocol(#[from] serde_json::Error),
}

impl RpcError {
    /// Transporte y errores 5xx son transitorios; el resto indica que
    /// worker y coordinador no hablan el mismo protocolo.
    pub fn is_fatal(&self) -> bool {
        match self {
            RpcError::Transport(_) => false,
            RpcError::Status(status) => status.is_client_error(),
            RpcError::Protocol(_) => true,
        }
    }
}

/// Cliente de las dos llamadas remotas del worker.
#[derive(Clone)]
pub struct CoordinatorClient {
    http: Client,
    base_url: String,
}

impl CoordinatorClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, RpcError> {
        let http = Client::builder().timeout(CALL_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_task(&self, worker_id: &WorkerId) -> Result<Task, RpcError> {
        let reply: GetTaskReply = self
            .call(
                ROUTE_NEXT_TASK,
                &GetTaskRequest {
                    worker_id: worker_id.clone(),
                },
            )
            .await?;
        Ok(reply.task)
    }

    pub async fn report_task(
        &self,
        worker_id: &WorkerId,
        task: &Task,
    ) -> Result<ReportTaskReply, RpcError> {
        self.call(
            ROUTE_REPORT_TASK,
            &ReportTaskRequest {
                worker_id: worker_id.clone(),
                task: task.clone(),
            },
        )
        .await
    }

    async fn call<Req, Rep>(&self, route: &str, req: &Req) -> Result<Rep, RpcError>
    where
        Req: Serialize,
        Rep: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, route);
        let resp = self.http.post(&url).json(req).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RpcError::Status(status));
        }

        // se decodifica aparte para distinguir un body inválido de un
        // error de red
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
