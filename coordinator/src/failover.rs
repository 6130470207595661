use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info};

use crate::scheduler::Scheduler;

/// Loop de tolerancia a fallos: cada `interval` re-encola toda tarea en
/// progreso cuyo lease venció. No hay heartbeats; un worker caído sólo se
/// nota porque su lease expira.
pub async fn run_sweep_loop(scheduler: Arc<Scheduler>, interval: Duration) {
    loop {
        sleep(interval).await;

        if scheduler.done() {
            debug!("barrido: job terminado, nada que revisar");
            continue;
        }

        let requeued = scheduler.sweep_expired();
        if requeued > 0 {
            info!("barrido periódico re-encoló {} tareas", requeued);
        }
    }
}
