pub mod config;
pub mod failover;
pub mod handlers;
pub mod job;
pub mod scheduler;
pub mod state;

use std::{io, sync::Arc, time::Duration};

use tokio::{net::TcpListener, time::sleep};
use tracing::info;

pub use config::CoordinatorConfig;
pub use job::{JobError, JobSpec};
pub use scheduler::{Scheduler, SchedulerError};

/// Atiende workers hasta que el job termina.
///
/// Lanza el barrido de leases en segundo plano y sirve el router HTTP.
/// Cuando `done()` da true, sigue atendiendo `finish_grace` para que los
/// workers que estén consultando reciban `Finish`, y después apaga todo.
pub async fn serve(
    scheduler: Arc<Scheduler>,
    listener: TcpListener,
    config: CoordinatorConfig,
) -> io::Result<()> {
    let sweeper = tokio::spawn(failover::run_sweep_loop(
        Arc::clone(&scheduler),
        config.sweep_interval,
    ));

    let app = handlers::build_router(Arc::clone(&scheduler));
    let shutdown = wait_until_done(scheduler, config.done_poll, config.finish_grace);

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await;

    sweeper.abort();
    info!("coordinador detenido");
    result
}

async fn wait_until_done(scheduler: Arc<Scheduler>, poll: Duration, grace: Duration) {
    while !scheduler.done() {
        sleep(poll).await;
    }
    info!("job terminado, apagando coordinador en {:?}", grace);
    sleep(grace).await;
}
