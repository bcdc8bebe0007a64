//! Signal handling for graceful shutdown and job-control resume

use signal_hook_tokio::Signals;
use futures::stream::StreamExt;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::tasks::AppEvent;

/// Wait for shutdown signals (SIGTERM, SIGINT)
pub async fn shutdown_signal() {
    let mut signals = match Signals::new(&[
        signal_hook::consts::SIGTERM,
        signal_hook::consts::SIGINT,
    ]) {
        Ok(signals) => signals,
        Err(e) => {
            error!("Failed to create signal handler: {}", e);
            return std::future::pending().await;
        }
    };

    while let Some(signal) = signals.next().await {
        info!("Received signal: {}", signal);
        break;
    }
}

/// Forward SIGCONT (continued after a job-control stop) as a resume event
pub async fn resume_signal_task(tx: mpsc::Sender<AppEvent>) {
    let mut signals = match Signals::new(&[signal_hook::consts::SIGCONT]) {
        Ok(signals) => signals,
        Err(e) => {
            error!("Failed to create resume signal handler: {}", e);
            return;
        }
    };

    while let Some(signal) = signals.next().await {
        info!("Received signal: {}, process continued", signal);
        if tx.send(AppEvent::Resume).await.is_err() {
            break;
        }
    }
}
