//! Async worker - runs in the Tokio runtime and executes fetches

use std::sync::mpsc::Sender;

use anyhow::Result;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::infrastructure::api::Executor;
use crate::infrastructure::runtime::bridge::{RuntimeCommand, RuntimeEvent};

/// Run the async worker loop.
///
/// Every fetch runs as its own task, so a slow tab never holds up another.
/// Completions are reported in the order they finish; ordering against the
/// tab state is the coordinator's job.
pub async fn run_async_worker(
    executor: Executor,
    mut cmd_rx: UnboundedReceiver<RuntimeCommand>,
    evt_tx: Sender<RuntimeEvent>,
) -> Result<()> {
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => match cmd {
                Some(RuntimeCommand::Fetch { ticket, request }) => {
                    debug!(kind = %ticket.kind, generation = ticket.generation, "fetch queued");
                    let executor = executor.clone();
                    let evt_tx = evt_tx.clone();
                    in_flight.spawn(async move {
                        let outcome = executor.execute(&request).await;
                        if evt_tx.send(RuntimeEvent::Settled { ticket, outcome }).is_err() {
                            warn!(kind = %ticket.kind, "event channel closed, dropping result");
                        }
                    });
                }
                Some(RuntimeCommand::Shutdown) | None => {
                    in_flight.abort_all();
                    return Ok(());
                }
            },
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(err) = joined {
                    warn!(error = %err, "fetch task ended abnormally");
                }
            }
        }
    }
}
