//! Runtime bridge - connects the sync TUI thread with the async Tokio runtime
//!
//! The terminal loop never blocks on the network. Fetches go out as
//! [`RuntimeCommand`]s and their outcomes come back as [`RuntimeEvent`]s,
//! drained once per tick with [`RuntimeBridge::poll_events`].

use std::sync::mpsc::{self, Receiver};
use std::thread;

use serde_json::Value;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

use crate::core::{PendingFetch, Ticket};
use crate::infrastructure::api::{Executor, FetchError, RequestDescriptor};
use crate::infrastructure::runtime::worker::run_async_worker;

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone)]
pub enum RuntimeCommand {
    /// Execute a descriptor and report back under `ticket`
    Fetch {
        ticket: Ticket,
        request: RequestDescriptor,
    },
    /// Shutdown the worker
    Shutdown,
}

impl From<PendingFetch> for RuntimeCommand {
    fn from(pending: PendingFetch) -> Self {
        RuntimeCommand::Fetch {
            ticket: pending.ticket,
            request: pending.request,
        }
    }
}

/// Events sent from the async worker to the TUI
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// A fetch finished, successfully or not
    Settled {
        ticket: Ticket,
        outcome: Result<Value, FetchError>,
    },
    /// Worker loop ended unexpectedly
    Error { message: String },
}

/// Bridge between sync TUI thread and async Tokio runtime
pub struct RuntimeBridge {
    cmd_tx: UnboundedSender<RuntimeCommand>,
    evt_rx: Receiver<RuntimeEvent>,
}

impl RuntimeBridge {
    /// Start the worker thread with its own Tokio runtime
    pub fn new(executor: Executor) -> anyhow::Result<Self> {
        let (cmd_tx, cmd_rx) = unbounded_channel::<RuntimeCommand>();
        let (evt_tx, evt_rx) = mpsc::channel::<RuntimeEvent>();

        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("tokenboard-worker".to_string())
            .spawn(move || {
                rt.block_on(async {
                    if let Err(err) = run_async_worker(executor, cmd_rx, evt_tx.clone()).await {
                        let _ = evt_tx.send(RuntimeEvent::Error {
                            message: format!("Worker exited: {:#}", err),
                        });
                    }
                });
            })?;

        Ok(Self { cmd_tx, evt_rx })
    }

    /// Send a command to the async worker
    pub fn send(&self, cmd: impl Into<RuntimeCommand>) -> anyhow::Result<()> {
        self.cmd_tx
            .send(cmd.into())
            .map_err(|_| anyhow::anyhow!("Worker channel closed"))
    }

    /// Poll for events (non-blocking)
    pub fn poll_events(&self) -> Vec<RuntimeEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.evt_rx.try_recv() {
            events.push(evt);
        }
        events
    }
}

impl Drop for RuntimeBridge {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(RuntimeCommand::Shutdown);
    }
}
