//! Sequential action runner
//!
//! Drains an [`ActionQueue`] one item at a time. For each item the runner
//! dispatches its trigger key to the resolved target, then awaits the
//! matching success or fail signal before touching the next item. Per-item
//! failures are recorded in the aggregate outcome and never stop the drain;
//! only a missing prerequisite (the bus is gone) stops it, and that path
//! produces no outcome at all.
//!
//! The runner holds the bus behind `Weak` so an abandoned transport is
//! observable instead of being kept alive by the runner itself.

use std::sync::{Arc, Weak};

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::core::diagnostics::{default_sink, DiagnosticRecord, Severity, SharedSink};
use crate::queue::{ActionQueue, QueueItem};
use crate::signals::{ActorId, MatchMode, SignalBus, WaitForSignal, WaitOutcome};

const COMPONENT: &str = "actionq::runner";

/// Drives queued actions to completion, one at a time
pub struct ActionRunner {
    queue: Arc<ActionQueue>,
    bus: Weak<SignalBus>,
    actor: ActorId,
    overall_success: bool,
    diagnostics: SharedSink,
}

impl ActionRunner {
    pub fn new(queue: Arc<ActionQueue>, bus: &Arc<SignalBus>, actor: ActorId) -> Self {
        Self::with_diagnostics(queue, bus, actor, default_sink())
    }

    pub fn with_diagnostics(
        queue: Arc<ActionQueue>,
        bus: &Arc<SignalBus>,
        actor: ActorId,
        diagnostics: SharedSink,
    ) -> Self {
        Self {
            queue,
            bus: Arc::downgrade(bus),
            actor,
            overall_success: true,
            diagnostics,
        }
    }

    fn diag(&self, severity: Severity, message: String) {
        self.diagnostics.record(DiagnosticRecord {
            severity,
            component: COMPONENT,
            message,
        });
    }

    /// Drain the queue to completion
    ///
    /// Returns `Some(aggregate)` once the queue is empty, where the
    /// aggregate is true only if every item succeeded. Returns `None` when
    /// the bus went away mid-drain; no outcome is produced on that path.
    pub async fn run(mut self) -> Option<bool> {
        loop {
            // Each step goes through the runtime's task queue, so advancing
            // is never synchronous recursion and aborting the task cancels
            // the pending continuation
            tokio::task::yield_now().await;

            let Some(bus) = self.bus.upgrade() else {
                self.diag(
                    Severity::Warning,
                    format!(
                        "Signal bus is gone; runner for '{}' stopping without an outcome",
                        self.actor
                    ),
                );
                return None;
            };

            let Some(item) = self.queue.dequeue() else {
                self.diag(
                    Severity::Info,
                    format!(
                        "Queue drained for '{}': overall success = {}",
                        self.actor, self.overall_success
                    ),
                );
                return Some(self.overall_success);
            };

            if !item.trigger_key.is_set() {
                self.fail_item(&item, "no trigger key");
                continue;
            }
            let Some(target) = bus.resolve_target(&self.actor) else {
                self.fail_item(&item, "target cannot be resolved");
                continue;
            };
            if !item.can_complete() {
                self.fail_item(&item, "no completion keys");
                continue;
            }

            // Subscribe before dispatching so a synchronously emitted
            // completion cannot be missed
            let mut waiter =
                match WaitForSignal::for_item(&bus, &item, target, true, MatchMode::Exact) {
                    Ok(waiter) => waiter,
                    Err(err) => {
                        self.fail_item(&item, &err.to_string());
                        continue;
                    }
                };
            bus.dispatch_trigger(target, item.trigger_key.clone(), item.payload.clone());

            // Release our hold so dropping the bus elsewhere is observable
            // while we wait
            drop(bus);

            match waiter.wait().await {
                WaitOutcome::Completed { success: true, .. } => {
                    self.diag(Severity::Debug, format!("Item '{}' succeeded", item.name));
                }
                WaitOutcome::Completed { success: false, .. } => {
                    self.fail_item(&item, "fail signal received");
                }
                WaitOutcome::Inert => {
                    self.fail_item(&item, "completion bindings lost");
                }
            }
        }
    }

    /// Spawn the drain loop on the runtime
    pub fn start(self) -> RunnerHandle {
        let (sender, receiver) = oneshot::channel();
        let task = tokio::spawn(async move {
            if let Some(outcome) = self.run().await {
                let _ = sender.send(outcome);
            }
        });
        RunnerHandle {
            task,
            finished: receiver,
        }
    }

    fn fail_item(&mut self, item: &QueueItem, reason: &str) {
        self.overall_success = false;
        self.diag(
            Severity::Warning,
            format!("Item '{}' failed: {}", item.name, reason),
        );
    }
}

/// Handle to a spawned [`ActionRunner`]
///
/// Dropping the handle detaches the runner; it keeps draining in the
/// background. Use [`RunnerHandle::shutdown`] to stop it.
pub struct RunnerHandle {
    task: JoinHandle<()>,
    finished: oneshot::Receiver<bool>,
}

impl RunnerHandle {
    /// Await the aggregate outcome
    ///
    /// Resolves to `None` when the runner stopped without producing one,
    /// either because a prerequisite went missing or because it was shut
    /// down first.
    pub async fn finished(self) -> Option<bool> {
        self.finished.await.ok()
    }

    /// Abort the runner between items or mid-wait
    ///
    /// Cancels the pending continuation and drops any active waiter, which
    /// removes its subscriptions from the bus. Safe to call repeatedly or
    /// after the runner has already finished.
    pub fn shutdown(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
