//! Await a success or fail signal for one dispatched action
//!
//! A `WaitForSignal` binds up to two subscriptions on the bus, one for the
//! success key and one for the fail key, scoped to a single target. The
//! first signal to arrive decides the outcome. A waiter whose keys are both
//! unset is inert and resolves immediately instead of blocking forever.
//!
//! Both bindings are removed when the waiter is dropped, so abandoning one
//! mid-wait leaves nothing behind on the bus.

use std::sync::Arc;

use crate::queue::QueueItem;
use crate::signals::bus::{SignalBus, Subscription};
use crate::signals::error::SignalResult;
use crate::signals::event::{Signal, TargetHandle};
use crate::signals::key::{MatchMode, SignalKey};

/// Resolution of a [`WaitForSignal::wait`] call
#[derive(Debug)]
pub enum WaitOutcome {
    /// A success or fail signal arrived
    Completed {
        success: bool,
        signal: Signal,
        /// The item the wait was created for, when known
        item: Option<QueueItem>,
        /// The subscribed key the signal matched, possibly an ancestor of
        /// the signal's own key
        matched_key: SignalKey,
        target: TargetHandle,
        /// The trigger key originally issued for the item, unset when the
        /// waiter was built from bare keys
        trigger_key: SignalKey,
    },
    /// The waiter had nothing to wait on, or every binding is gone
    Inert,
}

impl WaitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, WaitOutcome::Completed { success: true, .. })
    }
}

/// One-shot (or repeating) listener for an action's completion signals
pub struct WaitForSignal {
    success: Option<Subscription>,
    fail: Option<Subscription>,
    item: Option<QueueItem>,
    trigger_key: SignalKey,
    target: TargetHandle,
    once: bool,
}

impl WaitForSignal {
    /// Build a waiter from an item's completion keys
    pub fn for_item(
        bus: &Arc<SignalBus>,
        item: &QueueItem,
        target: TargetHandle,
        once: bool,
        mode: MatchMode,
    ) -> SignalResult<Self> {
        let mut waiter = Self::with_keys(
            bus,
            item.success_key.clone().unwrap_or_else(SignalKey::none),
            item.fail_key.clone().unwrap_or_else(SignalKey::none),
            target,
            once,
            mode,
        )?;
        waiter.item = Some(item.clone());
        waiter.trigger_key = item.trigger_key.clone();
        Ok(waiter)
    }

    /// Build a waiter from explicit success and fail keys
    ///
    /// Unset keys are skipped rather than rejected; a waiter with neither
    /// key set is inert.
    pub fn with_keys(
        bus: &Arc<SignalBus>,
        success_key: SignalKey,
        fail_key: SignalKey,
        target: TargetHandle,
        once: bool,
        mode: MatchMode,
    ) -> SignalResult<Self> {
        let success = if success_key.is_set() {
            Some(bus.subscribe(target, success_key, mode)?)
        } else {
            None
        };
        let fail = if fail_key.is_set() {
            Some(bus.subscribe(target, fail_key, mode)?)
        } else {
            None
        };
        Ok(Self {
            success,
            fail,
            item: None,
            trigger_key: SignalKey::none(),
            target,
            once,
        })
    }

    /// True while at least one completion binding is live
    pub fn is_active(&self) -> bool {
        self.success.is_some() || self.fail.is_some()
    }

    /// Await the first success or fail signal
    ///
    /// Resolves to [`WaitOutcome::Inert`] immediately when no binding is
    /// live. With `once` set, the winning signal tears both bindings down;
    /// otherwise the waiter can be awaited again.
    pub async fn wait(&mut self) -> WaitOutcome {
        if !self.is_active() {
            return WaitOutcome::Inert;
        }

        let outcome = tokio::select! {
            Some(signal) = next_signal(self.success.as_mut()) => Some((true, signal)),
            Some(signal) = next_signal(self.fail.as_mut()) => Some((false, signal)),
            else => None,
        };

        match outcome {
            Some((success, signal)) => {
                let winner = if success { &self.success } else { &self.fail };
                let matched_key = winner
                    .as_ref()
                    .map(|sub| sub.key().clone())
                    .unwrap_or_else(SignalKey::none);
                if self.once {
                    self.success = None;
                    self.fail = None;
                }
                WaitOutcome::Completed {
                    success,
                    signal,
                    item: self.item.clone(),
                    matched_key,
                    target: self.target,
                    trigger_key: self.trigger_key.clone(),
                }
            }
            // Both channels closed underneath us; the bus is gone
            None => {
                self.success = None;
                self.fail = None;
                WaitOutcome::Inert
            }
        }
    }
}

/// Resolves to None straight away for an absent binding, which disables
/// that select branch; None from a present binding means the channel closed
async fn next_signal(sub: Option<&mut Subscription>) -> Option<Signal> {
    match sub {
        Some(sub) => sub.recv().await,
        None => None,
    }
}
