//! In-process signal bus
//!
//! Connects runners to external targets. A target registers itself under an
//! [`ActorId`] and receives an opaque [`TargetHandle`]; triggers are
//! dispatched to the handle's watchers and completion signals are emitted
//! back to matching subscriptions. Delivery uses tokio unbounded channels;
//! a send into a closed channel removes that subscriber on the spot.
//!
//! Consumers hold the bus behind `Weak` where the bus outliving them is not
//! guaranteed; an upgrade failure means the transport is gone.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::core::diagnostics::{default_sink, DiagnosticRecord, Severity, SharedSink};
use crate::core::sync::handle_mutex_poison;
use crate::queue::ActionPayload;
use crate::signals::error::{SignalError, SignalResult};
use crate::signals::event::{ActorId, Signal, TargetHandle, Trigger};
use crate::signals::key::{MatchMode, SignalKey};

const COMPONENT: &str = "actionq::signals::bus";

struct SubscriberInfo {
    key: SignalKey,
    mode: MatchMode,
    target: TargetHandle,
    sender: UnboundedSender<Signal>,
}

struct WatcherInfo {
    target: TargetHandle,
    sender: UnboundedSender<Trigger>,
}

struct BusInner {
    next_id: u64,
    targets: HashMap<ActorId, TargetHandle>,
    subscribers: HashMap<u64, SubscriberInfo>,
    watchers: HashMap<u64, WatcherInfo>,
}

impl BusInner {
    fn new() -> Self {
        Self {
            next_id: 1,
            targets: HashMap::new(),
            subscribers: HashMap::new(),
            watchers: HashMap::new(),
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Registry and transport for triggers and completion signals
pub struct SignalBus {
    inner: Mutex<BusInner>,
    diagnostics: SharedSink,
}

impl SignalBus {
    pub fn new() -> Arc<Self> {
        Self::with_diagnostics(default_sink())
    }

    pub fn with_diagnostics(diagnostics: SharedSink) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(BusInner::new()),
            diagnostics,
        })
    }

    fn diag(&self, severity: Severity, message: String) {
        self.diagnostics.record(DiagnosticRecord {
            severity,
            component: COMPONENT,
            message,
        });
    }

    fn lock(&self) -> SignalResult<MutexGuard<'_, BusInner>> {
        handle_mutex_poison(self.inner.lock(), |detail| SignalError::LockPoisoned {
            detail,
        })
    }

    fn lock_or_report(&self) -> Option<MutexGuard<'_, BusInner>> {
        match self.lock() {
            Ok(guard) => Some(guard),
            Err(err) => {
                self.diag(Severity::Error, err.to_string());
                None
            }
        }
    }

    /// Register an actor as a capable target, returning its handle
    ///
    /// Registering an already known actor returns the existing handle.
    pub fn register_target(&self, actor: ActorId) -> TargetHandle {
        let Some(mut inner) = self.lock_or_report() else {
            return TargetHandle(0);
        };
        if let Some(handle) = inner.targets.get(&actor) {
            return *handle;
        }
        let handle = TargetHandle(inner.next_id());
        self.diag(
            Severity::Debug,
            format!("Registered target '{}' as {:?}", actor, handle),
        );
        inner.targets.insert(actor, handle);
        handle
    }

    /// Remove an actor from the registry along with its subscriptions and
    /// trigger watchers
    pub fn unregister_target(&self, actor: &ActorId) -> bool {
        let Some(mut inner) = self.lock_or_report() else {
            return false;
        };
        let Some(handle) = inner.targets.remove(actor) else {
            return false;
        };
        inner.subscribers.retain(|_, sub| sub.target != handle);
        inner.watchers.retain(|_, watcher| watcher.target != handle);
        self.diag(Severity::Debug, format!("Unregistered target '{}'", actor));
        true
    }

    /// Look up the handle for a registered actor
    pub fn resolve_target(&self, actor: &ActorId) -> Option<TargetHandle> {
        let inner = self.lock_or_report()?;
        inner.targets.get(actor).copied()
    }

    /// Bind a receiver for completion signals on the given key and target
    pub fn subscribe(
        self: &Arc<Self>,
        target: TargetHandle,
        key: SignalKey,
        mode: MatchMode,
    ) -> SignalResult<Subscription> {
        if !key.is_set() {
            return Err(SignalError::KeyNotSet);
        }
        let mut inner = self.lock()?;
        let id = inner.next_id();
        let (sender, receiver) = unbounded_channel();
        inner.subscribers.insert(
            id,
            SubscriberInfo {
                key: key.clone(),
                mode,
                target,
                sender,
            },
        );
        Ok(Subscription {
            id,
            key,
            target,
            bus: Arc::downgrade(self),
            receiver,
        })
    }

    fn unsubscribe(&self, id: u64) {
        if let Some(mut inner) = self.lock_or_report() {
            inner.subscribers.remove(&id);
        }
    }

    fn unwatch(&self, id: u64) {
        if let Some(mut inner) = self.lock_or_report() {
            inner.watchers.remove(&id);
        }
    }

    /// Announce a completion signal, delivering to every subscription whose
    /// target and key match
    ///
    /// Returns the number of subscriptions that received the signal.
    /// Subscribers whose receiving end is gone are removed.
    pub fn emit(
        &self,
        target: TargetHandle,
        key: SignalKey,
        payload: Option<ActionPayload>,
    ) -> usize {
        let Some(mut inner) = self.lock_or_report() else {
            return 0;
        };
        let signal = Signal::new(target, key, payload);
        let mut delivered = 0;
        let mut closed = Vec::new();
        for (id, sub) in &inner.subscribers {
            if sub.target != target || !signal.key.matches(&sub.key, sub.mode) {
                continue;
            }
            if sub.sender.send(signal.clone()).is_err() {
                closed.push(*id);
            } else {
                delivered += 1;
            }
        }
        for id in closed {
            inner.subscribers.remove(&id);
        }
        if delivered == 0 {
            self.diag(
                Severity::Debug,
                format!("Signal '{}' on {:?} had no listeners", signal.key, target),
            );
        }
        delivered
    }

    /// Receive triggers dispatched to the given target
    pub fn watch_triggers(self: &Arc<Self>, target: TargetHandle) -> SignalResult<TriggerWatch> {
        let mut inner = self.lock()?;
        let id = inner.next_id();
        let (sender, receiver) = unbounded_channel();
        inner.watchers.insert(id, WatcherInfo { target, sender });
        Ok(TriggerWatch {
            id,
            bus: Arc::downgrade(self),
            receiver,
        })
    }

    /// Fire an action request at the target's trigger watchers
    ///
    /// Fire and forget; a target with no live watcher only produces a
    /// diagnostic. Watchers whose receiving end is gone are removed.
    pub fn dispatch_trigger(
        &self,
        target: TargetHandle,
        trigger_key: SignalKey,
        payload: Option<ActionPayload>,
    ) -> usize {
        let Some(mut inner) = self.lock_or_report() else {
            return 0;
        };
        let trigger = Trigger::new(target, trigger_key, payload);
        let mut delivered = 0;
        let mut closed = Vec::new();
        for (id, watcher) in &inner.watchers {
            if watcher.target != target {
                continue;
            }
            if watcher.sender.send(trigger.clone()).is_err() {
                closed.push(*id);
            } else {
                delivered += 1;
            }
        }
        for id in closed {
            inner.watchers.remove(&id);
        }
        if delivered == 0 {
            self.diag(
                Severity::Warning,
                format!(
                    "Trigger '{}' dispatched to {:?} but nobody is watching",
                    trigger.key, target
                ),
            );
        }
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock_or_report()
            .map(|inner| inner.subscribers.len())
            .unwrap_or(0)
    }
}

/// Live binding to a signal key; receiving half of the bus channel
///
/// Dropping the subscription removes it from the bus.
pub struct Subscription {
    id: u64,
    key: SignalKey,
    target: TargetHandle,
    bus: Weak<SignalBus>,
    receiver: UnboundedReceiver<Signal>,
}

impl Subscription {
    pub fn key(&self) -> &SignalKey {
        &self.key
    }

    pub fn target(&self) -> TargetHandle {
        self.target
    }

    /// Next matching signal, or None once the bus is gone
    pub async fn recv(&mut self) -> Option<Signal> {
        self.receiver.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.unsubscribe(self.id);
        }
    }
}

/// Receiving half of a target's trigger channel
pub struct TriggerWatch {
    id: u64,
    bus: Weak<SignalBus>,
    receiver: UnboundedReceiver<Trigger>,
}

impl TriggerWatch {
    /// Next trigger dispatched to the watched target
    pub async fn recv(&mut self) -> Option<Trigger> {
        self.receiver.recv().await
    }

    /// Non-blocking variant for callers polling from synchronous code
    pub fn try_recv(&mut self) -> Option<Trigger> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for TriggerWatch {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.unwatch(self.id);
        }
    }
}
