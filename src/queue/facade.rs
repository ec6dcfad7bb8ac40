//! Action queue facade
//!
//! Wraps [`OrderedQueue`] with the mode policy (priority, FIFO or FILO),
//! duplicate suppression and the configured capacity. FIFO and FILO reuse
//! the priority ordering by stamping each accepted item with a synthetic
//! priority from a monotonic counter, so the storage layer stays oblivious
//! to the mode.
//!
//! All operations except `initialize` silently no-op (or report emptiness)
//! until the queue has been initialized.

use std::sync::Mutex;

use crate::core::diagnostics::{default_sink, DiagnosticRecord, Severity, SharedSink};
use crate::core::sync::handle_mutex_poison;
use crate::queue::error::QueueError;
use crate::queue::item::{QueueConfig, QueueItem, QueueMode, TaskId};
use crate::queue::storage::OrderedQueue;
use crate::signals::SignalKey;

const COMPONENT: &str = "actionq::queue::facade";

#[derive(Debug)]
struct FacadeState {
    config: QueueConfig,
    initialized: bool,
    next_fifo_priority: i32,
    next_filo_priority: i32,
}

impl FacadeState {
    fn new() -> Self {
        Self {
            config: QueueConfig::default(),
            initialized: false,
            next_fifo_priority: 0,
            next_filo_priority: i32::MAX,
        }
    }
}

/// Mode-aware queue with duplicate suppression and a configurable capacity
pub struct ActionQueue {
    state: Mutex<FacadeState>,
    storage: OrderedQueue,
    diagnostics: SharedSink,
}

impl Default for ActionQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::with_diagnostics(default_sink())
    }

    pub fn with_diagnostics(diagnostics: SharedSink) -> Self {
        Self {
            state: Mutex::new(FacadeState::new()),
            storage: OrderedQueue::with_diagnostics(diagnostics.clone()),
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

    fn lock_state(&self) -> Option<std::sync::MutexGuard<'_, FacadeState>> {
        match handle_mutex_poison(self.state.lock(), |detail| QueueError::LockPoisoned {
            detail,
        }) {
            Ok(guard) => Some(guard),
            Err(err) => {
                self.diag(Severity::Error, err.to_string());
                None
            }
        }
    }

    /// Configure the queue and reset its contents and ordering counters
    ///
    /// Safe to call again at any time; re-initializing discards all queued
    /// items and applies the new configuration.
    pub fn initialize(&self, config: QueueConfig) {
        let Some(mut state) = self.lock_state() else {
            return;
        };
        self.storage.init();
        if config.max_size > 0 {
            self.storage.set_max_size(config.max_size);
        }
        self.diag(
            Severity::Info,
            format!(
                "Queue initialized: mode={} ignore_duplicates={} max_size={}",
                config.mode, config.ignore_duplicates, config.max_size
            ),
        );
        state.config = config;
        state.next_fifo_priority = 0;
        state.next_filo_priority = i32::MAX;
        state.initialized = true;
    }

    pub fn is_initialized(&self) -> bool {
        self.lock_state().map(|state| state.initialized).unwrap_or(false)
    }

    pub fn mode(&self) -> QueueMode {
        self.lock_state()
            .map(|state| state.config.mode)
            .unwrap_or_default()
    }

    /// Accept an item into the queue
    ///
    /// Returns false when the queue is uninitialized, the item fails
    /// validation, it duplicates a queued item while duplicate suppression
    /// is on, or the configured capacity is reached. In FIFO and FILO modes
    /// the caller-supplied priority is overwritten with the synthetic
    /// ordering value.
    pub fn enqueue(&self, mut item: QueueItem) -> bool {
        // Held across the duplicate check and the insert so a concurrent
        // enqueue of the same key cannot slip between them
        let Some(mut state) = self.lock_state() else {
            return false;
        };
        if !state.initialized {
            self.diag(
                Severity::Warning,
                format!("enqueue('{}') ignored: queue not initialized", item.name),
            );
            return false;
        }
        if !item.is_valid() {
            self.diag(
                Severity::Warning,
                format!("enqueue rejected invalid item '{}'", item.name),
            );
            return false;
        }
        if state.config.max_size > 0 && self.storage.count() >= state.config.max_size {
            self.diag(
                Severity::Warning,
                format!(
                    "enqueue('{}') rejected: queue is full ({} items)",
                    item.name, state.config.max_size
                ),
            );
            return false;
        }
        if state.config.ignore_duplicates && self.storage.contains(&item) {
            self.diag(
                Severity::Debug,
                format!("enqueue('{}') suppressed: duplicate of a queued item", item.name),
            );
            return false;
        }

        match state.config.mode {
            QueueMode::Priority => {}
            QueueMode::Fifo => {
                item.priority = state.next_fifo_priority;
                state.next_fifo_priority += 1;
            }
            QueueMode::Filo => {
                item.priority = state.next_filo_priority;
                state.next_filo_priority -= 1;
            }
        }
        self.storage.enqueue(item)
    }

    /// Remove and return the next item according to the configured mode
    pub fn dequeue(&self) -> Option<QueueItem> {
        let state = self.lock_state()?;
        if !state.initialized {
            return None;
        }
        self.storage.dequeue()
    }

    /// True when the item would pass admission validation
    ///
    /// Thin delegation to [`QueueItem::is_valid`] for callers probing an
    /// item before enqueueing it; no queue state is consulted.
    pub fn validate(&self, item: &QueueItem) -> bool {
        item.is_valid()
    }

    /// True when an item with the probe's equality key is queued
    pub fn contains(&self, probe: &QueueItem) -> bool {
        self.initialized_then(|| self.storage.contains(probe))
            .unwrap_or(false)
    }

    /// Remove the first queued item matching the probe's equality key
    pub fn remove_item(&self, probe: &QueueItem) -> bool {
        self.initialized_then(|| self.storage.remove_item(probe))
            .unwrap_or(false)
    }

    pub fn find_by_task_id(&self, task_id: TaskId) -> Option<QueueItem> {
        self.initialized_then(|| self.storage.find_by_task_id(task_id))
            .flatten()
    }

    pub fn find_by_key(
        &self,
        name: &str,
        trigger_key: &SignalKey,
        is_open: bool,
    ) -> Option<QueueItem> {
        self.initialized_then(|| self.storage.find_by_key(name, trigger_key, is_open))
            .flatten()
    }

    pub fn count(&self) -> usize {
        self.initialized_then(|| self.storage.count()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn num_open(&self) -> usize {
        self.initialized_then(|| self.storage.num_open()).unwrap_or(0)
    }

    pub fn num_closed(&self) -> usize {
        self.initialized_then(|| self.storage.num_closed()).unwrap_or(0)
    }

    /// Discard all queued items and restart the ordering counters, keeping
    /// the current configuration
    pub fn reset(&self) {
        let Some(mut state) = self.lock_state() else {
            return;
        };
        if !state.initialized {
            return;
        }
        self.storage.init();
        if state.config.max_size > 0 {
            self.storage.set_max_size(state.config.max_size);
        }
        state.next_fifo_priority = 0;
        state.next_filo_priority = i32::MAX;
        self.diag(Severity::Info, "Queue reset".to_string());
    }

    /// Verify internal list consistency; see [`OrderedQueue::validate_structure`]
    pub fn validate_structure(&self) -> crate::queue::error::QueueResult<()> {
        self.storage.validate_structure()
    }

    /// Log the full queue contents at debug severity
    pub fn dump_contents(&self) {
        self.storage.dump_contents();
    }

    fn initialized_then<T>(&self, op: impl FnOnce() -> T) -> Option<T> {
        let state = self.lock_state()?;
        if !state.initialized {
            return None;
        }
        Some(op())
    }
}
