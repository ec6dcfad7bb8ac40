//! Ordered queue storage
//!
//! A doubly linked list of items kept in ascending priority order, stored in
//! an arena of nodes addressed by stable indices. Two permanent non-data
//! sentinel nodes occupy indices 0 (head) and 1 (tail); the live count is
//! always the number of nodes strictly between them.
//!
//! Every operation takes one exclusive lock for its full duration. The lock
//! is not reentrant: no operation calls another locked operation on the same
//! instance. Duplicate suppression is deliberately NOT handled here; the
//! facade owns that policy.

use std::sync::{Mutex, MutexGuard};

use crate::core::diagnostics::{default_sink, DiagnosticRecord, Severity, SharedSink};
use crate::core::sync::handle_mutex_poison;
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::item::{QueueItem, TaskId};
use crate::signals::SignalKey;

const HEAD: usize = 0;
const TAIL: usize = 1;
/// Marker for "no neighbour" on the outward side of a sentinel
const NIL: usize = usize::MAX;

/// Structural backstop; the facade's configured limit is the caller contract
const DEFAULT_MAX_SIZE: usize = 300;

const COMPONENT: &str = "actionq::queue::storage";

#[derive(Debug)]
struct Node {
    item: Option<QueueItem>,
    next: usize,
    prev: usize,
}

#[derive(Debug)]
struct ListInner {
    nodes: Vec<Node>,
    /// Indices of released nodes available for reuse
    free: Vec<usize>,
    len: usize,
    max_size: usize,
}

impl ListInner {
    fn new() -> Self {
        Self {
            nodes: vec![
                Node {
                    item: None,
                    next: TAIL,
                    prev: NIL,
                },
                Node {
                    item: None,
                    next: NIL,
                    prev: HEAD,
                },
            ],
            free: Vec::new(),
            len: 0,
            max_size: DEFAULT_MAX_SIZE,
        }
    }

    /// Drop all data nodes and relink the sentinels to each other
    fn clear(&mut self) {
        self.nodes.truncate(2);
        self.nodes[HEAD].next = TAIL;
        self.nodes[HEAD].prev = NIL;
        self.nodes[TAIL].next = NIL;
        self.nodes[TAIL].prev = HEAD;
        self.free.clear();
        self.len = 0;
    }

    fn alloc(&mut self, item: QueueItem) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx].item = Some(item);
                idx
            }
            None => {
                self.nodes.push(Node {
                    item: Some(item),
                    next: NIL,
                    prev: NIL,
                });
                self.nodes.len() - 1
            }
        }
    }

    /// Splice a freshly allocated node in before the first node whose
    /// priority exceeds it; equal priorities keep insertion order.
    fn insert_ordered(&mut self, idx: usize) {
        let priority = self.nodes[idx]
            .item
            .as_ref()
            .map(|item| item.priority)
            .unwrap_or_default();

        let mut cursor = self.nodes[HEAD].next;
        while cursor != TAIL {
            let cursor_priority = self.nodes[cursor]
                .item
                .as_ref()
                .map(|item| item.priority)
                .unwrap_or_default();
            if cursor_priority > priority {
                break;
            }
            cursor = self.nodes[cursor].next;
        }

        let prev = self.nodes[cursor].prev;
        self.nodes[idx].next = cursor;
        self.nodes[idx].prev = prev;
        self.nodes[prev].next = idx;
        self.nodes[cursor].prev = idx;
        self.len += 1;
    }

    /// Unlink a data node and return its item to the caller
    fn unlink(&mut self, idx: usize) -> Option<QueueItem> {
        debug_assert!(idx != HEAD && idx != TAIL);
        let prev = self.nodes[idx].prev;
        let next = self.nodes[idx].next;
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
        self.nodes[idx].next = NIL;
        self.nodes[idx].prev = NIL;
        self.len -= 1;
        self.free.push(idx);
        self.nodes[idx].item.take().map(|mut item| {
            item.is_enqueued = false;
            item
        })
    }

    /// Walk head to tail, calling `visit` on each live node until it
    /// returns Some
    fn scan<T>(&self, mut visit: impl FnMut(usize, &QueueItem) -> Option<T>) -> Option<T> {
        let mut cursor = self.nodes[HEAD].next;
        while cursor != TAIL {
            if let Some(item) = self.nodes[cursor].item.as_ref() {
                if let Some(found) = visit(cursor, item) {
                    return Some(found);
                }
            }
            cursor = self.nodes[cursor].next;
        }
        None
    }
}

/// Thread-safe ordered storage for queue items
pub struct OrderedQueue {
    inner: Mutex<ListInner>,
    diagnostics: SharedSink,
}

impl Default for OrderedQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderedQueue {
    pub fn new() -> Self {
        Self::with_diagnostics(default_sink())
    }

    pub fn with_diagnostics(diagnostics: SharedSink) -> Self {
        Self {
            inner: Mutex::new(ListInner::new()),
            diagnostics,
        }
    }

    fn lock(&self) -> QueueResult<MutexGuard<'_, ListInner>> {
        handle_mutex_poison(self.inner.lock(), |detail| QueueError::LockPoisoned {
            detail,
        })
    }

    fn diag(&self, severity: Severity, message: String) {
        self.diagnostics.record(DiagnosticRecord {
            severity,
            component: COMPONENT,
            message,
        });
    }

    /// Recover a guard for operations that report failure through their
    /// return value instead of an error
    fn lock_or_report(&self) -> Option<MutexGuard<'_, ListInner>> {
        match self.lock() {
            Ok(guard) => Some(guard),
            Err(err) => {
                self.diag(Severity::Error, err.to_string());
                None
            }
        }
    }

    /// Discard all nodes and reset the count; idempotent
    pub fn init(&self) {
        if let Some(mut inner) = self.lock_or_report() {
            inner.clear();
        }
    }

    /// Insert an item at its ordered position
    ///
    /// Returns false without mutating when the item fails validation or the
    /// internal size backstop is reached. The caller owns duplicate checks.
    pub fn enqueue(&self, mut item: QueueItem) -> bool {
        let Some(mut inner) = self.lock_or_report() else {
            return false;
        };

        if !item.is_valid() {
            self.diag(
                Severity::Warning,
                format!("Rejected invalid item '{}' (name or trigger key unset)", item.name),
            );
            return false;
        }

        if inner.len >= inner.max_size {
            self.diag(
                Severity::Warning,
                format!(
                    "Storage reached its maximum size ({}). Item '{}' not enqueued.",
                    inner.max_size, item.name
                ),
            );
            return false;
        }

        item.is_enqueued = true;
        let idx = inner.alloc(item);
        inner.insert_ordered(idx);
        true
    }

    /// Remove and return the head-most item, lowest priority first
    pub fn dequeue(&self) -> Option<QueueItem> {
        let mut inner = self.lock_or_report()?;
        let first = inner.nodes[HEAD].next;
        if first == TAIL {
            return None;
        }
        inner.unlink(first)
    }

    /// True when any stored item shares the probe's equality key
    pub fn contains(&self, probe: &QueueItem) -> bool {
        self.lock_or_report()
            .and_then(|inner| inner.scan(|_, item| item.matches_key(probe).then_some(())))
            .is_some()
    }

    /// Remove the first stored item matching the probe's equality key
    pub fn remove_item(&self, probe: &QueueItem) -> bool {
        let Some(mut inner) = self.lock_or_report() else {
            return false;
        };
        let found = inner.scan(|idx, item| item.matches_key(probe).then_some(idx));
        match found {
            Some(idx) => {
                inner.unlink(idx);
                true
            }
            None => false,
        }
    }

    /// First item with the given task id, in head-to-tail order
    pub fn find_by_task_id(&self, task_id: TaskId) -> Option<QueueItem> {
        let inner = self.lock_or_report()?;
        inner.scan(|_, item| (item.task_id == task_id).then(|| item.clone()))
    }

    /// First item matching the (name, trigger key, open flag) triple
    pub fn find_by_key(
        &self,
        name: &str,
        trigger_key: &SignalKey,
        is_open: bool,
    ) -> Option<QueueItem> {
        let inner = self.lock_or_report()?;
        inner.scan(|_, item| {
            (item.name == name && item.trigger_key == *trigger_key && item.is_open == is_open)
                .then(|| item.clone())
        })
    }

    pub fn count(&self) -> usize {
        self.lock_or_report().map(|inner| inner.len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Number of stored items satisfying the predicate
    pub fn num_matching(&self, predicate: impl Fn(&QueueItem) -> bool) -> usize {
        let Some(inner) = self.lock_or_report() else {
            return 0;
        };
        let mut count = 0;
        inner.scan(|_, item| {
            if predicate(item) {
                count += 1;
            }
            None::<()>
        });
        count
    }

    pub fn num_open(&self) -> usize {
        self.num_matching(|item| item.is_open)
    }

    pub fn num_closed(&self) -> usize {
        self.num_matching(|item| !item.is_open)
    }

    /// Change the internal size backstop; values of zero are ignored
    pub fn set_max_size(&self, new_size: usize) {
        if new_size == 0 {
            return;
        }
        if let Some(mut inner) = self.lock_or_report() {
            inner.max_size = new_size;
        }
    }

    pub fn max_size(&self) -> usize {
        self.lock_or_report()
            .map(|inner| inner.max_size)
            .unwrap_or(DEFAULT_MAX_SIZE)
    }

    /// Walk the list verifying sentinel linkage, bidirectional pointer
    /// consistency and count agreement
    ///
    /// Structural corruption means a bug in the queue itself, never a caller
    /// error. The first inconsistency found is reported through the
    /// diagnostic sink at error severity and returned; nothing is repaired.
    pub fn validate_structure(&self) -> QueueResult<()> {
        let inner = self.lock()?;
        let result = Self::walk_structure(&inner);
        if let Err(err) = &result {
            self.diag(Severity::Error, err.to_string());
        }
        result
    }

    fn walk_structure(inner: &ListInner) -> QueueResult<()> {
        let corrupt = |detail: String| QueueError::CorruptedStructure { detail };

        if inner.nodes.len() < 2 {
            return Err(corrupt("sentinel nodes missing".to_string()));
        }
        if inner.nodes[HEAD].prev != NIL || inner.nodes[TAIL].next != NIL {
            return Err(corrupt("sentinel outward links are not NIL".to_string()));
        }

        let mut counted = 0usize;
        let mut cursor = HEAD;
        // Bounded walk so a pointer cycle cannot hang the validator
        let max_steps = inner.nodes.len() + 1;
        for _ in 0..=max_steps {
            let next = inner.nodes[cursor].next;
            if cursor == TAIL {
                break;
            }
            if next == NIL || next >= inner.nodes.len() {
                return Err(corrupt(format!(
                    "node {} links to invalid successor {}",
                    cursor, next
                )));
            }
            if inner.nodes[next].prev != cursor {
                return Err(corrupt(format!(
                    "bidirectional inconsistency: node {} -> {} but {}.prev = {}",
                    cursor, next, next, inner.nodes[next].prev
                )));
            }
            if next != TAIL {
                if inner.nodes[next].item.is_none() {
                    return Err(corrupt(format!("linked node {} holds no item", next)));
                }
                counted += 1;
            }
            cursor = next;
        }
        if cursor != TAIL {
            return Err(corrupt("walk did not terminate at the tail sentinel".to_string()));
        }
        if counted != inner.len {
            return Err(corrupt(format!(
                "counted {} linked nodes but stored count is {}",
                counted, inner.len
            )));
        }
        Ok(())
    }

    /// Render every live node through the diagnostic sink, for debugging
    pub fn dump_contents(&self) {
        let Some(inner) = self.lock_or_report() else {
            return;
        };
        let mut index = 0usize;
        self.diag(Severity::Debug, format!("queue contents ({} items)", inner.len));
        inner.scan(|_, item| {
            self.diag(
                Severity::Debug,
                format!(
                    "  item {}: name={} trigger={} open={} priority={} task_id={}",
                    index, item.name, item.trigger_key, item.is_open, item.priority, item.task_id
                ),
            );
            index += 1;
            None::<()>
        });
    }
}
