//! Ordering Tests - Verify the Three Queue Modes
//!
//! Priority mode orders by ascending priority value with stable ties;
//! FIFO and FILO derive their order from synthetic priorities stamped at
//! admission.

#[cfg(test)]
mod tests {
    use crate::queue::api::{ActionQueue, QueueConfig, QueueItem, QueueMode};

    fn queue_with_mode(mode: QueueMode) -> ActionQueue {
        let queue = ActionQueue::new();
        queue.initialize(QueueConfig {
            mode,
            ignore_duplicates: true,
            max_size: 0,
        });
        queue
    }

    fn drain_names(queue: &ActionQueue) -> Vec<String> {
        let mut names = Vec::new();
        while let Some(item) = queue.dequeue() {
            names.push(item.name);
        }
        names
    }

    #[test]
    fn test_priority_mode_orders_ascending() {
        let queue = queue_with_mode(QueueMode::Priority);

        queue.enqueue(QueueItem::new("five", "act.five").with_priority(5));
        queue.enqueue(QueueItem::new("one", "act.one").with_priority(1));
        queue.enqueue(QueueItem::new("three", "act.three").with_priority(3));

        assert_eq!(drain_names(&queue), vec!["one", "three", "five"]);
    }

    #[test]
    fn test_priority_ties_keep_insertion_order() {
        let queue = queue_with_mode(QueueMode::Priority);

        queue.enqueue(QueueItem::new("first", "act.first").with_priority(3));
        queue.enqueue(QueueItem::new("second", "act.second").with_priority(3));
        queue.enqueue(QueueItem::new("earlier", "act.earlier").with_priority(2));
        queue.enqueue(QueueItem::new("third", "act.third").with_priority(3));

        assert_eq!(
            drain_names(&queue),
            vec!["earlier", "first", "second", "third"]
        );
    }

    #[test]
    fn test_fifo_mode_preserves_arrival_order() {
        let queue = queue_with_mode(QueueMode::Fifo);

        queue.enqueue(QueueItem::new("a", "act.a"));
        queue.enqueue(QueueItem::new("b", "act.b"));
        queue.enqueue(QueueItem::new("c", "act.c"));

        assert_eq!(drain_names(&queue), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_filo_mode_reverses_arrival_order() {
        let queue = queue_with_mode(QueueMode::Filo);

        queue.enqueue(QueueItem::new("a", "act.a"));
        queue.enqueue(QueueItem::new("b", "act.b"));
        queue.enqueue(QueueItem::new("c", "act.c"));

        assert_eq!(drain_names(&queue), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_fifo_overwrites_caller_priority() {
        let queue = queue_with_mode(QueueMode::Fifo);

        // Caller priorities would reverse the order if honored
        queue.enqueue(QueueItem::new("a", "act.a").with_priority(100));
        queue.enqueue(QueueItem::new("b", "act.b").with_priority(-100));

        assert_eq!(drain_names(&queue), vec!["a", "b"]);
    }

    #[test]
    fn test_interleaved_enqueue_dequeue_in_fifo() {
        let queue = queue_with_mode(QueueMode::Fifo);

        queue.enqueue(QueueItem::new("a", "act.a"));
        queue.enqueue(QueueItem::new("b", "act.b"));
        assert_eq!(queue.dequeue().map(|item| item.name), Some("a".to_string()));

        queue.enqueue(QueueItem::new("c", "act.c"));
        assert_eq!(drain_names(&queue), vec!["b", "c"]);
    }

    #[test]
    fn test_dequeue_on_empty_queue_returns_none() {
        let queue = queue_with_mode(QueueMode::Priority);
        assert!(queue.dequeue().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_negative_priorities_order_before_zero() {
        let queue = queue_with_mode(QueueMode::Priority);

        queue.enqueue(QueueItem::new("zero", "act.zero"));
        queue.enqueue(QueueItem::new("neg", "act.neg").with_priority(-5));

        assert_eq!(drain_names(&queue), vec!["neg", "zero"]);
    }
}
