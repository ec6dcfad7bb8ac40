//! Sequencing Tests - One Item at a Time, In Queue Order

#[cfg(test)]
mod tests {
    use crate::queue::api::{ActionQueue, QueueConfig, QueueItem, QueueMode};
    use crate::runner::api::ActionRunner;
    use crate::signals::api::{ActorId, SignalBus, SignalKey, TargetHandle, TriggerWatch};
    use std::sync::{Arc, Mutex};

    fn action_item(name: &str) -> QueueItem {
        let trigger = format!("act.{}", name);
        QueueItem::new(name, trigger.as_str())
            .with_completion(format!("{}.done", trigger), format!("{}.failed", trigger))
    }

    /// Answers every trigger with its success signal, recording the order
    /// triggers arrived in
    fn spawn_success_responder(
        bus: Arc<SignalBus>,
        target: TargetHandle,
        mut watch: TriggerWatch,
        seen: Arc<Mutex<Vec<String>>>,
    ) {
        tokio::spawn(async move {
            while let Some(trigger) = watch.recv().await {
                seen.lock().unwrap().push(trigger.key.as_str().to_string());
                bus.emit(
                    target,
                    SignalKey::new(format!("{}.done", trigger.key)),
                    None,
                );
            }
        });
    }

    #[tokio::test]
    async fn test_runner_dispatches_in_queue_order() {
        let queue = Arc::new(ActionQueue::new());
        queue.initialize(QueueConfig {
            mode: QueueMode::Fifo,
            ignore_duplicates: true,
            max_size: 0,
        });
        queue.enqueue(action_item("a"));
        queue.enqueue(action_item("b"));
        queue.enqueue(action_item("c"));

        let bus = SignalBus::new();
        let actor = ActorId::new("player-1");
        let target = bus.register_target(actor.clone());
        let watch = bus.watch_triggers(target).unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        spawn_success_responder(Arc::clone(&bus), target, watch, Arc::clone(&seen));

        let outcome = ActionRunner::new(Arc::clone(&queue), &bus, actor)
            .start()
            .finished()
            .await;

        assert_eq!(outcome, Some(true));
        assert_eq!(*seen.lock().unwrap(), vec!["act.a", "act.b", "act.c"]);
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_priority_order_drives_dispatch_order() {
        let queue = Arc::new(ActionQueue::new());
        queue.initialize(QueueConfig::default());
        queue.enqueue(action_item("low").with_priority(9));
        queue.enqueue(action_item("high").with_priority(1));

        let bus = SignalBus::new();
        let actor = ActorId::new("player-1");
        let target = bus.register_target(actor.clone());
        let watch = bus.watch_triggers(target).unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        spawn_success_responder(Arc::clone(&bus), target, watch, Arc::clone(&seen));

        let outcome = ActionRunner::new(queue, &bus, actor).start().finished().await;

        assert_eq!(outcome, Some(true));
        assert_eq!(*seen.lock().unwrap(), vec!["act.high", "act.low"]);
    }

    #[tokio::test]
    async fn test_next_trigger_waits_for_completion() {
        let queue = Arc::new(ActionQueue::new());
        queue.initialize(QueueConfig {
            mode: QueueMode::Fifo,
            ignore_duplicates: true,
            max_size: 0,
        });
        queue.enqueue(action_item("a"));
        queue.enqueue(action_item("b"));

        let bus = SignalBus::new();
        let actor = ActorId::new("player-1");
        let target = bus.register_target(actor.clone());
        let mut watch = bus.watch_triggers(target).unwrap();

        let responder_bus = Arc::clone(&bus);
        let responder = tokio::spawn(async move {
            let first = watch.recv().await.unwrap();
            assert_eq!(first.key.as_str(), "act.a");

            // The second trigger must not arrive until the first completes
            for _ in 0..10 {
                tokio::task::yield_now().await;
            }
            assert!(watch.try_recv().is_none());

            responder_bus.emit(target, SignalKey::new("act.a.done"), None);
            let second = watch.recv().await.unwrap();
            assert_eq!(second.key.as_str(), "act.b");
            responder_bus.emit(target, SignalKey::new("act.b.done"), None);
        });

        let outcome = ActionRunner::new(queue, &bus, actor).start().finished().await;
        assert_eq!(outcome, Some(true));
        responder.await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_queue_finishes_successfully() {
        let queue = Arc::new(ActionQueue::new());
        queue.initialize(QueueConfig::default());

        let bus = SignalBus::new();
        let actor = ActorId::new("player-1");
        bus.register_target(actor.clone());

        let outcome = ActionRunner::new(queue, &bus, actor).start().finished().await;
        assert_eq!(outcome, Some(true));
    }

    #[tokio::test]
    async fn test_dropped_bus_stops_without_outcome() {
        let queue = Arc::new(ActionQueue::new());
        queue.initialize(QueueConfig::default());
        queue.enqueue(action_item("a"));

        let bus = SignalBus::new();
        let actor = ActorId::new("player-1");
        bus.register_target(actor.clone());

        let runner = ActionRunner::new(queue, &bus, actor);
        drop(bus);

        assert_eq!(runner.run().await, None);
    }
}
