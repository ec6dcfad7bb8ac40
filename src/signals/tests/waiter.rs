//! Waiter Tests - Completion Outcomes, Inert Waiters and Teardown

#[cfg(test)]
mod tests {
    use crate::queue::api::QueueItem;
    use crate::signals::api::{
        ActorId, MatchMode, SignalBus, SignalKey, WaitForSignal, WaitOutcome,
    };

    #[tokio::test]
    async fn test_success_signal_completes_the_wait() {
        let bus = SignalBus::new();
        let target = bus.register_target(ActorId::new("player-1"));

        let mut waiter = WaitForSignal::with_keys(
            &bus,
            SignalKey::new("act.done"),
            SignalKey::new("act.failed"),
            target,
            true,
            MatchMode::Exact,
        )
        .unwrap();

        bus.emit(target, SignalKey::new("act.done"), None);
        let outcome = waiter.wait().await;
        assert!(outcome.is_success());
        match outcome {
            WaitOutcome::Completed { matched_key, item, .. } => {
                assert_eq!(matched_key.as_str(), "act.done");
                assert!(item.is_none());
            }
            WaitOutcome::Inert => panic!("expected a completed outcome"),
        }
    }

    #[tokio::test]
    async fn test_fail_signal_reports_failure() {
        let bus = SignalBus::new();
        let target = bus.register_target(ActorId::new("player-1"));

        let mut waiter = WaitForSignal::with_keys(
            &bus,
            SignalKey::new("act.done"),
            SignalKey::new("act.failed"),
            target,
            true,
            MatchMode::Exact,
        )
        .unwrap();

        bus.emit(target, SignalKey::new("act.failed"), None);
        let outcome = waiter.wait().await;
        assert!(!outcome.is_success());
        assert!(matches!(
            outcome,
            WaitOutcome::Completed { success: false, .. }
        ));
    }

    #[tokio::test]
    async fn test_waiter_without_keys_is_inert() {
        let bus = SignalBus::new();
        let target = bus.register_target(ActorId::new("player-1"));

        let mut waiter = WaitForSignal::with_keys(
            &bus,
            SignalKey::none(),
            SignalKey::none(),
            target,
            true,
            MatchMode::Exact,
        )
        .unwrap();

        assert!(!waiter.is_active());
        assert!(matches!(waiter.wait().await, WaitOutcome::Inert));
    }

    #[tokio::test]
    async fn test_for_item_carries_item_and_trigger_key() {
        let bus = SignalBus::new();
        let target = bus.register_target(ActorId::new("player-1"));

        let queued = QueueItem::new("dodge", "act.dodge")
            .with_completion("act.dodge.done", "act.dodge.failed");
        let mut waiter =
            WaitForSignal::for_item(&bus, &queued, target, true, MatchMode::Exact).unwrap();

        bus.emit(target, SignalKey::new("act.dodge.done"), None);
        match waiter.wait().await {
            WaitOutcome::Completed {
                item, trigger_key, ..
            } => {
                assert_eq!(item.map(|item| item.name), Some("dodge".to_string()));
                assert_eq!(trigger_key.as_str(), "act.dodge");
            }
            WaitOutcome::Inert => panic!("expected a completed outcome"),
        }
    }

    #[tokio::test]
    async fn test_item_with_only_fail_key_still_waits() {
        let bus = SignalBus::new();
        let target = bus.register_target(ActorId::new("player-1"));

        let queued = QueueItem::new("dodge", "act.dodge").with_fail_key("act.dodge.failed");
        let mut waiter =
            WaitForSignal::for_item(&bus, &queued, target, true, MatchMode::Exact).unwrap();
        assert!(waiter.is_active());

        bus.emit(target, SignalKey::new("act.dodge.failed"), None);
        assert!(!waiter.wait().await.is_success());
    }

    #[tokio::test]
    async fn test_trigger_once_tears_down_after_completion() {
        let bus = SignalBus::new();
        let target = bus.register_target(ActorId::new("player-1"));

        let mut waiter = WaitForSignal::with_keys(
            &bus,
            SignalKey::new("act.done"),
            SignalKey::new("act.failed"),
            target,
            true,
            MatchMode::Exact,
        )
        .unwrap();
        assert_eq!(bus.subscriber_count(), 2);

        bus.emit(target, SignalKey::new("act.done"), None);
        waiter.wait().await;

        assert!(!waiter.is_active());
        assert_eq!(bus.subscriber_count(), 0);
        assert!(matches!(waiter.wait().await, WaitOutcome::Inert));
    }

    #[tokio::test]
    async fn test_repeating_waiter_survives_completion() {
        let bus = SignalBus::new();
        let target = bus.register_target(ActorId::new("player-1"));

        let mut waiter = WaitForSignal::with_keys(
            &bus,
            SignalKey::new("act.done"),
            SignalKey::none(),
            target,
            false,
            MatchMode::Exact,
        )
        .unwrap();

        bus.emit(target, SignalKey::new("act.done"), None);
        assert!(waiter.wait().await.is_success());

        bus.emit(target, SignalKey::new("act.done"), None);
        assert!(waiter.wait().await.is_success());
        assert!(waiter.is_active());
    }

    #[tokio::test]
    async fn test_descendant_key_reports_matched_subscription() {
        let bus = SignalBus::new();
        let target = bus.register_target(ActorId::new("player-1"));

        let mut waiter = WaitForSignal::with_keys(
            &bus,
            SignalKey::new("act.dodge"),
            SignalKey::none(),
            target,
            true,
            MatchMode::WithDescendants,
        )
        .unwrap();

        bus.emit(target, SignalKey::new("act.dodge.roll"), None);
        match waiter.wait().await {
            WaitOutcome::Completed {
                signal, matched_key, ..
            } => {
                assert_eq!(signal.key.as_str(), "act.dodge.roll");
                assert_eq!(matched_key.as_str(), "act.dodge");
            }
            WaitOutcome::Inert => panic!("expected a completed outcome"),
        }
    }

    #[tokio::test]
    async fn test_dropping_the_waiter_unsubscribes() {
        let bus = SignalBus::new();
        let target = bus.register_target(ActorId::new("player-1"));

        let waiter = WaitForSignal::with_keys(
            &bus,
            SignalKey::new("act.done"),
            SignalKey::new("act.failed"),
            target,
            true,
            MatchMode::Exact,
        )
        .unwrap();
        assert_eq!(bus.subscriber_count(), 2);

        drop(waiter);
        assert_eq!(bus.subscriber_count(), 0);
    }
}
