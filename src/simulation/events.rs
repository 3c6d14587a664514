//! Grid change notifications

use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::Mutex;

/// Emitted by the engine whenever the published grid or run state changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridEvent {
    /// A generation was committed
    Stepped { generation: u64 },
    /// Cells were painted, filled or cleared from outside the engine
    Edited { generation: u64 },
    /// The whole grid was replaced, e.g. after a load
    Replaced { width: usize, height: usize },
    Started,
    Stopped,
}

/// Events queued per subscriber before new ones are dropped
pub const EVENT_QUEUE_CAPACITY: usize = 256;

/// Fan-out of events to every live subscriber
///
/// Each subscriber gets a bounded queue. A subscriber that falls behind misses
/// events until it drains its queue; the published snapshot is always current.
#[derive(Debug, Default)]
pub(crate) struct EventBus {
    subscribers: Mutex<Vec<SyncSender<GridEvent>>>,
}

impl EventBus {
    pub fn subscribe(&self) -> Receiver<GridEvent> {
        let (sender, receiver) = mpsc::sync_channel(EVENT_QUEUE_CAPACITY);
        self.lock().push(sender);
        receiver
    }

    /// Send to all subscribers without blocking, dropping the ones whose receiver is gone
    pub fn publish(&self, event: GridEvent) {
        self.lock().retain(|sender| match sender.try_send(event) {
            Ok(()) | Err(TrySendError::Full(_)) => true,
            Err(TrySendError::Disconnected(_)) => false,
        });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<SyncSender<GridEvent>>> {
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_reach_every_subscriber() {
        let bus = EventBus::default();
        let first = bus.subscribe();
        let second = bus.subscribe();

        bus.publish(GridEvent::Started);

        assert_eq!(first.try_recv(), Ok(GridEvent::Started));
        assert_eq!(second.try_recv(), Ok(GridEvent::Started));
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let bus = EventBus::default();
        let kept = bus.subscribe();
        drop(bus.subscribe());

        bus.publish(GridEvent::Stepped { generation: 1 });
        assert_eq!(bus.lock().len(), 1);
        assert_eq!(kept.try_recv(), Ok(GridEvent::Stepped { generation: 1 }));
    }

    #[test]
    fn test_idle_subscriber_queue_is_bounded() {
        let bus = EventBus::default();
        let idle = bus.subscribe();

        for generation in 1..=(EVENT_QUEUE_CAPACITY as u64 * 4) {
            bus.publish(GridEvent::Stepped { generation });
        }

        assert_eq!(bus.lock().len(), 1);
        let queued: Vec<_> = idle.try_iter().collect();
        assert_eq!(queued.len(), EVENT_QUEUE_CAPACITY);
        assert_eq!(queued[0], GridEvent::Stepped { generation: 1 });

        // once drained, new events flow again
        bus.publish(GridEvent::Stopped);
        assert_eq!(idle.try_recv(), Ok(GridEvent::Stopped));
    }
}
