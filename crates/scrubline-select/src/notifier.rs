//! Publishes selection events to registered observers.

use crossbeam_channel::{Receiver, Sender};
use scrubline_core::RationalTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Selection change reported to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionEvent {
    /// The selection moved (continuous, during a drag or scroll).
    Changed(RationalTime),
    /// A drag completed; fired once per released gesture.
    Ended(RationalTime),
}

impl SelectionEvent {
    /// Instant carried by the event.
    pub fn time(&self) -> RationalTime {
        match self {
            Self::Changed(time) | Self::Ended(time) => *time,
        }
    }
}

/// Handle returned on registration, used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

enum Observer {
    Callback(Box<dyn FnMut(SelectionEvent) + Send>),
    Channel(Sender<SelectionEvent>),
}

/// Observer registry.
///
/// Registration does not tie the observer's lifetime to the control: callers
/// unregister explicitly, and channel observers are pruned once their
/// receiver is dropped.
#[derive(Default)]
pub struct DelegateNotifier {
    observers: Vec<(ObserverId, Observer)>,
    next_id: u64,
}

impl DelegateNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback.
    pub fn subscribe<F>(&mut self, callback: F) -> ObserverId
    where
        F: FnMut(SelectionEvent) + Send + 'static,
    {
        self.register(Observer::Callback(Box::new(callback)))
    }

    /// Register the sending half of a channel.
    pub fn subscribe_channel(&mut self, sender: Sender<SelectionEvent>) -> ObserverId {
        self.register(Observer::Channel(sender))
    }

    /// Register a fresh unbounded channel and hand back its receiver.
    pub fn channel(&mut self) -> (ObserverId, Receiver<SelectionEvent>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (self.subscribe_channel(tx), rx)
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn changed(&mut self, time: RationalTime) {
        self.publish(SelectionEvent::Changed(time));
    }

    pub fn ended(&mut self, time: RationalTime) {
        self.publish(SelectionEvent::Ended(time));
    }

    /// Deliver `event` to every observer in registration order.
    pub fn publish(&mut self, event: SelectionEvent) {
        self.observers.retain_mut(|(id, observer)| match observer {
            Observer::Callback(callback) => {
                callback(event);
                true
            }
            Observer::Channel(sender) => {
                let alive = sender.send(event).is_ok();
                if !alive {
                    debug!(?id, "Dropping observer with closed channel");
                }
                alive
            }
        });
    }

    fn register(&mut self, observer: Observer) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }
}

impl std::fmt::Debug for DelegateNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelegateNotifier")
            .field("observers", &self.observers.len())
            .finish()
    }
}
