//! # Hazard Event Feed
//!
//! Outbound notifications for collaborators outside the simulation (audio,
//! UI overlays, telemetry).
//!
//! ```text
//!                 try_send   ┌──────────────┐  recv  ┌──────────────┐
//!              ┌───────────>│ bounded chan │──────>│ subscriber A │
//! ┌─────────────┐            └──────────────┘        └──────────────┘
//! │ HazardField │
//! └─────────────┘            ┌──────────────┐        ┌──────────────┐
//!              └───────────>│ bounded chan │──────>│ subscriber B │
//!                            └──────────────┘        └──────────────┘
//! ```
//!
//! Every subscriber owns a bounded queue and sees every event published
//! after it subscribed. Sends never block the frame: a full queue drops the
//! event for that subscriber only. With no subscribers nothing is buffered.
//! Queues whose receiver was dropped are pruned on the next publish.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use tempest_particles::Effect;
use tempest_shared::Vec2;
use tracing::trace;

use crate::hazard::HazardId;

/// Something that happened to a hazard this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum HazardEvent {
    // =========================================================================
    // Combat
    // =========================================================================
    /// A target inside the radius took damage.
    DamageApplied {
        /// Source hazard
        hazard: HazardId,
        /// Damage dealt
        amount: f32,
        /// Target position
        position: Vec2,
    },

    // =========================================================================
    // Combination and interaction
    // =========================================================================
    /// Two hazards fused.
    Combined {
        /// Hazard that remains active
        survivor: HazardId,
        /// Hazard that was deactivated
        absorbed: HazardId,
        /// Combination effect
        effect: Effect,
        /// Midpoint the survivor moved to
        position: Vec2,
    },

    /// Two combined hazards started a pairwise interaction emitter.
    Interaction {
        /// Scanning hazard, owner of the emitter
        hazard: HazardId,
        /// Neighbour
        other: HazardId,
        /// Interaction effect
        effect: Effect,
        /// Strength in `[0, 1]`
        strength: f32,
        /// Midpoint
        position: Vec2,
    },

    /// Three combined hazards started a three-way emitter.
    ThreeWayInteraction {
        /// Scanning hazard first, then its two neighbours
        hazards: [HazardId; 3],
        /// Three-way effect
        effect: Effect,
        /// Centroid
        position: Vec2,
    },

    // =========================================================================
    // Lifecycle
    // =========================================================================
    /// A hazard was deactivated, directly or by cascade.
    Deactivated {
        /// Hazard
        hazard: HazardId,
    },

    /// A temporary hazard reached the end of its duration.
    Expired {
        /// Hazard
        hazard: HazardId,
    },

    /// A deactivated hazard was reactivated.
    Activated {
        /// Hazard
        hazard: HazardId,
    },
}

/// Receiving end of the hazard event feed.
pub type EventReceiver = Receiver<HazardEvent>;

/// Fan-out of bounded, non-blocking event queues.
#[derive(Debug)]
pub struct EventFeed {
    capacity: usize,
    subscribers: Mutex<Vec<Sender<HazardEvent>>>,
}

impl EventFeed {
    /// Creates a feed whose subscribers each hold at most `capacity`
    /// undelivered events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Delivers an event to every live subscriber.
    pub fn publish(&self, event: HazardEvent) {
        self.subscribers.lock().retain(|sender| match sender.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                trace!(?event, "hazard event dropped, subscriber queue full");
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });
    }

    /// A receiver for events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> EventReceiver {
        let (sender, receiver) = bounded(self.capacity);
        self.subscribers.lock().push(sender);
        receiver
    }

    /// Subscribers still registered. Dropped receivers count until the next
    /// publish.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deactivated(index: u32) -> HazardEvent {
        HazardEvent::Deactivated { hazard: HazardId(index) }
    }

    #[test]
    fn test_full_queue_drops_without_blocking() {
        let feed = EventFeed::new(2);
        let rx = feed.subscribe();
        for i in 0..5 {
            feed.publish(deactivated(i));
        }
        assert_eq!(rx.len(), 2);
        assert_eq!(rx.try_recv().unwrap(), deactivated(0));
        assert_eq!(rx.try_recv().unwrap(), deactivated(1));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_every_subscriber_sees_every_event() {
        let feed = EventFeed::new(16);
        let audio = feed.subscribe();
        let overlay = feed.subscribe();
        for i in 0..3 {
            feed.publish(deactivated(i));
        }

        let expected: Vec<_> = (0..3).map(deactivated).collect();
        assert_eq!(audio.try_iter().collect::<Vec<_>>(), expected);
        assert_eq!(overlay.try_iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_nothing_buffered_without_subscribers() {
        let feed = EventFeed::new(4);
        for i in 0..400 {
            feed.publish(deactivated(i));
        }

        let late = feed.subscribe();
        assert!(late.try_recv().is_err());
        feed.publish(deactivated(1000));
        assert_eq!(late.try_recv().unwrap(), deactivated(1000));
    }

    #[test]
    fn test_slow_subscriber_does_not_starve_others() {
        let feed = EventFeed::new(1);
        let slow = feed.subscribe();
        let fast = feed.subscribe();

        feed.publish(deactivated(0));
        assert_eq!(fast.try_recv().unwrap(), deactivated(0));
        feed.publish(deactivated(1));
        assert_eq!(fast.try_recv().unwrap(), deactivated(1));

        assert_eq!(slow.try_iter().collect::<Vec<_>>(), vec![deactivated(0)]);
    }

    #[test]
    fn test_dropped_receivers_are_pruned() {
        let feed = EventFeed::new(4);
        let kept = feed.subscribe();
        drop(feed.subscribe());
        assert_eq!(feed.subscriber_count(), 2);

        feed.publish(deactivated(0));
        assert_eq!(feed.subscriber_count(), 1);
        assert_eq!(kept.try_recv().unwrap(), deactivated(0));
    }
}
