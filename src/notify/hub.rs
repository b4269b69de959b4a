//! Broadcast hub fanning ticket events out to live subscribers.

use super::TicketEvent;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use tracing::{debug, warn};
use uuid::Uuid;

/// Default number of events buffered per subscriber.
pub const DEFAULT_EVENT_BUFFER: usize = 256;

/// Reason a subscription stopped yielding events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubscriptionEnded {
    /// The subscriber fell behind and missed events; it must refetch.
    #[error("subscriber lagged behind by {0} events")]
    Lagged(u64),
    /// The notifier was dropped.
    #[error("notifier closed")]
    Closed,
}

/// Publish/subscribe hub for ticket changes.
///
/// Cloning is cheap and every clone publishes to the same subscribers.
/// Publishing never waits for subscribers: a subscriber that falls more than
/// the buffer capacity behind has its subscription ended with
/// [`SubscriptionEnded::Lagged`].
#[derive(Debug, Clone)]
pub struct TicketNotifier {
    sender: broadcast::Sender<Arc<TicketEvent>>,
}

impl Default for TicketNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER)
    }
}

impl TicketNotifier {
    /// Creates a notifier buffering up to `capacity` events per subscriber.
    ///
    /// A zero capacity is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event to every current subscriber.
    ///
    /// Returns the number of subscribers the event was queued for.
    pub fn publish(&self, event: TicketEvent) -> usize {
        let kind = event.kind();
        let ticket_id = event.ticket_id();
        let delivered = self.sender.send(Arc::new(event)).unwrap_or(0);
        debug!(event = %kind, %ticket_id, delivered, "published ticket event");
        delivered
    }

    /// Registers a new subscriber.
    #[must_use]
    pub fn subscribe(&self) -> TicketSubscription {
        let id = Uuid::new_v4();
        let receiver = self.sender.subscribe();
        debug!(subscriber = %id, "subscriber registered");
        TicketSubscription {
            id,
            receiver,
            ended: None,
        }
    }

    /// Returns the number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// A live subscription; dropping it deregisters the subscriber.
///
/// The id only correlates log lines for one subscriber.
#[derive(Debug)]
pub struct TicketSubscription {
    id: Uuid,
    receiver: broadcast::Receiver<Arc<TicketEvent>>,
    ended: Option<SubscriptionEnded>,
}

impl TicketSubscription {
    /// Returns the subscriber id.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Waits for the next event.
    ///
    /// # Errors
    ///
    /// Returns [`SubscriptionEnded::Lagged`] once the subscriber has missed
    /// events, and [`SubscriptionEnded::Closed`] when the notifier is gone.
    /// Either way the subscription yields nothing further.
    pub async fn recv(&mut self) -> Result<Arc<TicketEvent>, SubscriptionEnded> {
        if let Some(reason) = self.ended {
            return Err(reason);
        }
        let reason = match self.receiver.recv().await {
            Ok(event) => return Ok(event),
            Err(RecvError::Lagged(missed)) => {
                warn!(subscriber = %self.id, missed, "subscriber lagged; ending stream");
                SubscriptionEnded::Lagged(missed)
            }
            Err(RecvError::Closed) => SubscriptionEnded::Closed,
        };
        self.ended = Some(reason);
        Err(reason)
    }

    /// Returns the next buffered event without waiting, or `None` when
    /// nothing is pending.
    pub fn try_recv(&mut self) -> Option<Result<Arc<TicketEvent>, SubscriptionEnded>> {
        if let Some(reason) = self.ended {
            return Some(Err(reason));
        }
        let reason = match self.receiver.try_recv() {
            Ok(event) => return Some(Ok(event)),
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Lagged(missed)) => {
                warn!(subscriber = %self.id, missed, "subscriber lagged; ending stream");
                SubscriptionEnded::Lagged(missed)
            }
            Err(TryRecvError::Closed) => SubscriptionEnded::Closed,
        };
        self.ended = Some(reason);
        Some(Err(reason))
    }
}

impl Drop for TicketSubscription {
    fn drop(&mut self) {
        debug!(subscriber = %self.id, "subscriber deregistered");
    }
}
