//! In-process change notification for ticket lifecycle events.
//!
//! A [`TicketNotifier`] is created once at startup and shared with every
//! component that publishes or subscribes. Subscribers see each event
//! published after they subscribe; nothing is replayed.

mod event;
mod hub;

pub use event::{DeletedTicket, TicketEvent, TicketEventKind};
pub use hub::{DEFAULT_EVENT_BUFFER, SubscriptionEnded, TicketNotifier, TicketSubscription};
