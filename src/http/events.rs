//! Server-sent ticket change stream.

use super::{AppState, StreamCaller};
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::Stream;
use std::convert::Infallible;
use tracing::{debug, warn};

/// `GET /tickets/events`
///
/// Streams `new-ticket`, `update-ticket`, and `delete-ticket` events as they
/// are committed. The stream ends when the subscriber falls behind; clients
/// reconnect and refetch.
#[expect(clippy::unused_async, reason = "axum handlers must be async")]
pub async fn ticket_events(
    StreamCaller(identity): StreamCaller,
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut subscription = state.notifier.subscribe();
    debug!(user_id = %identity.user_id, subscriber = %subscription.id(), "event stream opened");

    let stream = async_stream::stream! {
        while let Ok(event) = subscription.recv().await {
            match event.payload_json() {
                Ok(data) => yield Ok(Event::default().event(event.kind().wire_name()).data(data)),
                Err(err) => warn!(ticket_id = %event.ticket_id(), error = %err, "dropping unserialisable event"),
            }
        }
    };
    Sse::new(stream).keep_alive(KeepAlive::default())
}
