//! Server-sent stream of chat store changes.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::stream::{Stream, StreamExt};
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tracing::warn;

use chatdeck_core::StoreEvent;

use crate::state::AppState;

/// Stream store events as they happen.
///
/// GET /v1/events
pub async fn store_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.events.subscribe()).map(|item| {
        let event = match item {
            Ok(event) => to_sse(&event),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                warn!(skipped, "Event stream lagged, skipping events");
                Event::default().comment(format!("skipped {} events", skipped))
            }
        };
        Ok::<_, Infallible>(event)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn to_sse(event: &StoreEvent) -> Event {
    Event::default()
        .event(event.name())
        .json_data(event)
        .unwrap_or_else(|e| {
            warn!(error = %e, event = event.name(), "Failed to encode store event");
            Event::default().comment("unencodable event")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use chatdeck_core::ChatId;

    #[tokio::test]
    async fn test_events_reach_subscribers() {
        let state = AppState::new(Config::default());
        let mut stream = BroadcastStream::new(state.events.subscribe());

        state
            .store
            .write()
            .await
            .rename_chat(&ChatId::new("chat-1"), "Scraper");

        let event = stream.next().await.unwrap().unwrap();
        assert_eq!(
            event,
            StoreEvent::ChatRenamed {
                chat_id: ChatId::new("chat-1"),
                title: "Scraper".to_string(),
            }
        );
    }
}
