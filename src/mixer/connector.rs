//! Connector to a remote mixer instance
//!
//! Every call to [`Connector::send_request`] opens its own TCP connection, so
//! several connectors can talk to the same mixer at once without blocking
//! each other.

use std::time::Duration;

use serde_json::{json, Value};
use tracing::{debug, info};

use crate::config::MixerConfig;
use crate::constants::{DEFAULT_MIXER_TIMEOUT_MS, MAX_RESPONSE_SIZE};
use crate::error::MixerError;
use crate::protocol::{Event, Request};

use super::transport;

pub struct Connector {
    host: String,
    port: u16,
    timeout: Duration,
    max_response_bytes: usize,
    /// Return the request instead of sending it
    dry_run: bool,
    pending: Vec<Event>,
}

impl Connector {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: Duration::from_millis(DEFAULT_MIXER_TIMEOUT_MS),
            max_response_bytes: MAX_RESPONSE_SIZE,
            dry_run: false,
            pending: Vec::new(),
        }
    }

    pub fn from_config(config: &MixerConfig) -> Self {
        Self {
            timeout: config.timeout(),
            max_response_bytes: config.max_response_bytes,
            ..Self::new(config.host.clone(), config.port)
        }
    }

    /// In dry-run mode [`send_request`](Self::send_request) returns the
    /// request document without opening a connection.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Events queued with [`append_event`](Self::append_event)
    pub fn pending(&self) -> &[Event] {
        &self.pending
    }

    /// Queue an event to be sent later, `delay` milliseconds after the
    /// mixer receives the batch.
    pub fn append_event(&mut self, event: Event, delay: u64) -> Value {
        debug!("Queueing '{}' with delay {}ms", event.action(), delay);
        self.pending.push(event.with_delay(delay));
        json!({ "error": null })
    }

    /// Send one event or a list of events and return the mixer's reply.
    ///
    /// The pending queue is cleared once the exchange succeeds.
    pub async fn send_request(&mut self, events: impl Into<Request>) -> Result<Value, MixerError> {
        let request = events.into();

        if self.dry_run {
            self.pending.clear();
            return Ok(serde_json::to_value(&request)?);
        }

        let payload = serde_json::to_vec(&request)?;
        info!(
            "Sending {} event(s) to mixer {}:{}",
            request.len(),
            self.host,
            self.port
        );
        debug!("Request: {}", String::from_utf8_lossy(&payload));

        let reply = transport::exchange(
            &self.host,
            self.port,
            &payload,
            self.max_response_bytes,
            self.timeout,
        )
        .await?;

        debug!("Response: {}", reply);
        self.pending.clear();
        Ok(reply)
    }

    /// Send every queued event as one request
    pub async fn flush(&mut self) -> Result<Value, MixerError> {
        let request = Request::from(self.pending.clone());
        self.send_request(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::VideoEncoderOptions;

    #[tokio::test]
    async fn test_dry_run_returns_request() {
        let mut connector = Connector::new("localhost", 7777).with_dry_run(true);

        let reply = connector.send_request(Event::get_state()).await.unwrap();
        assert_eq!(
            reply,
            json!({"events": [{"action": "getState", "params": {}}]})
        );
    }

    #[tokio::test]
    async fn test_append_then_flush() {
        let mut connector = Connector::new("localhost", 7777).with_dry_run(true);

        let ack = connector.append_event(Event::remove_filter(3), 0);
        assert_eq!(ack, json!({"error": null}));
        connector.append_event(
            Event::configure_video_encoder(5, VideoEncoderOptions::default().with_bitrate(4000)),
            1500,
        );
        assert_eq!(connector.pending().len(), 2);

        let reply = connector.flush().await.unwrap();
        assert_eq!(
            reply,
            json!({"events": [
                {"action": "removeFilter", "params": {"id": 3}, "delay": 0},
                {"action": "configure", "params": {"bitrate": 4000}, "filterId": 5, "delay": 1500}
            ]})
        );
        assert!(connector.pending().is_empty());
    }

    #[test]
    fn test_from_config() {
        let config = MixerConfig {
            host: "10.1.1.1".to_string(),
            port: 9999,
            timeout_ms: 250,
            max_response_bytes: 1024,
        };
        let connector = Connector::from_config(&config);
        assert_eq!(connector.host(), "10.1.1.1");
        assert_eq!(connector.port(), 9999);
        assert_eq!(connector.timeout, Duration::from_millis(250));
    }
}
