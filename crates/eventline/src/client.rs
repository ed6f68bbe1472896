//! The caller-facing telemetry client.
//!
//! One `EventClient` per process, explicitly constructed and owned by the
//! host's composition root. The client wires the pieces together: identity
//! state, the shared event buffer, and the flusher. Logging entry points are
//! synchronous and infallible; everything that can go wrong is reported
//! through the diagnostic sink and otherwise swallowed.

use crate::buffer::EventBuffer;
use crate::config::Config;
use crate::envelope::{merge_attributes, Attributes, Envelope};
use crate::error::Error;
use crate::flusher::Flusher;
use crate::identity::{anonymous_user_id, hash_user_id};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

pub struct EventClient {
    config: Config,
    // None when the endpoint failed to parse; the client still buffers
    // events but flushes are warn-and-skip no-ops.
    flusher: Option<Flusher>,
    identity: Mutex<Option<String>>,
    buffer: Arc<Mutex<EventBuffer>>,
}

impl EventClient {
    #[must_use]
    pub fn new(config: Config) -> Self {
        let flusher = config
            .endpoint
            .clone()
            .map(|endpoint| Flusher::new(endpoint, config.flush_timeout));

        match &config.endpoint {
            Some(endpoint) => info!("Telemetry client initialized for {endpoint}"),
            None => warn!("Telemetry client has no collection endpoint; flushes will be skipped"),
        }

        EventClient {
            config,
            flusher,
            identity: Mutex::new(None),
            buffer: Arc::new(Mutex::new(EventBuffer::new())),
        }
    }

    /// Resolve the subject identity for this session.
    ///
    /// An explicit, non-empty id is hashed before storage; otherwise a
    /// random anonymous id is generated and hashed the same way. Calling
    /// again overwrites the previous identity.
    pub fn set_user_id(&self, user_id: Option<&str>) {
        let hashed = match user_id {
            Some(id) if !id.is_empty() => hash_user_id(id),
            _ => hash_user_id(&anonymous_user_id()),
        };
        *self.identity.lock().expect("lock poisoned") = Some(hashed);
    }

    /// Log one event under `event_name` with caller-supplied extras.
    ///
    /// Refused with a warning until an identity has been resolved. When the
    /// buffer length reaches the configured threshold the batch is handed
    /// off for delivery; that hand-off spawns onto the Tokio runtime, so
    /// entry points must run inside a runtime context.
    pub fn log_event(&self, event_name: &str, extra: Attributes) {
        let Some(user) = self.identity.lock().expect("lock poisoned").clone() else {
            warn!("Dropping event {event_name:?}: {}", Error::NotIdentified);
            return;
        };

        let attributes = merge_attributes(&self.config.platform, event_name, extra);
        let envelope = Envelope::new(user, attributes);

        let len = self.buffer.lock().expect("lock poisoned").append(envelope);
        if len >= self.config.flush_threshold {
            self.flush();
        }
    }

    /// Log the initial entry into the application.
    pub fn log_app_init_event(&self, extra: Attributes) {
        self.log_event("AppInitialEntry", extra);
    }

    /// Log the application returning to the foreground.
    pub fn log_active_event(&self, extra: Attributes) {
        self.log_event("InitialEntry", extra);
    }

    /// Log an entry through a deep link, recording the target screen.
    pub fn log_deep_link_event(&self, screen_name: &str, extra: Attributes) {
        self.log_event("DeepLinkEntry", with_screen(screen_name, extra));
    }

    /// Log that the user viewed a screen.
    pub fn log_screen_event(&self, screen_name: &str, extra: Attributes) {
        self.log_event("ScreenEntry", with_screen(screen_name, extra));
    }

    /// Log that the user left a screen.
    pub fn log_screen_exit_event(&self, screen_name: &str, extra: Attributes) {
        self.log_event("ScreenExit", with_screen(screen_name, extra));
    }

    /// Log a button tap on a screen. The event name is derived from the
    /// button name (`"{button_name}Clicked"`).
    pub fn log_tap_event(&self, screen_name: &str, button_name: &str, extra: Attributes) {
        self.log_event(
            &format!("{button_name}Clicked"),
            with_screen(screen_name, extra),
        );
    }

    /// Terminal entry point: force out whatever the buffer holds, so the
    /// tail is not lost at process end. Logs no event of its own.
    pub fn log_app_terminate_event(&self, _extra: Attributes) {
        self.flush();
    }

    /// Drain the buffer and hand the batch off for delivery, regardless of
    /// the threshold. No-op on an empty buffer or an unconfigured endpoint.
    pub fn flush(&self) {
        let Some(flusher) = &self.flusher else {
            warn!("Skipping flush: {}", Error::NotConfigured);
            return;
        };

        // Drain before the send task is scheduled, so events logged after
        // this point land in the next batch, never the in-flight one.
        let batch = self.buffer.lock().expect("lock poisoned").drain_all();
        flusher.dispatch(batch);
    }

    /// Number of envelopes currently buffered.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.buffer.lock().expect("lock poisoned").len()
    }
}

fn with_screen(screen_name: &str, extra: Attributes) -> Attributes {
    let mut merged = Attributes::new();
    merged.insert(
        "screen".to_string(),
        Value::String(screen_name.to_string()),
    );
    for (key, value) in extra {
        merged.insert(key, value);
    }
    merged
}
