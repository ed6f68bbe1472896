//! Eventline: a lightweight client-side usage-telemetry SDK.
//!
//! Host applications log discrete events (screen views, taps, lifecycle
//! transitions); Eventline hashes or anonymizes the acting user, buffers
//! envelopes in memory, and ships batches to a collection endpoint once the
//! buffer crosses a threshold. Delivery is fire-and-forget and best-effort:
//! failed batches are logged and dropped, never retried or persisted.
//!
//! # Example
//!
//! ```rust,no_run
//! use eventline::{Attributes, Config, EventClient};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = EventClient::new(Config::new("https://example.test/collect"));
//!     client.set_user_id(Some("alice"));
//!
//!     client.log_app_init_event(Attributes::new());
//!     client.log_screen_event("Home", Attributes::new());
//!
//!     // Force out whatever is still buffered before shutdown.
//!     client.log_app_terminate_event(Attributes::new());
//! }
//! ```

pub mod buffer;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod flusher;
pub mod identity;

pub use client::EventClient;
pub use config::{Config, DEFAULT_FLUSH_THRESHOLD};
pub use envelope::{Attributes, Envelope};
pub use error::Error;
