/// Errors that can occur inside the telemetry pipeline.
///
/// None of these are surfaced to the host application: every variant is
/// consumed inside the crate and reduced to a leveled diagnostic. Telemetry
/// delivery is best-effort and must never crash or interrupt the host.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No collection endpoint configured")]
    NotConfigured,

    #[error("No user identity resolved")]
    NotIdentified,

    #[error("Failed to serialize batch: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to deliver batch: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Collection endpoint returned status {0}")]
    UnexpectedStatus(reqwest::StatusCode),
}
