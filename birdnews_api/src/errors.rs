//! Error types for the sightings site client.

/// Errors that can occur when fetching a day page.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An HTTP request failed (network error, bad URL, or unreadable body).
    #[error("Request failed")]
    RequestFailed,
    /// The request did not complete within the configured timeout.
    #[error("Request timed out")]
    Timeout,
    /// The site returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
}
