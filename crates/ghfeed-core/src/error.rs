//! Failures surfaced to display collaborators

/// Why the upstream feed could not be fetched
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The subject does not exist upstream
    #[error("subject not found")]
    NotFound,
    /// Any other non-success status
    #[error("upstream returned status {0}")]
    Upstream(u16),
    /// Network, I/O or response-body failure
    #[error("transport error: {0}")]
    Transport(String),
}

impl FetchError {
    pub fn from_status(status: u16) -> Self {
        if status == 404 {
            FetchError::NotFound
        } else {
            FetchError::Upstream(status)
        }
    }
}
