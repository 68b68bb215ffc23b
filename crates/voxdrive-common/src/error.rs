use thiserror::Error;
use uuid::Uuid;

/// Session lookup and lifecycle failures.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(Uuid),
    #[error("Session has ended: {0}")]
    Inactive(Uuid),
}

/// Failures reported by the browser driver (the injected capability).
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),
    #[error("Element not found: {0}")]
    ElementNotFound(String),
    #[error("No element is focused")]
    NoActiveElement,
    #[error("Navigation failed: {0}")]
    Navigation(String),
    #[error("Driver protocol error: {0}")]
    Protocol(String),
}

/// Failures surfaced by the browser automation controller.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Browser not started. Use 'browser: start browser' first")]
    NotStarted,
    #[error("Failed to start browser: {0}")]
    Launch(String),
    #[error("Element not found after retries: {0}")]
    ElementNotFound(String),
    #[error("Navigation to {url} timed out after {timeout_ms}ms")]
    NavigationTimeout { url: String, timeout_ms: u64 },
    #[error("No element is focused to type into")]
    NoActiveElement,
    #[error("Browser driver error: {0}")]
    Driver(String),
}

impl From<DriverError> for BrowserError {
    fn from(err: DriverError) -> Self {
        match err {
            DriverError::Launch(msg) => BrowserError::Launch(msg),
            DriverError::ElementNotFound(sel) => BrowserError::ElementNotFound(sel),
            DriverError::NoActiveElement => BrowserError::NoActiveElement,
            DriverError::Navigation(msg) | DriverError::Protocol(msg) => {
                BrowserError::Driver(msg)
            }
        }
    }
}

/// Failures from the generative completion capability.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI request timed out after {0}s")]
    Timeout(u64),
    #[error("AI transport error: {0}")]
    Transport(String),
    #[error("AI provider error: {0}")]
    Provider(String),
}

/// Request-level failures surfaced directly to the caller.
///
/// These occur before a command executes, so no transcript entry is written.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("Invalid request: {0}")]
    Validation(String),
}
