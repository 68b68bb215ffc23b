//! The browser driver capability interface.

use async_trait::async_trait;
pub use voxdrive_common::error::DriverError;
pub use voxdrive_common::protocol::NavigationResult;
use voxdrive_common::protocol::ScrollDirection;

/// The injected browser-automation primitive set.
///
/// Implementations own the underlying browser process. Retry budgets,
/// timeouts, and the Open/Closed state machine live in the controller, not
/// here; a driver call reports exactly one attempt's outcome.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Start the underlying browser with the given headless flag.
    async fn launch(&mut self, headless: bool) -> Result<(), DriverError>;

    /// Release the browser and all its resources.
    async fn close(&mut self) -> Result<(), DriverError>;

    /// Load a URL and wait for the page to settle.
    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, DriverError>;

    /// Click the first element matching the selector.
    async fn click(&mut self, selector: &str) -> Result<(), DriverError>;

    /// Scroll the window; `top`/`bottom` go to the edge regardless of amount.
    async fn scroll(&mut self, direction: ScrollDirection, pixels: u32)
    -> Result<(), DriverError>;

    /// Send literal text to the currently focused element.
    async fn type_text(&mut self, text: &str) -> Result<(), DriverError>;

    /// Capture the current viewport as PNG bytes.
    async fn screenshot(&mut self) -> Result<Vec<u8>, DriverError>;
}
