use crate::cdp::CdpClient;
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::input::InsertTextParams;
use tracing::info;
use voxdrive_engine::driver::{BrowserDriver, DriverError, NavigationResult};
use voxdrive_engine::protocol::ScrollDirection;

/// Chromium-backed driver speaking CDP.
pub struct HeadlessDriver {
    client: Option<CdpClient>,
}

impl HeadlessDriver {
    pub fn new() -> Self {
        Self { client: None }
    }

    fn client(&self) -> Result<&CdpClient, DriverError> {
        self.client
            .as_ref()
            .ok_or_else(|| DriverError::Protocol("Browser not launched".to_string()))
    }
}

impl Default for HeadlessDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrowserDriver for HeadlessDriver {
    async fn launch(&mut self, headless: bool) -> Result<(), DriverError> {
        info!(headless, "Launching Chromium driver");
        let client = CdpClient::launch(headless)
            .await
            .map_err(|e| DriverError::Launch(e.to_string()))?;
        self.client = Some(client);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        if let Some(client) = self.client.take() {
            client
                .close()
                .await
                .map_err(|e| DriverError::Protocol(e.to_string()))?;
        }
        Ok(())
    }

    async fn navigate(&mut self, url: &str) -> Result<NavigationResult, DriverError> {
        let client = self.client()?;

        info!("Navigating to: {}", url);
        client
            .page
            .goto(url)
            .await
            .map_err(|e| DriverError::Navigation(e.to_string()))?;

        let title = client
            .page
            .get_title()
            .await
            .unwrap_or_default()
            .unwrap_or_default();
        let final_url = client
            .page
            .url()
            .await
            .map_err(|e| DriverError::Navigation(e.to_string()))?
            .unwrap_or_else(|| url.to_string());
        Ok(NavigationResult {
            url: final_url,
            title,
        })
    }

    async fn click(&mut self, selector: &str) -> Result<(), DriverError> {
        let client = self.client()?;
        let element = client
            .page
            .find_element(selector)
            .await
            .map_err(|_| DriverError::ElementNotFound(selector.to_string()))?;
        element
            .click()
            .await
            .map_err(|e| DriverError::Protocol(format!("Click failed: {}", e)))?;
        Ok(())
    }

    async fn scroll(
        &mut self,
        direction: ScrollDirection,
        pixels: u32,
    ) -> Result<(), DriverError> {
        let client = self.client()?;
        let script = match direction {
            ScrollDirection::Down => format!("window.scrollBy(0, {});", pixels),
            ScrollDirection::Up => format!("window.scrollBy(0, -{});", pixels),
            ScrollDirection::Right => format!("window.scrollBy({}, 0);", pixels),
            ScrollDirection::Left => format!("window.scrollBy(-{}, 0);", pixels),
            ScrollDirection::Top => "window.scrollTo(0, 0);".to_string(),
            ScrollDirection::Bottom => {
                "window.scrollTo(0, document.body.scrollHeight);".to_string()
            }
        };
        client
            .page
            .evaluate(script)
            .await
            .map_err(|e| DriverError::Protocol(format!("Scroll failed: {}", e)))?;
        Ok(())
    }

    async fn type_text(&mut self, text: &str) -> Result<(), DriverError> {
        let client = self.client()?;

        let focused: bool = client
            .page
            .evaluate("!!document.activeElement && document.activeElement !== document.body")
            .await
            .map_err(|e| DriverError::Protocol(format!("Focus check failed: {}", e)))?
            .into_value()
            .unwrap_or(false);
        if !focused {
            return Err(DriverError::NoActiveElement);
        }

        let params = InsertTextParams::builder()
            .text(text)
            .build()
            .map_err(|e| DriverError::Protocol(format!("Failed to build input event: {:?}", e)))?;
        client
            .page
            .execute(params)
            .await
            .map_err(|e| DriverError::Protocol(format!("Type failed: {}", e)))?;
        Ok(())
    }

    async fn screenshot(&mut self) -> Result<Vec<u8>, DriverError> {
        let client = self.client()?;
        let bytes = client
            .page
            .screenshot(chromiumoxide::page::ScreenshotParams::builder().build())
            .await
            .map_err(|e| DriverError::Protocol(format!("Screenshot failed: {}", e)))?;
        Ok(bytes)
    }
}
