//! Browser automation controller.
//!
//! Owns the single process-wide browser resource. Every operation locks the
//! controller for its full duration, serializing browser work across all
//! sessions. State machine: Closed -> Open -> Closed; close always lands in
//! Closed even when the driver fails to release cleanly.

use crate::config::BrowserConfig;
use crate::driver::BrowserDriver;
use crate::meeting::adapter_for;
use chrono::Utc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};
use voxdrive_common::error::{BrowserError, DriverError};
use voxdrive_common::protocol::{BrowserCommand, MeetingPlatform, ScrollDirection};

#[derive(Debug, Clone, Default)]
struct OpenState {
    current_url: Option<String>,
}

struct ControllerState {
    driver: Box<dyn BrowserDriver>,
    open: Option<OpenState>,
}

pub struct BrowserController {
    inner: Mutex<ControllerState>,
    config: BrowserConfig,
}

impl BrowserController {
    pub fn new(driver: Box<dyn BrowserDriver>, config: BrowserConfig) -> Self {
        Self {
            inner: Mutex::new(ControllerState { driver, open: None }),
            config,
        }
    }

    pub async fn is_open(&self) -> bool {
        self.inner.lock().await.open.is_some()
    }

    pub async fn current_url(&self) -> Option<String> {
        self.inner
            .lock()
            .await
            .open
            .as_ref()
            .and_then(|o| o.current_url.clone())
    }

    /// Execute one browser command, returning the user-visible response.
    pub async fn execute(&self, cmd: BrowserCommand) -> Result<String, BrowserError> {
        let mut state = self.inner.lock().await;
        match cmd {
            BrowserCommand::Start { headless } => Self::start_locked(&mut state, headless).await,
            BrowserCommand::Close => Ok(Self::close_locked(&mut state).await),
            BrowserCommand::Navigate { url } => {
                let result = self.navigate_locked(&mut state, &url).await?;
                Ok(format!("Navigated to {}", result))
            }
            BrowserCommand::JoinMeeting { url, platform } => {
                self.join_meeting_locked(&mut state, &url, platform).await
            }
            BrowserCommand::Click { selector } => {
                Self::require_open(&state)?;
                self.click_locked(&mut state, &selector).await?;
                Ok(format!("Clicked {}", selector))
            }
            BrowserCommand::Scroll { direction, pixels } => {
                Self::require_open(&state)?;
                let amount = pixels.unwrap_or(self.config.default_scroll_pixels);
                state.driver.scroll(direction, amount).await?;
                match direction {
                    ScrollDirection::Top | ScrollDirection::Bottom => {
                        Ok(format!("Scrolled to {}", direction.as_str()))
                    }
                    _ => Ok(format!("Scrolled {} by {} pixels", direction.as_str(), amount)),
                }
            }
            BrowserCommand::Type { text } => {
                Self::require_open(&state)?;
                state.driver.type_text(&text).await?;
                Ok(format!("Typed: {}", text))
            }
            BrowserCommand::Screenshot => {
                Self::require_open(&state)?;
                let bytes = state.driver.screenshot().await?;
                let path = self.save_screenshot(&bytes).await?;
                Ok(format!("Screenshot saved as {}", path))
            }
        }
    }

    /// Close the browser if it is open. Used by session teardown; never fails.
    pub async fn close(&self) -> String {
        let mut state = self.inner.lock().await;
        Self::close_locked(&mut state).await
    }

    fn require_open(state: &ControllerState) -> Result<(), BrowserError> {
        if state.open.is_some() {
            Ok(())
        } else {
            Err(BrowserError::NotStarted)
        }
    }

    async fn start_locked(
        state: &mut ControllerState,
        headless: bool,
    ) -> Result<String, BrowserError> {
        if state.open.is_some() {
            return Ok("Browser is already running".to_string());
        }
        state
            .driver
            .launch(headless)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;
        state.open = Some(OpenState::default());
        info!(headless, "Browser started");
        Ok("Browser started successfully".to_string())
    }

    /// Idempotent close. The resource is never assumed Open after a close
    /// attempt, so a driver failure here is logged and the state forced.
    async fn close_locked(state: &mut ControllerState) -> String {
        if state.open.take().is_some() {
            if let Err(e) = state.driver.close().await {
                warn!("Browser release failed, forcing Closed state: {}", e);
            } else {
                info!("Browser closed");
            }
        }
        "Browser closed successfully".to_string()
    }

    async fn navigate_locked(
        &self,
        state: &mut ControllerState,
        url: &str,
    ) -> Result<String, BrowserError> {
        Self::require_open(state)?;
        let timeout_ms = self.config.navigation_timeout_ms;
        let result = tokio::time::timeout(
            Duration::from_millis(timeout_ms),
            state.driver.navigate(url),
        )
        .await
        .map_err(|_| BrowserError::NavigationTimeout {
            url: url.to_string(),
            timeout_ms,
        })??;

        if let Some(open) = state.open.as_mut() {
            open.current_url = Some(result.url.clone());
        }
        Ok(result.url)
    }

    /// Click with a bounded retry budget for elements that are not yet
    /// present. Other driver failures are not retried.
    async fn click_locked(
        &self,
        state: &mut ControllerState,
        selector: &str,
    ) -> Result<(), BrowserError> {
        let attempts = self.config.click_attempts.max(1);
        let mut attempt = 1;
        loop {
            match state.driver.click(selector).await {
                Ok(()) => return Ok(()),
                Err(DriverError::ElementNotFound(sel)) => {
                    if attempt >= attempts {
                        return Err(BrowserError::ElementNotFound(sel));
                    }
                    let backoff = self.config.click_backoff_ms * u64::from(attempt);
                    tokio::time::sleep(Duration::from_millis(backoff)).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn join_meeting_locked(
        &self,
        state: &mut ControllerState,
        url: &str,
        platform: MeetingPlatform,
    ) -> Result<String, BrowserError> {
        self.navigate_locked(state, url).await?;
        adapter_for(platform)
            .pre_join(state.driver.as_mut())
            .await?;
        match platform {
            MeetingPlatform::Generic => Ok(format!("Joined meeting at {}", url)),
            known => Ok(format!("Joined {} meeting at {}", known.as_str(), url)),
        }
    }

    async fn save_screenshot(&self, bytes: &[u8]) -> Result<String, BrowserError> {
        let dir = &self.config.screenshot_dir;
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| BrowserError::Driver(format!("Screenshot dir: {}", e)))?;
        let path = dir.join(format!("screenshot_{}.png", Utc::now().timestamp_millis()));
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| BrowserError::Driver(format!("Screenshot write: {}", e)))?;
        Ok(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::NavigationResult;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::Mutex as StdMutex;

    #[derive(Default)]
    struct MockLog {
        launches: Vec<bool>,
        closes: u32,
        clicks: Vec<String>,
        click_failures_remaining: u32,
        navigate_delay: Option<Duration>,
        fail_launch: bool,
        fail_close: bool,
        fail_type_no_focus: bool,
    }

    #[derive(Clone, Default)]
    struct MockDriver {
        log: Arc<StdMutex<MockLog>>,
    }

    #[async_trait]
    impl BrowserDriver for MockDriver {
        async fn launch(&mut self, headless: bool) -> Result<(), DriverError> {
            let mut log = self.log.lock().unwrap();
            if log.fail_launch {
                return Err(DriverError::Launch("no chrome".into()));
            }
            log.launches.push(headless);
            Ok(())
        }

        async fn close(&mut self) -> Result<(), DriverError> {
            let mut log = self.log.lock().unwrap();
            log.closes += 1;
            if log.fail_close {
                return Err(DriverError::Protocol("connection lost".into()));
            }
            Ok(())
        }

        async fn navigate(&mut self, url: &str) -> Result<NavigationResult, DriverError> {
            let delay = self.log.lock().unwrap().navigate_delay;
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            Ok(NavigationResult {
                url: url.to_string(),
                title: "page".to_string(),
            })
        }

        async fn click(&mut self, selector: &str) -> Result<(), DriverError> {
            let mut log = self.log.lock().unwrap();
            log.clicks.push(selector.to_string());
            if log.click_failures_remaining > 0 {
                log.click_failures_remaining -= 1;
                return Err(DriverError::ElementNotFound(selector.to_string()));
            }
            Ok(())
        }

        async fn scroll(
            &mut self,
            _direction: ScrollDirection,
            _pixels: u32,
        ) -> Result<(), DriverError> {
            Ok(())
        }

        async fn type_text(&mut self, _text: &str) -> Result<(), DriverError> {
            if self.log.lock().unwrap().fail_type_no_focus {
                return Err(DriverError::NoActiveElement);
            }
            Ok(())
        }

        async fn screenshot(&mut self) -> Result<Vec<u8>, DriverError> {
            Ok(vec![0x89, 0x50, 0x4e, 0x47])
        }
    }

    fn controller(driver: MockDriver) -> BrowserController {
        let config = BrowserConfig {
            click_backoff_ms: 1,
            ..BrowserConfig::default()
        };
        BrowserController::new(Box::new(driver), config)
    }

    #[tokio::test]
    async fn actions_require_open_browser() {
        let ctl = controller(MockDriver::default());
        let err = ctl
            .execute(BrowserCommand::Click {
                selector: "button".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, BrowserError::NotStarted));
        assert!(!ctl.is_open().await);
    }

    #[tokio::test]
    async fn start_is_noop_when_open() {
        let driver = MockDriver::default();
        let ctl = controller(driver.clone());
        ctl.execute(BrowserCommand::Start { headless: true })
            .await
            .unwrap();
        let msg = ctl
            .execute(BrowserCommand::Start { headless: false })
            .await
            .unwrap();
        assert_eq!(msg, "Browser is already running");
        assert_eq!(driver.log.lock().unwrap().launches, vec![true]);
    }

    #[tokio::test]
    async fn launch_failure_stays_closed() {
        let driver = MockDriver::default();
        driver.log.lock().unwrap().fail_launch = true;
        let ctl = controller(driver);
        let err = ctl
            .execute(BrowserCommand::Start { headless: false })
            .await
            .unwrap_err();
        assert!(matches!(err, BrowserError::Launch(_)));
        assert!(!ctl.is_open().await);
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let driver = MockDriver::default();
        let ctl = controller(driver.clone());
        ctl.execute(BrowserCommand::Start { headless: true })
            .await
            .unwrap();
        assert_eq!(
            ctl.execute(BrowserCommand::Close).await.unwrap(),
            "Browser closed successfully"
        );
        assert_eq!(
            ctl.execute(BrowserCommand::Close).await.unwrap(),
            "Browser closed successfully"
        );
        assert!(!ctl.is_open().await);
        // The driver is released only once.
        assert_eq!(driver.log.lock().unwrap().closes, 1);
    }

    #[tokio::test]
    async fn close_failure_still_forces_closed() {
        let driver = MockDriver::default();
        driver.log.lock().unwrap().fail_close = true;
        let ctl = controller(driver);
        ctl.execute(BrowserCommand::Start { headless: true })
            .await
            .unwrap();
        ctl.execute(BrowserCommand::Close).await.unwrap();
        assert!(!ctl.is_open().await);
    }

    #[tokio::test]
    async fn click_retries_until_element_appears() {
        let driver = MockDriver::default();
        driver.log.lock().unwrap().click_failures_remaining = 2;
        let ctl = controller(driver.clone());
        ctl.execute(BrowserCommand::Start { headless: true })
            .await
            .unwrap();
        let msg = ctl
            .execute(BrowserCommand::Click {
                selector: ".late".into(),
            })
            .await
            .unwrap();
        assert_eq!(msg, "Clicked .late");
        assert_eq!(driver.log.lock().unwrap().clicks.len(), 3);
    }

    #[tokio::test]
    async fn click_gives_up_after_budget() {
        let driver = MockDriver::default();
        driver.log.lock().unwrap().click_failures_remaining = u32::MAX;
        let ctl = controller(driver.clone());
        ctl.execute(BrowserCommand::Start { headless: true })
            .await
            .unwrap();
        let err = ctl
            .execute(BrowserCommand::Click {
                selector: ".ghost".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, BrowserError::ElementNotFound(_)));
        assert_eq!(driver.log.lock().unwrap().clicks.len(), 3);
    }

    #[tokio::test]
    async fn navigate_times_out_within_budget() {
        let driver = MockDriver::default();
        driver.log.lock().unwrap().navigate_delay = Some(Duration::from_millis(500));
        let config = BrowserConfig {
            navigation_timeout_ms: 50,
            ..BrowserConfig::default()
        };
        let ctl = BrowserController::new(Box::new(driver), config);
        ctl.execute(BrowserCommand::Start { headless: true })
            .await
            .unwrap();
        let err = ctl
            .execute(BrowserCommand::Navigate {
                url: "https://slow.example/".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, BrowserError::NavigationTimeout { .. }));
        // The page never loaded, so no URL is recorded; the browser stays Open.
        assert!(ctl.current_url().await.is_none());
        assert!(ctl.is_open().await);
    }

    #[tokio::test]
    async fn type_without_focused_element_fails() {
        let driver = MockDriver::default();
        driver.log.lock().unwrap().fail_type_no_focus = true;
        let ctl = controller(driver);
        ctl.execute(BrowserCommand::Start { headless: true })
            .await
            .unwrap();
        let err = ctl
            .execute(BrowserCommand::Type { text: "hi".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, BrowserError::NoActiveElement));
    }

    #[tokio::test]
    async fn navigate_updates_current_url() {
        let ctl = controller(MockDriver::default());
        ctl.execute(BrowserCommand::Start { headless: true })
            .await
            .unwrap();
        ctl.execute(BrowserCommand::Navigate {
            url: "https://example.com/".into(),
        })
        .await
        .unwrap();
        assert_eq!(ctl.current_url().await.as_deref(), Some("https://example.com/"));
    }

    #[tokio::test]
    async fn generic_join_only_navigates() {
        let driver = MockDriver::default();
        let ctl = controller(driver.clone());
        ctl.execute(BrowserCommand::Start { headless: true })
            .await
            .unwrap();
        let msg = ctl
            .execute(BrowserCommand::JoinMeeting {
                url: "https://example.com/room".into(),
                platform: MeetingPlatform::Generic,
            })
            .await
            .unwrap();
        assert_eq!(msg, "Joined meeting at https://example.com/room");
        assert!(driver.log.lock().unwrap().clicks.is_empty());
    }

    #[tokio::test]
    async fn zoom_join_presses_join_button() {
        let driver = MockDriver::default();
        let ctl = controller(driver.clone());
        ctl.execute(BrowserCommand::Start { headless: true })
            .await
            .unwrap();
        let msg = ctl
            .execute(BrowserCommand::JoinMeeting {
                url: "https://zoom.us/j/123".into(),
                platform: MeetingPlatform::Zoom,
            })
            .await
            .unwrap();
        assert_eq!(msg, "Joined Zoom meeting at https://zoom.us/j/123");
        assert_eq!(driver.log.lock().unwrap().clicks.len(), 1);
    }

    #[tokio::test]
    async fn zoom_join_tolerates_missing_join_button() {
        let driver = MockDriver::default();
        driver.log.lock().unwrap().click_failures_remaining = u32::MAX;
        let ctl = controller(driver);
        ctl.execute(BrowserCommand::Start { headless: true })
            .await
            .unwrap();
        // Pre-join steps are best-effort; the join still reports success.
        ctl.execute(BrowserCommand::JoinMeeting {
            url: "https://zoom.us/j/123".into(),
            platform: MeetingPlatform::Zoom,
        })
        .await
        .unwrap();
    }
}
