//! Platform-specific meeting join behavior.
//!
//! Each platform gets an adapter that runs its pre-join steps after the
//! meeting page has loaded. Lookup is keyed by [`MeetingPlatform`] with
//! `Generic` as the catch-all, so a miss is impossible by construction.

use crate::driver::BrowserDriver;
use async_trait::async_trait;
use tracing::debug;
use voxdrive_common::error::DriverError;
use voxdrive_common::protocol::MeetingPlatform;

#[async_trait]
pub trait MeetingAdapter: Send + Sync {
    /// Best-effort steps on the loaded meeting page: dismiss camera and
    /// microphone prompts, press the join control. A missing element is not a
    /// failure -- meeting pages vary and the navigate already succeeded.
    async fn pre_join(&self, driver: &mut dyn BrowserDriver) -> Result<(), DriverError>;
}

pub fn adapter_for(platform: MeetingPlatform) -> &'static dyn MeetingAdapter {
    match platform {
        MeetingPlatform::Zoom => &ZoomAdapter,
        MeetingPlatform::GoogleMeet => &GoogleMeetAdapter,
        MeetingPlatform::Teams => &TeamsAdapter,
        MeetingPlatform::Generic => &GenericAdapter,
    }
}

/// Click a selector if present; element-not-found is tolerated.
async fn click_optional(driver: &mut dyn BrowserDriver, selector: &str) -> Result<(), DriverError> {
    match driver.click(selector).await {
        Ok(()) => Ok(()),
        Err(DriverError::ElementNotFound(_)) => {
            debug!(selector, "Pre-join element absent, skipping");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

struct ZoomAdapter;

#[async_trait]
impl MeetingAdapter for ZoomAdapter {
    async fn pre_join(&self, driver: &mut dyn BrowserDriver) -> Result<(), DriverError> {
        // Zoom's web client shows a join button once the page settles.
        click_optional(driver, "button[data-testid='join-button']").await
    }
}

struct GoogleMeetAdapter;

#[async_trait]
impl MeetingAdapter for GoogleMeetAdapter {
    async fn pre_join(&self, driver: &mut dyn BrowserDriver) -> Result<(), DriverError> {
        // Dismiss the camera/microphone dialog before joining.
        click_optional(driver, "button[data-mdc-dialog-action='camera']").await?;
        click_optional(driver, "button[data-mdc-dialog-action='join']").await
    }
}

struct TeamsAdapter;

#[async_trait]
impl MeetingAdapter for TeamsAdapter {
    async fn pre_join(&self, driver: &mut dyn BrowserDriver) -> Result<(), DriverError> {
        click_optional(driver, "button[data-testid='join-button']").await
    }
}

/// Unknown hosts: the navigate step is the whole join.
struct GenericAdapter;

#[async_trait]
impl MeetingAdapter for GenericAdapter {
    async fn pre_join(&self, _driver: &mut dyn BrowserDriver) -> Result<(), DriverError> {
        Ok(())
    }
}
