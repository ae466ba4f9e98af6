//! Platform backends for the application-services operations.
//! Add new platforms in `platform_services` so every client picks them up.

#[cfg(all(unix, not(target_os = "macos")))]
mod freedesktop;
#[cfg(target_os = "macos")]
mod macos;
mod unsupported;

#[cfg(all(unix, not(target_os = "macos")))]
pub use freedesktop::{DesktopEntry, FreedesktopServices};
#[cfg(target_os = "macos")]
pub use macos::MacServices;
pub use unsupported::UnsupportedServices;

use crate::config::ServicesConfig;
use crate::error::Result;
use crate::types::{FrontmostApp, RunningApp};

/// One desktop's application/workspace service.
///
/// Implementors should:
/// - Do exactly one synchronous round trip per call, with no retries
/// - Report "not installed" / "not running" as errors, not panics
/// - Assume inputs were already checked by `crate::validation`
pub trait AppServices: Send + Sync {
    /// Short backend identifier for logs (e.g., "macos", "freedesktop")
    fn name(&self) -> &'static str;

    /// Open a file with its default handler
    fn open_file(&self, path: &str) -> Result<()>;

    /// Open a URL with its default handler
    fn open_url(&self, url: &str) -> Result<()>;

    /// Launch the application, or activate it if already running
    fn launch_application(&self, bundle_identifier: &str) -> Result<()>;

    /// Installation path of the application; None if not installed
    fn application_path(&self, bundle_identifier: &str) -> Result<Option<String>>;

    /// Point-in-time snapshot of running applications
    fn running_applications(&self) -> Result<Vec<RunningApp>>;

    fn hide_application(&self, bundle_identifier: &str) -> Result<()>;

    fn unhide_application(&self, bundle_identifier: &str) -> Result<()>;

    /// Application holding input focus; None if it cannot be determined
    fn frontmost_application(&self) -> Result<Option<FrontmostApp>>;
}

/// Builds the backend for the platform this crate was compiled for.
#[cfg(target_os = "macos")]
pub fn platform_services(_config: &ServicesConfig) -> Box<dyn AppServices> {
    Box::new(MacServices::new())
}

#[cfg(all(unix, not(target_os = "macos")))]
pub fn platform_services(config: &ServicesConfig) -> Box<dyn AppServices> {
    Box::new(FreedesktopServices::from_config(config))
}

#[cfg(not(unix))]
pub fn platform_services(_config: &ServicesConfig) -> Box<dyn AppServices> {
    Box::new(UnsupportedServices)
}


#[cfg(test)]
mod tests {
    use super::test_utils::FakeServices;
    use super::*;

    #[test]
    fn test_platform_services_has_a_name() {
        let services = platform_services(&ServicesConfig::default());
        assert!(!services.name().is_empty());
    }

    #[test]
    fn test_fake_launch_marks_running() {
        let fake = FakeServices::new().with_app("com.example.Editor", "Editor", false);
        assert!(fake.running_applications().unwrap().is_empty());

        fake.launch_application("com.example.Editor").unwrap();
        let running = fake.running_applications().unwrap();
        assert_eq!(running.len(), 1);
        assert_eq!(running[0].bundle_identifier, "com.example.Editor");
    }

    #[test]
    fn test_fake_hide_requires_running() {
        let fake = FakeServices::new().with_app("com.example.Editor", "Editor", false);
        assert!(fake.hide_application("com.example.Editor").is_err());
    }
}
