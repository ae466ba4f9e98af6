//! Fallback backend for targets without a known application-services API.
//! Actions fail with `UnsupportedPlatform`; queries report nothing.

use super::AppServices;
use crate::error::{AppServicesError, Result};
use crate::types::{FrontmostApp, RunningApp};

pub struct UnsupportedServices;

impl UnsupportedServices {
    fn refuse<T>(operation: &str) -> Result<T> {
        Err(AppServicesError::UnsupportedPlatform(format!(
            "{} on {}",
            operation,
            std::env::consts::OS
        )))
    }
}

impl AppServices for UnsupportedServices {
    fn name(&self) -> &'static str {
        "unsupported"
    }

    fn open_file(&self, _path: &str) -> Result<()> {
        Self::refuse("open_file")
    }

    fn open_url(&self, _url: &str) -> Result<()> {
        Self::refuse("open_url")
    }

    fn launch_application(&self, _bundle_identifier: &str) -> Result<()> {
        Self::refuse("launch_application")
    }

    fn application_path(&self, _bundle_identifier: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn running_applications(&self) -> Result<Vec<RunningApp>> {
        Ok(Vec::new())
    }

    fn hide_application(&self, _bundle_identifier: &str) -> Result<()> {
        Self::refuse("hide_application")
    }

    fn unhide_application(&self, _bundle_identifier: &str) -> Result<()> {
        Self::refuse("unhide_application")
    }

    fn frontmost_application(&self) -> Result<Option<FrontmostApp>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions_are_refused() {
        let services = UnsupportedServices;
        assert!(matches!(
            services.open_url("https://example.com"),
            Err(AppServicesError::UnsupportedPlatform(_))
        ));
        assert!(services.launch_application("com.example.App").is_err());
        assert!(services.hide_application("com.example.App").is_err());
    }

    #[test]
    fn test_queries_are_empty() {
        let services = UnsupportedServices;
        assert!(services.application_path("com.example.App").unwrap().is_none());
        assert!(services.running_applications().unwrap().is_empty());
        assert!(services.frontmost_application().unwrap().is_none());
    }
}
