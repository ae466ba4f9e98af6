//! Workspace - the safe entry point for Rust and UniFFI clients.
//!
//! Same nine operations as the C surface in `ffi`, but with owned `String`
//! results and typed errors instead of raw buffers and bare booleans:
//! - **Synchronous**: one blocking round trip per call
//! - **Stateless**: the only state is the backend handle
//! - **Validated**: inputs are checked before the backend sees them
//!
//! ```rust,ignore
//! use app_services::Workspace;
//!
//! let workspace = Workspace::new()?;
//! for app in workspace.running_applications()? {
//!     println!("{} ({})", app.localized_name, app.bundle_identifier);
//! }
//! ```

use crate::config::load_services_config;
use crate::error::{AppServicesError, AppServicesFfiError, Result};
use crate::services::{platform_services, AppServices};
use crate::types::{FrontmostApp, RunningApp};
use crate::validation::{validate_bundle_identifier, validate_file_path, validate_url};
use serde::Serialize;
use std::sync::Arc;

// ─────────────────────────────────────────────────────────────────────────────
// Validated operations shared with the C surface
// ─────────────────────────────────────────────────────────────────────────────

pub(crate) fn open_file(services: &dyn AppServices, path: &str) -> Result<()> {
    validate_file_path(path)?;
    services.open_file(path)
}

pub(crate) fn open_url(services: &dyn AppServices, url: &str) -> Result<()> {
    validate_url(url)?;
    services.open_url(url)
}

pub(crate) fn launch_application(services: &dyn AppServices, id: &str) -> Result<()> {
    validate_bundle_identifier(id)?;
    services.launch_application(id)
}

pub(crate) fn application_path(services: &dyn AppServices, id: &str) -> Result<Option<String>> {
    validate_bundle_identifier(id)?;
    Ok(services
        .application_path(id)?
        .filter(|path| !path.is_empty()))
}

pub(crate) fn hide_application(services: &dyn AppServices, id: &str) -> Result<()> {
    validate_bundle_identifier(id)?;
    services.hide_application(id)
}

pub(crate) fn unhide_application(services: &dyn AppServices, id: &str) -> Result<()> {
    validate_bundle_identifier(id)?;
    services.unhide_application(id)
}

fn to_json<T: Serialize>(value: &T, context: &str) -> Result<String> {
    serde_json::to_string(value).map_err(|source| AppServicesError::Json {
        context: context.to_string(),
        source,
    })
}

/// Running applications as a JSON array (the `getRunningApplications` payload).
pub fn running_applications_json(services: &dyn AppServices) -> Result<String> {
    to_json(
        &services.running_applications()?,
        "serializing running applications",
    )
}

/// Frontmost application as a JSON object; None when focus is unknown.
pub fn frontmost_application_json(services: &dyn AppServices) -> Result<Option<String>> {
    services
        .frontmost_application()?
        .map(|app| to_json(&app, "serializing frontmost application"))
        .transpose()
}

// ─────────────────────────────────────────────────────────────────────────────
// Workspace
// ─────────────────────────────────────────────────────────────────────────────

/// Handle on the desktop's application services.
#[derive(uniffi::Object)]
pub struct Workspace {
    services: Arc<dyn AppServices>,
}

impl Workspace {
    /// Wraps a specific backend. Not exposed to FFI - use `new()` there.
    pub fn with_services(services: Arc<dyn AppServices>) -> Self {
        Self { services }
    }

    pub fn services(&self) -> &dyn AppServices {
        self.services.as_ref()
    }
}

#[uniffi::export]
impl Workspace {
    /// Creates a Workspace over the platform backend, honoring `~/.app-services/config.json`.
    #[uniffi::constructor]
    pub fn new() -> std::result::Result<Self, AppServicesFfiError> {
        let config = load_services_config();
        Ok(Self::with_services(Arc::from(platform_services(&config))))
    }

    /// Name of the backend in use ("macos", "freedesktop", ...).
    pub fn backend_name(&self) -> String {
        self.services.name().to_string()
    }

    pub fn open_file(&self, path: String) -> std::result::Result<(), AppServicesFfiError> {
        open_file(self.services(), &path).map_err(AppServicesFfiError::from)
    }

    pub fn open_url(&self, url: String) -> std::result::Result<(), AppServicesFfiError> {
        open_url(self.services(), &url).map_err(AppServicesFfiError::from)
    }

    pub fn launch_application(
        &self,
        bundle_identifier: String,
    ) -> std::result::Result<(), AppServicesFfiError> {
        launch_application(self.services(), &bundle_identifier).map_err(AppServicesFfiError::from)
    }

    pub fn application_path(
        &self,
        bundle_identifier: String,
    ) -> std::result::Result<Option<String>, AppServicesFfiError> {
        application_path(self.services(), &bundle_identifier).map_err(AppServicesFfiError::from)
    }

    pub fn running_applications(
        &self,
    ) -> std::result::Result<Vec<RunningApp>, AppServicesFfiError> {
        self.services
            .running_applications()
            .map_err(AppServicesFfiError::from)
    }

    pub fn running_applications_json(&self) -> std::result::Result<String, AppServicesFfiError> {
        running_applications_json(self.services()).map_err(AppServicesFfiError::from)
    }

    pub fn hide_application(
        &self,
        bundle_identifier: String,
    ) -> std::result::Result<(), AppServicesFfiError> {
        hide_application(self.services(), &bundle_identifier).map_err(AppServicesFfiError::from)
    }

    pub fn unhide_application(
        &self,
        bundle_identifier: String,
    ) -> std::result::Result<(), AppServicesFfiError> {
        unhide_application(self.services(), &bundle_identifier).map_err(AppServicesFfiError::from)
    }

    pub fn frontmost_application(
        &self,
    ) -> std::result::Result<Option<FrontmostApp>, AppServicesFfiError> {
        self.services
            .frontmost_application()
            .map_err(AppServicesFfiError::from)
    }
}
