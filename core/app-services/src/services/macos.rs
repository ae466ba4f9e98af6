//! macOS backend over `NSWorkspace` and `NSRunningApplication`.
//!
//! Every call runs in its own autorelease pool so callers on plain threads
//! (C clients, the CLI) never accumulate autoreleased Foundation objects.

use super::AppServices;
use crate::error::{AppServicesError, Result};
use crate::types::{format_launch_date, FrontmostApp, RunningApp};
use objc2::rc::{autoreleasepool, Retained};
use objc2_app_kit::{NSRunningApplication, NSWorkspace};
use objc2_foundation::{NSString, NSURL};

pub struct MacServices;

impl MacServices {
    pub fn new() -> Self {
        Self
    }

    fn workspace() -> Retained<NSWorkspace> {
        unsafe { NSWorkspace::sharedWorkspace() }
    }

    fn application_url(bundle_identifier: &str) -> Option<Retained<NSURL>> {
        let identifier = NSString::from_str(bundle_identifier);
        unsafe { Self::workspace().URLForApplicationWithBundleIdentifier(&identifier) }
    }

    fn first_running(bundle_identifier: &str) -> Option<Retained<NSRunningApplication>> {
        let identifier = NSString::from_str(bundle_identifier);
        let apps =
            unsafe { NSRunningApplication::runningApplicationsWithBundleIdentifier(&identifier) };
        apps.to_vec_retained().into_iter().next()
    }

    fn open(url: &NSURL, what: &str) -> Result<()> {
        if unsafe { Self::workspace().openURL(url) } {
            Ok(())
        } else {
            Err(AppServicesError::OperationRefused(format!(
                "NSWorkspace could not open {}",
                what
            )))
        }
    }

    fn describe(app: &NSRunningApplication) -> Option<RunningApp> {
        unsafe {
            let bundle_identifier = app.bundleIdentifier()?.to_string();
            let localized_name = app
                .localizedName()
                .map(|n| n.to_string())
                .unwrap_or_else(|| bundle_identifier.clone());
            let executable_path = app
                .executableURL()
                .and_then(|url| url.path())
                .map(|p| p.to_string())
                .unwrap_or_default();
            let launch_date = app
                .launchDate()
                .and_then(|date| format_launch_date(date.timeIntervalSince1970()));

            Some(RunningApp {
                bundle_identifier,
                localized_name,
                executable_path,
                process_identifier: app.processIdentifier().max(0) as u32,
                launch_date,
            })
        }
    }

    fn set_hidden(bundle_identifier: &str, hidden: bool) -> Result<()> {
        autoreleasepool(|_| {
            let app = Self::first_running(bundle_identifier)
                .ok_or_else(|| AppServicesError::NotRunning(bundle_identifier.to_string()))?;
            let accepted = unsafe {
                if hidden {
                    app.hide()
                } else {
                    app.unhide()
                }
            };
            if accepted {
                Ok(())
            } else {
                Err(AppServicesError::OperationRefused(format!(
                    "{} request for {}",
                    if hidden { "hide" } else { "unhide" },
                    bundle_identifier
                )))
            }
        })
    }
}

impl Default for MacServices {
    fn default() -> Self {
        Self::new()
    }
}

impl AppServices for MacServices {
    fn name(&self) -> &'static str {
        "macos"
    }

    fn open_file(&self, path: &str) -> Result<()> {
        autoreleasepool(|_| {
            let url = unsafe { NSURL::fileURLWithPath(&NSString::from_str(path)) };
            Self::open(&url, path)
        })
    }

    fn open_url(&self, url: &str) -> Result<()> {
        autoreleasepool(|_| {
            let ns_url = unsafe { NSURL::URLWithString(&NSString::from_str(url)) }.ok_or_else(
                || AppServicesError::InvalidUrl {
                    url: url.to_string(),
                    reason: "rejected by NSURL".to_string(),
                },
            )?;
            Self::open(&ns_url, url)
        })
    }

    fn launch_application(&self, bundle_identifier: &str) -> Result<()> {
        autoreleasepool(|_| {
            // Opening the bundle URL launches the app, or activates it if already running.
            let app_url = Self::application_url(bundle_identifier).ok_or_else(|| {
                AppServicesError::ApplicationNotFound(bundle_identifier.to_string())
            })?;
            Self::open(&app_url, bundle_identifier).map_err(|e| AppServicesError::LaunchFailed {
                identifier: bundle_identifier.to_string(),
                details: e.to_string(),
            })
        })
    }

    fn application_path(&self, bundle_identifier: &str) -> Result<Option<String>> {
        Ok(autoreleasepool(|_| {
            Self::application_url(bundle_identifier)
                .and_then(|url| unsafe { url.path() })
                .map(|p| p.to_string())
        }))
    }

    fn running_applications(&self) -> Result<Vec<RunningApp>> {
        Ok(autoreleasepool(|_| {
            let apps = unsafe { Self::workspace().runningApplications() };
            apps.iter().filter_map(Self::describe).collect()
        }))
    }

    fn hide_application(&self, bundle_identifier: &str) -> Result<()> {
        Self::set_hidden(bundle_identifier, true)
    }

    fn unhide_application(&self, bundle_identifier: &str) -> Result<()> {
        Self::set_hidden(bundle_identifier, false)
    }

    fn frontmost_application(&self) -> Result<Option<FrontmostApp>> {
        Ok(autoreleasepool(|_| {
            unsafe { Self::workspace().frontmostApplication() }
                .and_then(|app| Self::describe(&app))
                .map(FrontmostApp::from)
        }))
    }
}
