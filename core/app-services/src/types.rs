//! Application records returned by the query operations.
//!
//! The JSON form of these types is the wire format of the C surface
//! (`getRunningApplications`, `getFrontmostApplication`), so field names are
//! fixed: camelCase, with the executable under `executableURL`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the running-applications snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct RunningApp {
    pub bundle_identifier: String,
    pub localized_name: String,
    #[serde(rename = "executableURL")]
    pub executable_path: String,
    pub process_identifier: u32,
    /// RFC 3339, UTC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_date: Option<String>,
}

/// The application currently holding input focus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct FrontmostApp {
    pub bundle_identifier: String,
    pub localized_name: String,
    #[serde(rename = "executableURL")]
    pub executable_path: String,
    pub process_identifier: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_date: Option<String>,
}

impl From<RunningApp> for FrontmostApp {
    fn from(app: RunningApp) -> Self {
        Self {
            bundle_identifier: app.bundle_identifier,
            localized_name: app.localized_name,
            executable_path: app.executable_path,
            process_identifier: app.process_identifier,
            launch_date: app.launch_date,
        }
    }
}

/// Formats a Unix timestamp (seconds, fractional allowed) as RFC 3339 UTC.
pub fn format_launch_date(unix_seconds: f64) -> Option<String> {
    if !unix_seconds.is_finite() || unix_seconds < 0.0 {
        return None;
    }
    let secs = unix_seconds.trunc() as i64;
    let nanos = (unix_seconds.fract() * 1_000_000_000.0) as u32;
    DateTime::<Utc>::from_timestamp(secs, nanos)
        .map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
}
