//! Integration tests for the C surface, limited to behavior that holds on
//! every desktop: invalid input fails, unknown identifiers resolve to
//! nothing, and returned buffers survive a single release.

use app_services::ffi::{
    freeString, getApplicationPath, getFrontmostApplication, getRunningApplications,
    hideApplication, launchApplication, openFile, openURL, unhideApplication,
};
use std::ffi::{CStr, CString};
use std::ptr;

const UNKNOWN_ID: &str = "com.example.definitely-not-installed";

fn c(s: &str) -> CString {
    CString::new(s).unwrap()
}

#[test]
fn test_open_missing_file_fails() {
    let path = c("/tmp/does-not-exist.txt");
    assert!(!unsafe { openFile(path.as_ptr()) });
}

#[test]
fn test_open_empty_path_fails() {
    let path = c("");
    assert!(!unsafe { openFile(path.as_ptr()) });
}

#[test]
fn test_open_invalid_url_fails() {
    let url = c("not a url");
    assert!(!unsafe { openURL(url.as_ptr()) });
}

#[test]
fn test_unknown_bundle_identifier() {
    let id = c(UNKNOWN_ID);
    assert!(unsafe { getApplicationPath(id.as_ptr()) }.is_null());
    assert!(!unsafe { launchApplication(id.as_ptr()) });
    assert!(!unsafe { hideApplication(id.as_ptr()) });
    assert!(!unsafe { unhideApplication(id.as_ptr()) });
}

#[test]
fn test_null_inputs_fail() {
    assert!(!unsafe { openFile(ptr::null()) });
    assert!(!unsafe { openURL(ptr::null()) });
    assert!(unsafe { getApplicationPath(ptr::null()) }.is_null());
}

#[test]
fn test_running_applications_is_json_array() {
    let raw = getRunningApplications();
    assert!(!raw.is_null());

    let json = unsafe { CStr::from_ptr(raw) }.to_str().unwrap().to_owned();
    unsafe { freeString(raw) };

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let apps = value.as_array().expect("running applications must be an array");
    for app in apps {
        assert!(app["bundleIdentifier"].is_string());
        assert!(app["localizedName"].is_string());
        assert!(app["executableURL"].is_string());
        assert!(app["processIdentifier"].is_u64());
    }
}

#[test]
fn test_frontmost_application_is_null_or_object() {
    let raw = getFrontmostApplication();
    if raw.is_null() {
        return;
    }
    let json = unsafe { CStr::from_ptr(raw) }.to_str().unwrap().to_owned();
    unsafe { freeString(raw) };

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value["bundleIdentifier"].is_string());
}

#[test]
fn test_free_null_string() {
    unsafe { freeString(ptr::null_mut()) };
}
