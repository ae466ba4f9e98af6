//! C-linkage surface, declared in `include/app_services.h`.
//!
//! Nine functions with the camelCase names C callers link against. Every failure collapses
//! to `false` or a null pointer; the cause goes to the `tracing` log only.
//!
//! ## Ownership
//!
//! Strings returned by `getApplicationPath`, `getRunningApplications` and
//! `getFrontmostApplication` are allocated here and owned by the caller,
//! who must hand each one back to `freeString` exactly once.
//!
//! ## Inputs
//!
//! Null or non-UTF-8 argument pointers are treated as invalid input (false /
//! null), never dereferenced beyond the NUL terminator. Panics are caught at
//! the boundary and reported the same way.

#![allow(non_snake_case)]

use crate::config::load_services_config;
use crate::engine;
use crate::error::Result;
use crate::services::{platform_services, AppServices};
use std::ffi::{c_char, CStr, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;

// ─────────────────────────────────────────────────────────────────────────────
// Boundary helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Borrows a caller-owned C string as `&str`.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that stays valid
/// for the duration of the call.
unsafe fn borrow_arg<'a>(ptr: *const c_char, operation: &str) -> Option<&'a str> {
    if ptr.is_null() {
        tracing::warn!(operation, "Null argument");
        return None;
    }
    match CStr::from_ptr(ptr).to_str() {
        Ok(s) => Some(s),
        Err(e) => {
            tracing::warn!(operation, error = %e, "Argument is not valid UTF-8");
            None
        }
    }
}

/// Hands a string to the caller. Interior NULs cannot cross the boundary.
fn into_owned_ptr(value: String, operation: &str) -> *mut c_char {
    match CString::new(value) {
        Ok(c) => c.into_raw(),
        Err(e) => {
            tracing::warn!(operation, error = %e, "Result contains an interior NUL");
            ptr::null_mut()
        }
    }
}

/// Runs `f`, logging errors and panics, and returning `fallback` on either.
fn guarded<T>(operation: &str, fallback: T, f: impl FnOnce() -> Result<T>) -> T {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => value,
        Ok(Err(e)) => {
            tracing::warn!(operation, error = %e, "Operation failed");
            fallback
        }
        Err(_) => {
            tracing::error!(operation, "Panic caught at C boundary");
            fallback
        }
    }
}

fn services() -> Box<dyn AppServices> {
    platform_services(&load_services_config())
}

// ─────────────────────────────────────────────────────────────────────────────
// Backend-generic bodies (also driven directly by tests)
// ─────────────────────────────────────────────────────────────────────────────

fn bool_action(
    services: &dyn AppServices,
    operation: &str,
    arg: Option<&str>,
    action: impl FnOnce(&dyn AppServices, &str) -> Result<()>,
) -> bool {
    let Some(arg) = arg else {
        return false;
    };
    tracing::debug!(operation, backend = services.name(), arg, "C call");
    guarded(operation, false, || action(services, arg).map(|()| true))
}

fn application_path_ptr(services: &dyn AppServices, id: Option<&str>) -> *mut c_char {
    let Some(id) = id else {
        return ptr::null_mut();
    };
    guarded("getApplicationPath", ptr::null_mut(), || {
        Ok(engine::application_path(services, id)?
            .map(|path| into_owned_ptr(path, "getApplicationPath"))
            .unwrap_or(ptr::null_mut()))
    })
}

fn running_applications_ptr(services: &dyn AppServices) -> *mut c_char {
    guarded("getRunningApplications", ptr::null_mut(), || {
        let json = engine::running_applications_json(services)?;
        Ok(into_owned_ptr(json, "getRunningApplications"))
    })
}

fn frontmost_application_ptr(services: &dyn AppServices) -> *mut c_char {
    guarded("getFrontmostApplication", ptr::null_mut(), || {
        Ok(engine::frontmost_application_json(services)?
            .map(|json| into_owned_ptr(json, "getFrontmostApplication"))
            .unwrap_or(ptr::null_mut()))
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Exported functions
// ─────────────────────────────────────────────────────────────────────────────

/// Opens the file at `filePath` with its default application.
///
/// # Safety
/// `filePath` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn openFile(filePath: *const c_char) -> bool {
    let arg = borrow_arg(filePath, "openFile");
    bool_action(services().as_ref(), "openFile", arg, engine::open_file)
}

/// Opens `urlString` with its default handler.
///
/// # Safety
/// `urlString` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn openURL(urlString: *const c_char) -> bool {
    let arg = borrow_arg(urlString, "openURL");
    bool_action(services().as_ref(), "openURL", arg, engine::open_url)
}

/// Launches (or activates) the application with `bundleIdentifier`.
///
/// # Safety
/// `bundleIdentifier` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn launchApplication(bundleIdentifier: *const c_char) -> bool {
    let arg = borrow_arg(bundleIdentifier, "launchApplication");
    bool_action(
        services().as_ref(),
        "launchApplication",
        arg,
        engine::launch_application,
    )
}

/// Installation path of the application, or null if it is not installed.
/// The result must be released with `freeString`.
///
/// # Safety
/// `bundleIdentifier` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn getApplicationPath(bundleIdentifier: *const c_char) -> *mut c_char {
    let arg = borrow_arg(bundleIdentifier, "getApplicationPath");
    application_path_ptr(services().as_ref(), arg)
}

/// JSON array describing the running applications, or null on failure.
/// The result must be released with `freeString`.
#[no_mangle]
pub extern "C" fn getRunningApplications() -> *mut c_char {
    running_applications_ptr(services().as_ref())
}

/// Hides every window of the running application.
///
/// # Safety
/// `bundleIdentifier` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn hideApplication(bundleIdentifier: *const c_char) -> bool {
    let arg = borrow_arg(bundleIdentifier, "hideApplication");
    bool_action(
        services().as_ref(),
        "hideApplication",
        arg,
        engine::hide_application,
    )
}

/// Shows the windows of a previously hidden application.
///
/// # Safety
/// `bundleIdentifier` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn unhideApplication(bundleIdentifier: *const c_char) -> bool {
    let arg = borrow_arg(bundleIdentifier, "unhideApplication");
    bool_action(
        services().as_ref(),
        "unhideApplication",
        arg,
        engine::unhide_application,
    )
}

/// JSON object for the application holding focus, or null if unknown.
/// The result must be released with `freeString`.
#[no_mangle]
pub extern "C" fn getFrontmostApplication() -> *mut c_char {
    frontmost_application_ptr(services().as_ref())
}

/// Releases a string returned by one of the query functions. Null is ignored.
///
/// # Safety
/// `string` must be null or a pointer returned by this library that has
/// not been released yet. Passing it twice is undefined behavior.
#[no_mangle]
pub unsafe extern "C" fn freeString(string: *mut c_char) {
    if string.is_null() {
        return;
    }
    drop(CString::from_raw(string));
}
