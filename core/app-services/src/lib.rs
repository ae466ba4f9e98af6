//! # app-services
//!
//! Desktop application services (open files and URLs, launch, hide and
//! inspect applications) behind two surfaces:
//!
//! - **C ABI** (`ffi`): nine `extern "C"` functions returning `bool` or
//!   caller-owned strings released through `freeString`.
//! - **Rust / UniFFI** (`Workspace`): the same operations with owned
//!   `String`s and typed errors.
//!
//! ## Design Principles
//!
//! - **Synchronous**: one blocking OS round trip per call, no retries.
//! - **Stateless**: nothing is cached between calls.
//! - **No added locking**: thread safety is whatever the OS service provides.
//! - **Pluggable backends**: `AppServices` is implemented per platform
//!   (NSWorkspace on macOS, desktop entries on freedesktop systems).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use app_services::Workspace;
//!
//! let workspace = Workspace::new()?;
//! workspace.open_url("https://www.rust-lang.org".to_string())?;
//! let finder = workspace.application_path("com.apple.finder".to_string())?;
//! ```

// UniFFI scaffolding for Swift/Kotlin/Python bindings
uniffi::setup_scaffolding!();

pub mod config;
pub mod engine;
pub mod error;
pub mod ffi;
pub mod patterns;
pub mod services;
pub mod storage;
pub mod types;
pub mod validation;

pub use config::{load_services_config, ServicesConfig};
pub use engine::{frontmost_application_json, running_applications_json, Workspace};
pub use error::{AppServicesError, AppServicesFfiError, Result};
pub use services::{platform_services, AppServices};
pub use storage::StorageConfig;
pub use types::{FrontmostApp, RunningApp};
