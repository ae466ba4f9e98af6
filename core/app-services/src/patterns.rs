//! Compiled regex patterns for parsing desktop entry files.
//!
//! Compiled once on first use. They approximate the freedesktop.org
//! desktop-entry grammar; only the parts the backend reads are covered.

use once_cell::sync::Lazy;
use regex::Regex;

/// `Key=Value` line; localized keys (`Name[de]`) are captured with the locale.
pub static RE_ENTRY_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z0-9-]+)(\[[^\]]+\])?\s*=\s*(.*)$").unwrap());

/// `[Group Name]` header.
pub static RE_GROUP_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[([^\]]+)\]\s*$").unwrap());

/// Exec field codes (`%f`, `%U`, ...). `%%` is handled separately.
pub static RE_EXEC_FIELD_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"%[fFuUdDnNickvm]").unwrap());
