//! appctl: command-line front end for app-services.
//!
//! Thin wrapper over `app_services::Workspace`, handy for checking what a C
//! client would see on this machine.
//!
//! ```bash
//! appctl running
//! appctl launch com.apple.Safari
//! appctl path com.apple.finder
//! appctl open-url https://www.rust-lang.org
//! ```

mod commands;
mod logging;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "appctl")]
#[command(about = "Open files and URLs, launch and inspect desktop applications")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a file with its default application
    OpenFile {
        #[arg(value_name = "PATH")]
        path: String,
    },

    /// Open a URL with its default handler
    OpenUrl {
        #[arg(value_name = "URL")]
        url: String,
    },

    /// Launch (or activate) an application
    Launch {
        /// Bundle identifier (desktop-entry ID on Linux)
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Print the installation path of an application
    Path {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// List running applications
    Running {
        /// Print the raw JSON snapshot instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Hide all windows of a running application
    Hide {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Show the windows of a hidden application
    Unhide {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Show the application that has input focus
    Frontmost {
        #[arg(long)]
        json: bool,
    },
}

// Returning instead of calling `process::exit` lets the logging guard drop
// and flush the file appender before the process ends.
fn main() -> ExitCode {
    let _logging_guard = logging::init();
    let cli = Cli::parse();
    exit_code(commands::run(cli.command))
}

fn exit_code(result: Result<(), commands::CommandError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "appctl failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code() {
        assert_eq!(exit_code(Ok(())), ExitCode::SUCCESS);
        assert_eq!(
            exit_code(Err(commands::CommandError::NotFound("x".to_string()))),
            ExitCode::FAILURE
        );
    }
}
