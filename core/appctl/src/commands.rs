//! Subcommand handlers.

use crate::Commands;
use app_services::{AppServicesFfiError, RunningApp, Workspace};
use std::io::{self, Write};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Services(#[from] AppServicesFfiError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    NotFound(String),
}

pub(crate) fn run(command: Commands) -> Result<(), CommandError> {
    let workspace = Workspace::new()?;
    tracing::debug!(backend = %workspace.backend_name(), "Using backend");
    let mut out = io::stdout().lock();

    match command {
        Commands::OpenFile { path } => {
            workspace.open_file(path.clone())?;
            writeln!(out, "Opened {}", path)?;
        }
        Commands::OpenUrl { url } => {
            workspace.open_url(url.clone())?;
            writeln!(out, "Opened {}", url)?;
        }
        Commands::Launch { id } => {
            workspace.launch_application(id.clone())?;
            writeln!(out, "Launched {}", id)?;
        }
        Commands::Path { id } => match workspace.application_path(id.clone())? {
            Some(path) => writeln!(out, "{}", path)?,
            None => return Err(CommandError::NotFound(format!("No application for {}", id))),
        },
        Commands::Running { json } => {
            if json {
                writeln!(out, "{}", workspace.running_applications_json()?)?;
            } else {
                write_table(&mut out, &workspace.running_applications()?)?;
            }
        }
        Commands::Hide { id } => {
            workspace.hide_application(id.clone())?;
            writeln!(out, "Hid {}", id)?;
        }
        Commands::Unhide { id } => {
            workspace.unhide_application(id.clone())?;
            writeln!(out, "Unhid {}", id)?;
        }
        Commands::Frontmost { json } => match workspace.frontmost_application()? {
            Some(app) if json => writeln!(out, "{}", serde_json::to_string_pretty(&app)?)?,
            Some(app) => writeln!(
                out,
                "{} ({}) pid {}",
                app.localized_name, app.bundle_identifier, app.process_identifier
            )?,
            None => return Err(CommandError::NotFound("No frontmost application".to_string())),
        },
    }

    Ok(())
}

fn write_table(out: &mut impl Write, apps: &[RunningApp]) -> io::Result<()> {
    if apps.is_empty() {
        return writeln!(out, "(no running applications)");
    }
    for (i, app) in apps.iter().enumerate() {
        writeln!(
            out,
            "{:>3}. {} ({}) pid {}",
            i + 1,
            app.localized_name,
            app.bundle_identifier,
            app.process_identifier
        )?;
    }
    Ok(())
}
