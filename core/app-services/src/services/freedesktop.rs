//! freedesktop.org backend (Linux and the BSDs).
//!
//! Applications are desktop entries: the bundle identifier is the
//! desktop-file ID (`org.mozilla.firefox` for
//! `applications/org.mozilla.firefox.desktop`, `kde-foo` for
//! `applications/kde/foo.desktop`). Files and URLs go through an opener
//! command (`xdg-open` unless configured otherwise), and the running
//! application list is the process table matched back to desktop entries.

use super::AppServices;
use crate::config::ServicesConfig;
use crate::error::{AppServicesError, Result};
use crate::patterns::{RE_ENTRY_LINE, RE_EXEC_FIELD_CODE, RE_GROUP_HEADER};
use crate::types::{format_launch_date, FrontmostApp, RunningApp};
use fs_err as fs;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use sysinfo::System;
use walkdir::WalkDir;

const DESKTOP_SUFFIX: &str = ".desktop";

/// The parts of a `.desktop` file this backend uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopEntry {
    pub id: String,
    pub path: PathBuf,
    pub name: String,
    pub exec: Option<String>,
}

impl DesktopEntry {
    /// Parses the `[Desktop Entry]` group. Returns None for non-applications
    /// and entries marked `Hidden=true` (deleted by the user).
    pub fn parse(id: &str, path: &Path, content: &str) -> Option<Self> {
        let mut in_main_group = false;
        let mut name = None;
        let mut exec = None;
        let mut kind = None;
        let mut hidden = false;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(caps) = RE_GROUP_HEADER.captures(line) {
                in_main_group = &caps[1] == "Desktop Entry";
                continue;
            }
            if !in_main_group {
                continue;
            }
            let Some(caps) = RE_ENTRY_LINE.captures(line) else {
                continue;
            };
            // Localized variants (Name[de]) are skipped; the C locale name is enough here.
            if caps.get(2).is_some() {
                continue;
            }
            let value = unescape_value(&caps[3]);
            match &caps[1] {
                "Name" => name = Some(value),
                "Exec" => exec = Some(value),
                "Type" => kind = Some(value),
                "Hidden" => hidden = value == "true",
                _ => {}
            }
        }

        if hidden || kind.as_deref() != Some("Application") {
            return None;
        }

        Some(Self {
            id: id.to_string(),
            path: path.to_path_buf(),
            name: name.unwrap_or_else(|| id.to_string()),
            exec,
        })
    }

    /// Command line from `Exec=`, with field codes removed.
    pub fn argv(&self) -> Vec<String> {
        self.exec.as_deref().map(split_exec).unwrap_or_default()
    }

    /// File name of the program `Exec=` runs, used to match processes.
    pub fn program_name(&self) -> Option<String> {
        let argv = self.argv();
        let program = argv.first()?;
        Path::new(program)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
    }
}

/// Splits an `Exec=` value into arguments.
///
/// Handles double-quoted arguments with backslash escapes, drops field codes
/// (`%f`, `%U`, ...) and turns `%%` into a literal `%`.
pub fn split_exec(exec: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut in_quotes = false;
    let mut chars = exec.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                in_token = true;
            }
            '\\' if in_quotes => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            c if c.is_whitespace() && !in_quotes => {
                if in_token {
                    args.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if in_token {
        args.push(current);
    }

    args.into_iter()
        .filter_map(|arg| {
            let escaped = arg.replace("%%", "\u{0}");
            if RE_EXEC_FIELD_CODE.is_match(&escaped)
                && RE_EXEC_FIELD_CODE.replace_all(&escaped, "").is_empty()
            {
                return None;
            }
            Some(
                RE_EXEC_FIELD_CODE
                    .replace_all(&escaped, "")
                    .replace('\u{0}', "%"),
            )
        })
        .collect()
}

/// Desktop-entry search path, highest precedence first.
pub fn application_dirs(config: &ServicesConfig) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = config
        .extra_application_dirs
        .iter()
        .map(PathBuf::from)
        .collect();

    let data_home = std::env::var_os("XDG_DATA_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")));
    if let Some(data_home) = data_home {
        dirs.push(data_home.join("applications"));
    }

    let data_dirs = std::env::var("XDG_DATA_DIRS")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "/usr/local/share:/usr/share".to_string());
    dirs.extend(
        data_dirs
            .split(':')
            .filter(|d| !d.is_empty())
            .map(|d| Path::new(d).join("applications")),
    );

    dirs
}

/// Process facts needed to match a process to a desktop entry.
#[derive(Debug, Clone)]
pub struct ProcessSample {
    pub pid: u32,
    pub name: String,
    pub exe: Option<PathBuf>,
    pub start_time: u64,
}

/// Matches processes to desktop entries by program file name.
///
/// One record per application; when several processes match, the lowest PID
/// is kept. Output is ordered by PID.
pub fn match_running(entries: &[DesktopEntry], processes: &[ProcessSample]) -> Vec<RunningApp> {
    let mut by_program: HashMap<String, &DesktopEntry> = HashMap::new();
    for entry in entries {
        if let Some(program) = entry.program_name() {
            by_program.entry(program).or_insert(entry);
        }
    }

    let mut found: HashMap<&str, RunningApp> = HashMap::new();
    for process in processes {
        let program = process
            .exe
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| process.name.clone());
        let Some(entry) = by_program.get(&program) else {
            continue;
        };
        let keep = found
            .get(entry.id.as_str())
            .map(|existing| process.pid < existing.process_identifier)
            .unwrap_or(true);
        if keep {
            found.insert(
                entry.id.as_str(),
                RunningApp {
                    bundle_identifier: entry.id.clone(),
                    localized_name: entry.name.clone(),
                    executable_path: process
                        .exe
                        .as_ref()
                        .map(|p| p.to_string_lossy().to_string())
                        .unwrap_or_default(),
                    process_identifier: process.pid,
                    launch_date: format_launch_date(process.start_time as f64),
                },
            );
        }
    }

    let mut apps: Vec<RunningApp> = found.into_values().collect();
    apps.sort_by_key(|a| a.process_identifier);
    apps
}

/// Backend over desktop entries, an opener command and the process table.
pub struct FreedesktopServices {
    application_dirs: Vec<PathBuf>,
    opener: String,
}

impl FreedesktopServices {
    pub fn new(application_dirs: Vec<PathBuf>, opener: impl Into<String>) -> Self {
        Self {
            application_dirs,
            opener: opener.into(),
        }
    }

    pub fn from_config(config: &ServicesConfig) -> Self {
        Self::new(application_dirs(config), config.opener.clone())
    }

    /// All desktop entries on the search path; earlier directories shadow later ones.
    pub fn entries(&self) -> Vec<DesktopEntry> {
        let mut seen = std::collections::HashSet::new();
        let mut entries = Vec::new();
        for dir in &self.application_dirs {
            for (id, path) in desktop_files(dir) {
                if !seen.insert(id.clone()) {
                    continue;
                }
                if let Some(entry) = read_entry(&id, &path) {
                    entries.push(entry);
                }
            }
        }
        entries
    }

    /// Looks up one desktop entry by ID.
    pub fn find_entry(&self, id: &str) -> Option<DesktopEntry> {
        let relative = format!("{}{}", id, DESKTOP_SUFFIX);
        for dir in &self.application_dirs {
            // Fast path: flat layout. Subdirectory IDs fall back to a walk.
            let direct = dir.join(&relative);
            if direct.is_file() {
                return read_entry(id, &direct);
            }
            if let Some((_, path)) = desktop_files(dir).into_iter().find(|(found, _)| found == id) {
                return read_entry(id, &path);
            }
        }
        None
    }

    fn run_opener(&self, target: &str) -> Result<()> {
        let status = Command::new(&self.opener)
            .arg(target)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| AppServicesError::CommandFailed {
                command: self.opener.clone(),
                details: e.to_string(),
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(AppServicesError::CommandFailed {
                command: self.opener.clone(),
                details: format!("exited with {}", status),
            })
        }
    }

    fn process_samples() -> Vec<ProcessSample> {
        let mut system = System::new();
        system.refresh_processes();
        system
            .processes()
            .iter()
            .map(|(pid, process)| ProcessSample {
                pid: pid.as_u32(),
                name: process.name().to_string(),
                exe: process.exe().map(Path::to_path_buf),
                start_time: process.start_time(),
            })
            .collect()
    }

    fn require_running(&self, bundle_identifier: &str) -> Result<()> {
        let running = self.running_applications()?;
        if running
            .iter()
            .any(|app| app.bundle_identifier == bundle_identifier)
        {
            Ok(())
        } else {
            Err(AppServicesError::NotRunning(bundle_identifier.to_string()))
        }
    }
}

fn desktop_files(dir: &Path) -> Vec<(String, PathBuf)> {
    if !dir.is_dir() {
        return Vec::new();
    }
    WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let relative = e.path().strip_prefix(dir).ok()?.to_string_lossy().to_string();
            let stem = relative.strip_suffix(DESKTOP_SUFFIX)?;
            Some((stem.replace('/', "-"), e.path().to_path_buf()))
        })
        .collect()
}

/// Waits for a launched child off-thread so it never lingers as a zombie.
fn reap_in_background(mut child: Child) {
    let spawned = std::thread::Builder::new()
        .name("app-services-reaper".to_string())
        .spawn(move || {
            if let Err(e) = child.wait() {
                tracing::debug!(error = %e, "Failed to reap launched application");
            }
        });
    if let Err(e) = spawned {
        tracing::warn!(error = %e, "Could not start reaper thread");
    }
}

/// Resolves the string-level escapes of a desktop-entry value
/// (`\s`, `\n`, `\t`, `\r`, `\\`). Unknown escapes are kept verbatim.
pub fn unescape_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => out.push(' '),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn read_entry(id: &str, path: &Path) -> Option<DesktopEntry> {
    match fs::read_to_string(path) {
        Ok(content) => DesktopEntry::parse(id, path, &content),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Skipping unreadable desktop entry");
            None
        }
    }
}

impl AppServices for FreedesktopServices {
    fn name(&self) -> &'static str {
        "freedesktop"
    }

    fn open_file(&self, path: &str) -> Result<()> {
        self.run_opener(path)
    }

    fn open_url(&self, url: &str) -> Result<()> {
        self.run_opener(url)
    }

    fn launch_application(&self, bundle_identifier: &str) -> Result<()> {
        let entry = self
            .find_entry(bundle_identifier)
            .ok_or_else(|| AppServicesError::ApplicationNotFound(bundle_identifier.to_string()))?;
        let argv = entry.argv();
        let Some((program, args)) = argv.split_first() else {
            return Err(AppServicesError::LaunchFailed {
                identifier: bundle_identifier.to_string(),
                details: "desktop entry has no Exec line".to_string(),
            });
        };

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| AppServicesError::LaunchFailed {
                identifier: bundle_identifier.to_string(),
                details: e.to_string(),
            })?;
        tracing::debug!(id = bundle_identifier, pid = child.id(), "Launched application");
        reap_in_background(child);
        Ok(())
    }

    fn application_path(&self, bundle_identifier: &str) -> Result<Option<String>> {
        Ok(self
            .find_entry(bundle_identifier)
            .map(|entry| entry.path.to_string_lossy().to_string()))
    }

    fn running_applications(&self) -> Result<Vec<RunningApp>> {
        Ok(match_running(&self.entries(), &Self::process_samples()))
    }

    fn hide_application(&self, bundle_identifier: &str) -> Result<()> {
        self.require_running(bundle_identifier)?;
        Err(AppServicesError::UnsupportedPlatform(
            "hiding windows has no freedesktop API".to_string(),
        ))
    }

    fn unhide_application(&self, bundle_identifier: &str) -> Result<()> {
        self.require_running(bundle_identifier)?;
        Err(AppServicesError::UnsupportedPlatform(
            "unhiding windows has no freedesktop API".to_string(),
        ))
    }

    fn frontmost_application(&self) -> Result<Option<FrontmostApp>> {
        // Focus is owned by the compositor; there is no desktop-neutral query.
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const FIREFOX: &str = "[Desktop Entry]\n\
        Type=Application\n\
        Name=Firefox\n\
        Name[de]=Feuerfuchs\n\
        Exec=/usr/lib/firefox/firefox %u\n\
        \n\
        [Desktop Action new-window]\n\
        Name=New Window\n\
        Exec=/usr/lib/firefox/firefox --new-window %u\n";

    fn write_entry(dir: &Path, relative: &str, content: &str) -> PathBuf {
        let path = dir.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_desktop_entry() {
        let entry =
            DesktopEntry::parse("org.mozilla.firefox", Path::new("/x.desktop"), FIREFOX).unwrap();
        assert_eq!(entry.name, "Firefox");
        assert_eq!(entry.exec.as_deref(), Some("/usr/lib/firefox/firefox %u"));
        assert_eq!(entry.argv(), vec!["/usr/lib/firefox/firefox".to_string()]);
        assert_eq!(entry.program_name().as_deref(), Some("firefox"));
    }

    #[test]
    fn test_parse_skips_hidden_and_links() {
        let hidden = "[Desktop Entry]\nType=Application\nName=Gone\nHidden=true\n";
        assert!(DesktopEntry::parse("gone", Path::new("/g.desktop"), hidden).is_none());

        let link = "[Desktop Entry]\nType=Link\nName=Docs\nURL=https://example.com\n";
        assert!(DesktopEntry::parse("docs", Path::new("/d.desktop"), link).is_none());
    }

    #[test]
    fn test_split_exec() {
        assert_eq!(split_exec("gedit %U"), vec!["gedit"]);
        assert_eq!(
            split_exec(r#""/opt/My App/run" --name "a \"b\"" %f"#),
            vec!["/opt/My App/run", "--name", r#"a "b""#]
        );
        assert_eq!(split_exec("printf 100%%"), vec!["printf", "100%"]);
        assert_eq!(split_exec("tool --file=%f"), vec!["tool", "--file="]);
        assert!(split_exec("   ").is_empty());
    }

    #[test]
    fn test_find_entry_flat_and_nested() {
        let temp = tempdir().unwrap();
        let flat = write_entry(temp.path(), "org.mozilla.firefox.desktop", FIREFOX);
        let nested = write_entry(
            temp.path(),
            "kde/konsole.desktop",
            "[Desktop Entry]\nType=Application\nName=Konsole\nExec=konsole\n",
        );
        let services = FreedesktopServices::new(vec![temp.path().to_path_buf()], "true");

        assert_eq!(
            services.application_path("org.mozilla.firefox").unwrap(),
            Some(flat.to_string_lossy().to_string())
        );
        assert_eq!(
            services.application_path("kde-konsole").unwrap(),
            Some(nested.to_string_lossy().to_string())
        );
        assert_eq!(services.application_path("com.example.Missing").unwrap(), None);
    }

    #[test]
    fn test_earlier_dirs_shadow_later() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        write_entry(
            first.path(),
            "editor.desktop",
            "[Desktop Entry]\nType=Application\nName=Mine\nExec=mine\n",
        );
        write_entry(
            second.path(),
            "editor.desktop",
            "[Desktop Entry]\nType=Application\nName=System\nExec=system\n",
        );
        let services = FreedesktopServices::new(
            vec![first.path().to_path_buf(), second.path().to_path_buf()],
            "true",
        );

        let entries = services.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Mine");
        assert_eq!(services.find_entry("editor").unwrap().name, "Mine");
    }

    #[test]
    fn test_launch_unknown_application() {
        let temp = tempdir().unwrap();
        let services = FreedesktopServices::new(vec![temp.path().to_path_buf()], "true");
        assert!(matches!(
            services.launch_application("com.example.Missing"),
            Err(AppServicesError::ApplicationNotFound(_))
        ));
    }

    #[test]
    fn test_launch_entry_without_exec() {
        let temp = tempdir().unwrap();
        write_entry(
            temp.path(),
            "noexec.desktop",
            "[Desktop Entry]\nType=Application\nName=NoExec\n",
        );
        let services = FreedesktopServices::new(vec![temp.path().to_path_buf()], "true");
        assert!(matches!(
            services.launch_application("noexec"),
            Err(AppServicesError::LaunchFailed { .. })
        ));
    }

    #[test]
    fn test_launch_spawns_exec() {
        let temp = tempdir().unwrap();
        write_entry(
            temp.path(),
            "truthy.desktop",
            "[Desktop Entry]\nType=Application\nName=Truthy\nExec=true %F\n",
        );
        let services = FreedesktopServices::new(vec![temp.path().to_path_buf()], "true");
        assert!(services.launch_application("truthy").is_ok());
    }

    #[test]
    fn test_exec_unescaped_before_splitting() {
        let entry = DesktopEntry::parse(
            "echo-home",
            Path::new("/e.desktop"),
            "[Desktop Entry]\nType=Application\nName=Echo\\sHome\nExec=sh -c \"echo \\\\\\\\$HOME\"\n",
        )
        .unwrap();
        assert_eq!(entry.name, "Echo Home");
        assert_eq!(entry.argv(), vec!["sh", "-c", r"echo \$HOME"]);
    }

    #[test]
    fn test_unescape_value() {
        assert_eq!(unescape_value(r"a\sb"), "a b");
        assert_eq!(unescape_value(r"x\\y"), r"x\y");
        assert_eq!(unescape_value(r"tab\there"), "tab\there");
        assert_eq!(unescape_value(r"keep\q"), r"keep\q");
        assert_eq!(unescape_value("trailing\\"), "trailing\\");
    }

    #[cfg(target_os = "linux")]
    fn defunct_children() -> usize {
        let Ok(tasks) = std::fs::read_dir("/proc/self/task") else {
            return 0;
        };
        tasks
            .filter_map(|t| t.ok())
            .filter_map(|t| std::fs::read_to_string(t.path().join("children")).ok())
            .flat_map(|children| {
                children
                    .split_whitespace()
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|pid| {
                std::fs::read_to_string(format!("/proc/{}/stat", pid))
                    .ok()
                    .and_then(|stat| {
                        stat.rsplit_once(')')
                            .map(|(_, rest)| rest.trim_start().starts_with('Z'))
                    })
                    .unwrap_or(false)
            })
            .count()
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_launched_children_are_reaped() {
        let temp = tempdir().unwrap();
        write_entry(
            temp.path(),
            "quick.desktop",
            "[Desktop Entry]\nType=Application\nName=Quick\nExec=true\n",
        );
        let services = FreedesktopServices::new(vec![temp.path().to_path_buf()], "true");

        for _ in 0..5 {
            services.launch_application("quick").unwrap();
        }

        let mut zombies = defunct_children();
        for _ in 0..40 {
            if zombies == 0 {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(50));
            zombies = defunct_children();
        }
        assert_eq!(zombies, 0);
    }

    #[test]
    fn test_opener_exit_status() {
        let ok = FreedesktopServices::new(vec![], "true");
        assert!(ok.open_url("https://example.com").is_ok());

        let refused = FreedesktopServices::new(vec![], "false");
        assert!(matches!(
            refused.open_file("/tmp"),
            Err(AppServicesError::CommandFailed { .. })
        ));

        let missing = FreedesktopServices::new(vec![], "/definitely/not/an/opener");
        assert!(missing.open_url("https://example.com").is_err());
    }

    #[test]
    fn test_match_running_dedupes_by_lowest_pid() {
        let entries = vec![
            DesktopEntry::parse("org.mozilla.firefox", Path::new("/f.desktop"), FIREFOX).unwrap(),
            DesktopEntry::parse(
                "org.gnome.gedit",
                Path::new("/g.desktop"),
                "[Desktop Entry]\nType=Application\nName=Text Editor\nExec=gedit %U\n",
            )
            .unwrap(),
        ];
        let processes = vec![
            ProcessSample {
                pid: 900,
                name: "firefox".to_string(),
                exe: Some(PathBuf::from("/usr/lib/firefox/firefox")),
                start_time: 1_714_555_800,
            },
            ProcessSample {
                pid: 850,
                name: "Web Content".to_string(),
                exe: Some(PathBuf::from("/usr/lib/firefox/firefox")),
                start_time: 1_714_555_801,
            },
            ProcessSample {
                pid: 10,
                name: "bash".to_string(),
                exe: Some(PathBuf::from("/usr/bin/bash")),
                start_time: 0,
            },
            ProcessSample {
                pid: 1200,
                name: "gedit".to_string(),
                exe: None,
                start_time: 0,
            },
        ];

        let running = match_running(&entries, &processes);
        assert_eq!(running.len(), 2);
        assert_eq!(running[0].bundle_identifier, "org.mozilla.firefox");
        assert_eq!(running[0].process_identifier, 850);
        assert_eq!(running[0].localized_name, "Firefox");
        assert_eq!(running[1].bundle_identifier, "org.gnome.gedit");
        assert_eq!(running[1].executable_path, "");
    }

    #[test]
    fn test_hide_requires_running() {
        let temp = tempdir().unwrap();
        let services = FreedesktopServices::new(vec![temp.path().to_path_buf()], "true");
        assert!(matches!(
            services.hide_application("com.example.Missing"),
            Err(AppServicesError::NotRunning(_))
        ));
        assert!(matches!(
            services.unhide_application("com.example.Missing"),
            Err(AppServicesError::NotRunning(_))
        ));
    }

    #[test]
    fn test_frontmost_is_unknown() {
        let services = FreedesktopServices::new(vec![], "true");
        assert!(services.frontmost_application().unwrap().is_none());
    }
}
