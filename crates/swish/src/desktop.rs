//! Desktop-entry resolution: turns the config's item queries into names,
//! icons, window classes and exec lines.

use crate::sys::wm::WindowClass;
use derive_more::{AsRef, Deref, Display, From, Into};
use freedesktop_entry_parser::parse_entry;
use fs_err as fs;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// String newtypes all get the same `new` constructor; the derives cover
/// the rest.
#[macro_export]
macro_rules! impl_string_newtype {
    ($name:ty) => {
        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct AppName(String);

crate::impl_string_newtype!(AppName);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ExecCommand(String);

crate::impl_string_newtype!(ExecCommand);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct AppQuery(String);

crate::impl_string_newtype!(AppQuery);

#[derive(Debug, Clone)]
pub struct AppInfo {
    pub name: AppName,
    pub icon: PathBuf,
    pub class: WindowClass,
    pub exec: ExecCommand,
}

impl AppInfo {
    /// Resolve a config item against the desktop-entry cache. Explicit
    /// `class`/`exec` overrides win; anything unresolved falls back to the
    /// query string itself.
    pub fn new(query: &AppQuery, class: Option<WindowClass>, exec: Option<ExecCommand>) -> Self {
        let base = find_desktop_entry(query);

        Self {
            name: base
                .as_ref()
                .map(|b| b.name.clone())
                .unwrap_or_else(|| AppName::new(query.to_string())),
            icon: base
                .as_ref()
                .map(|b| b.icon.clone())
                .unwrap_or_else(|| find_icon_path(query.as_ref()).unwrap_or_default()),
            class: class
                .or_else(|| base.as_ref().map(|b| b.class.clone()))
                .unwrap_or_else(|| WindowClass::new(query.to_string())),
            exec: exec
                .or_else(|| base.as_ref().map(|b| b.exec.clone()))
                .unwrap_or_else(|| ExecCommand::new(String::new())),
        }
    }
}

static ENTRIES: OnceLock<RwLock<Vec<AppInfo>>> = OnceLock::new();

pub fn refresh_cache() {
    let apps = scan_entries();
    let lock = ENTRIES.get_or_init(|| RwLock::new(Vec::new()));
    *lock.write() = apps;
}

fn get_all_entries() -> Vec<AppInfo> {
    let lock = ENTRIES.get_or_init(|| RwLock::new(scan_entries()));
    lock.read().clone()
}

pub fn find_desktop_entry(query: &AppQuery) -> Option<AppInfo> {
    find_desktop_entry_in_list(query, &get_all_entries())
}

pub fn find_desktop_entry_in_list(query: &AppQuery, entries: &[AppInfo]) -> Option<AppInfo> {
    let lower_query = query.to_lowercase();
    entries
        .iter()
        .find(|app| {
            app.name.to_lowercase() == lower_query || app.class.to_lowercase() == lower_query
        })
        .cloned()
}

pub fn scan_entries() -> Vec<AppInfo> {
    collect_desktop_files()
        .into_iter()
        .filter_map(|path| parse_desktop_file(&path))
        .collect()
}

fn application_directories() -> Vec<PathBuf> {
    let xdg = xdg::BaseDirectories::new();
    let mut dirs = Vec::new();

    if let Some(home) = xdg.get_data_home() {
        dirs.push(home.join("applications"));
    }
    dirs.extend(
        xdg.get_data_dirs()
            .into_iter()
            .map(|p| p.join("applications")),
    );
    dirs
}

fn collect_desktop_files() -> Vec<PathBuf> {
    // Later directories in XDG precedence shadow earlier ones by entry id,
    // so walk the list back to front and let inserts overwrite.
    let mut entries = HashMap::new();

    for dir in application_directories().iter().rev() {
        if let Ok(read_dir) = fs::read_dir(dir) {
            for entry in read_dir.flatten() {
                let path = entry.path();
                if path.extension().and_then(|s| s.to_str()) == Some("desktop")
                    && let Some(id) = path.file_name().and_then(|s| s.to_str())
                {
                    entries.insert(id.to_string(), path);
                }
            }
        }
    }
    entries.into_values().collect()
}

pub fn parse_desktop_file(path: &Path) -> Option<AppInfo> {
    let entry = parse_entry(path).ok()?;
    let section = entry.section("Desktop Entry")?;

    let entry_type = section.attr("Type").first()?;
    if entry_type != "Application" {
        return None;
    }
    if let Some(no_display) = section.attr("NoDisplay").first()
        && no_display == "true"
    {
        return None;
    }

    let name = section.attr("Name").first()?.to_string();

    let icon = section
        .attr("Icon")
        .first()
        .map(|icon| find_icon_path(icon).unwrap_or_else(|| PathBuf::from(icon)))
        .unwrap_or_default();

    let exec = strip_field_codes(section.attr("Exec").first()?);

    let id = path.file_name()?.to_str()?;
    let class = section
        .attr("StartupWMClass")
        .first()
        .cloned()
        .unwrap_or_else(|| id.trim_end_matches(".desktop").to_string());

    Some(AppInfo {
        name: AppName::new(name),
        icon,
        class: WindowClass::new(class),
        exec: ExecCommand::new(exec),
    })
}

/// Drop `%f`/`%u`-style placeholders from an Exec line; we never pass files.
fn strip_field_codes(exec: &str) -> String {
    shell_words::split(exec)
        .map(|args| {
            let clean_args: Vec<_> = args
                .into_iter()
                .filter(|arg| !arg.starts_with('%'))
                .collect();
            shell_words::join(clean_args)
        })
        .unwrap_or_else(|_| exec.to_string())
}

fn find_icon_path(icon_name: &str) -> Option<PathBuf> {
    if icon_name.is_empty() {
        return None;
    }

    let path = Path::new(icon_name);
    if path.is_absolute() && path.exists() {
        return Some(path.to_path_buf());
    }

    freedesktop_icons::lookup(icon_name)
        .with_size(512)
        .with_scale(1)
        .find()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_field_codes_but_keeps_flags() {
        assert_eq!(strip_field_codes("firefox %u"), "firefox");
        assert_eq!(
            strip_field_codes("env FOO=1 app --new-window %F"),
            "env FOO=1 app --new-window"
        );
        assert_eq!(strip_field_codes("plain"), "plain");
    }

    #[test]
    fn lookup_matches_name_or_class_case_insensitively() {
        let entries = vec![AppInfo {
            name: AppName::new("Firefox"),
            icon: PathBuf::new(),
            class: WindowClass::new("org.mozilla.firefox"),
            exec: ExecCommand::new("firefox"),
        }];

        let by_name = find_desktop_entry_in_list(&AppQuery::new("firefox"), &entries);
        assert!(by_name.is_some());
        let by_class = find_desktop_entry_in_list(&AppQuery::new("ORG.MOZILLA.FIREFOX"), &entries);
        assert!(by_class.is_some());
        assert!(find_desktop_entry_in_list(&AppQuery::new("kitty"), &entries).is_none());
    }
}
