use derive_more::{AsRef, Deref, Display, From, Into};
use hyprland::data::{Clients, CursorPosition, Monitors};
use hyprland::dispatch::{Dispatch, DispatchType, WindowIdentifier};
use hyprland::error::HyprError;
use hyprland::prelude::*;
use hyprland::shared::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct WindowClass(String);

crate::impl_string_newtype!(WindowClass);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct MonitorName(String);

crate::impl_string_newtype!(MonitorName);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct ShellCommand(String);

crate::impl_string_newtype!(ShellCommand);

#[derive(Debug, Error)]
pub enum WmError {
    #[error(transparent)]
    Hypr(#[from] HyprError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub fn get_active_classes() -> Vec<WindowClass> {
    Clients::get()
        .map(|clients| clients.into_iter().map(|c| WindowClass(c.class)).collect())
        .unwrap_or_default()
}

pub fn get_active_monitor() -> Option<MonitorName> {
    Monitors::get()
        .ok()?
        .into_iter()
        .find(|m| m.focused)
        .map(|m| MonitorName(m.name))
}

/// Cursor position relative to the focused monitor, for seeding hover
/// when the compositor reports it before GDK has a surface position.
pub fn get_cursor_pos_on_active_monitor() -> Option<Point> {
    let cursor = CursorPosition::get().ok()?;
    let focused = Monitors::get().ok()?.into_iter().find(|m| m.focused)?;

    Some(Point::new(
        cursor.x as f64 - focused.x as f64,
        cursor.y as f64 - focused.y as f64,
    ))
}

pub fn focus_window(address: &Address) -> Result<(), HyprError> {
    Dispatch::call(DispatchType::FocusWindow(WindowIdentifier::Address(
        address.clone(),
    )))
}

pub fn close_window(class: &WindowClass) -> Result<(), HyprError> {
    Dispatch::call(DispatchType::CloseWindow(
        WindowIdentifier::ClassRegularExpression(&class.0),
    ))
}

/// How well a live window class matches the class we are looking for.
/// Exact beats a reverse-domain component, which beats a substring.
fn class_score(candidate: &str, target: &str) -> u8 {
    if candidate == target {
        3
    } else if candidate.split('.').any(|part| part == target) {
        2
    } else if candidate.contains(target) || target.contains(candidate) {
        1
    } else {
        0
    }
}

pub fn run_or_raise(class: &WindowClass, exec: &ShellCommand) -> Result<(), WmError> {
    let target = class.to_ascii_lowercase();

    let best = Clients::get()?
        .into_iter()
        .map(|c| (class_score(&c.class.to_ascii_lowercase(), &target), c))
        .filter(|(score, _)| *score > 0)
        .max_by_key(|(score, _)| *score);

    match best {
        Some((_, client)) => focus_window(&client.address).map_err(WmError::from),
        None => spawn_detached(exec),
    }
}

fn spawn_detached(exec: &ShellCommand) -> Result<(), WmError> {
    std::process::Command::new("sh")
        .arg("-c")
        .arg(&exec.0)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_outranks_component_and_substring() {
        assert_eq!(class_score("kitty", "kitty"), 3);
        assert_eq!(class_score("org.mozilla.firefox", "firefox"), 2);
        assert_eq!(class_score("firefox-esr", "firefox"), 1);
        assert_eq!(class_score("kitty", "firefox"), 0);
    }
}
