/// Commands that reach the app from outside the GTK main loop: the unix
/// socket and the config watcher. Pointer and button input stays on the
/// GTK side as `AppMsg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Show,
    Hide,
    Next,
    Prev,
    ConfigReload,
}
