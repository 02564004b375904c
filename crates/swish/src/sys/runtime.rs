use crate::events::AppEvent;
use async_channel::Sender;
use std::thread;
use tokio::runtime::Runtime;

/// Everything that is not the GTK main loop lives on one background
/// thread: the socket command server and the config watcher.
pub fn start_background_services(tx: Sender<AppEvent>) {
    thread::spawn(move || {
        let rt = Runtime::new().expect("Failed to create Tokio runtime");

        rt.block_on(async {
            log::debug!("starting command server and config watcher");
            let server = tokio::spawn(crate::sys::server::run_server(tx.clone()));
            let watcher = tokio::spawn(crate::config::run_async_watcher(tx));
            let _ = tokio::join!(server, watcher);
        });
    });
}
