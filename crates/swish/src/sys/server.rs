use crate::events::AppEvent;
use async_channel::Sender;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;

pub const SOCKET_PATH: &str = "/tmp/swish.sock";

fn parse_command(line: &str) -> Option<AppEvent> {
    match line.trim() {
        "show" => Some(AppEvent::Show),
        "hide" => Some(AppEvent::Hide),
        "next" => Some(AppEvent::Next),
        "prev" => Some(AppEvent::Prev),
        _ => None,
    }
}

pub async fn run_server(tx: Sender<AppEvent>) {
    // Cleanup old socket if it exists
    if std::fs::metadata(SOCKET_PATH).is_ok() {
        let _ = std::fs::remove_file(SOCKET_PATH);
    }

    let listener = match UnixListener::bind(SOCKET_PATH) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket: {}", e);
            return;
        }
    };

    loop {
        match listener.accept().await {
            Ok((mut stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let reader = BufReader::new(&mut stream);
                    let mut lines = reader.lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        let Some(event) = parse_command(&line) else {
                            log::debug!("ignoring unknown command {:?}", line.trim());
                            continue;
                        };
                        if tx.send(event).await.is_err() {
                            break;
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_commands_map_to_events() {
        assert_eq!(parse_command("show"), Some(AppEvent::Show));
        assert_eq!(parse_command("hide\n"), Some(AppEvent::Hide));
        assert_eq!(parse_command("  next  "), Some(AppEvent::Next));
        assert_eq!(parse_command("prev"), Some(AppEvent::Prev));
    }

    #[test]
    fn unknown_commands_are_dropped() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("reload"), None);
        assert_eq!(parse_command("SHOW"), None);
    }
}
