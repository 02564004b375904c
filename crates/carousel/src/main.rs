use clap::{Parser, Subcommand};
use std::io::Write;
use std::os::unix::net::UnixStream;

const SOCKET_PATH: &str = "/tmp/swish.sock";

#[derive(Parser, Debug)]
#[command(name = "carousel", version, about = "Control the swish app switcher", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Show the switcher strip
    Show,
    /// Hide the switcher strip
    Hide,
    /// Advance to the next item
    Next,
    /// Go back to the previous item
    Prev,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let cmd = match cli.command {
        Commands::Show => "show",
        Commands::Hide => "hide",
        Commands::Next => "next",
        Commands::Prev => "prev",
    };
    send_command(cmd)
}

fn send_command(cmd: &str) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to swish daemon at {}: {}. Is swish running?",
            SOCKET_PATH,
            e
        )
    })?;

    writeln!(stream, "{}", cmd)?;
    Ok(())
}
