use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use chat_widget::app::App;
use chat_widget::config::{Config, ENDPOINT_ENV};
use chat_widget::{handler, tui, ui, ChatClient, ChatTransport, ChatWidget};

#[derive(Parser)]
#[command(name = "chat-widget")]
#[command(about = "Chat with a remote bot from the terminal")]
struct Cli {
    /// Chat endpoint URL (POST, JSON)
    #[arg(short, long, global = true)]
    endpoint: Option<String>,

    /// Remember --endpoint in the config file
    #[arg(long, requires = "endpoint")]
    save: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a single message and print the conversation
    Send {
        /// The message text
        message: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let interactive = cli.command.is_none();

    setup_tracing(cli.verbose, interactive);

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring unreadable config");
        Config::new()
    });
    let env_endpoint = std::env::var(ENDPOINT_ENV).ok();
    let endpoint = config.resolve_endpoint(cli.endpoint.as_deref(), env_endpoint.as_deref());

    if cli.save {
        Config::save_endpoint(&endpoint)?;
        tracing::info!(%endpoint, "saved endpoint to config");
    }

    let transport: Arc<dyn ChatTransport> = Arc::new(ChatClient::new(&endpoint));

    match cli.command {
        None => run_interactive(endpoint, transport).await,
        Some(Commands::Send { message }) => send_once(&message, transport.as_ref()).await,
    }
}

async fn run_interactive(endpoint: String, transport: Arc<dyn ChatTransport>) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();
    let mut app = App::new(endpoint, transport, events.sender());

    tracing::info!(endpoint = %app.endpoint, "chat widget started");

    let result = async {
        while !app.should_quit {
            terminal.draw(|frame| ui::render(&mut app, frame))?;
            match events.next().await {
                Some(event) => handler::handle_event(&mut app, event),
                None => break,
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    tui::restore()?;
    result
}

/// One send action without a terminal UI
async fn send_once(message: &str, transport: &dyn ChatTransport) -> Result<()> {
    let mut widget = ChatWidget::new();
    widget.input.set_value(message);

    if let Some(outbound) = widget.send_message() {
        let outcome = transport.send(&outbound.text).await;
        widget.resolve(outbound.id, outcome);
    }

    for msg in widget.conversation.messages() {
        println!("[{}] {}", msg.classes, msg.text);
    }
    Ok(())
}

fn setup_tracing(verbose: bool, interactive: bool) {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            if verbose {
                EnvFilter::new("chat_widget=debug,warn")
            } else {
                EnvFilter::new("chat_widget=info,warn")
            }
        })
    };

    if !interactive {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .init();
        return;
    }

    // The terminal is taken over by the UI, so interactive runs log to a file
    let log_dir = std::env::var("CHAT_WIDGET_LOG_DIR")
        .ok()
        .map(PathBuf::from)
        .or_else(|| dirs::cache_dir().map(|d| d.join("chat-widget")));

    match open_log_file(log_dir) {
        Ok((log_path, file)) => {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true);

            tracing_subscriber::registry()
                .with(filter())
                .with(file_layer)
                .init();

            tracing::info!(path = ?log_path, "tracing initialized");
        }
        // Raw mode hasn't started yet, so stderr is still readable
        Err(e) => eprintln!("chat-widget: logging disabled: {e:#}"),
    }
}

fn open_log_file(log_dir: Option<PathBuf>) -> Result<(PathBuf, File)> {
    let log_dir = log_dir.ok_or_else(|| anyhow!("no log directory available"))?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating {}", log_dir.display()))?;

    let log_path = log_dir.join("chat-widget.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening {}", log_path.display()))?;
    Ok((log_path, file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_log_file_created_in_directory() {
        let dir = tempdir().unwrap();
        let (path, _file) = open_log_file(Some(dir.path().join("logs"))).unwrap();
        assert_eq!(path, dir.path().join("logs").join("chat-widget.log"));
        assert!(path.exists());
    }

    #[test]
    fn test_unusable_log_directory_is_reported() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        let err = open_log_file(Some(blocker.join("logs"))).unwrap_err();
        assert!(err.to_string().contains("creating"));
        assert!(open_log_file(None).is_err());
    }
}
