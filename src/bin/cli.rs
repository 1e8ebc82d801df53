//! CLI binary for lark.

use clap::{Parser, Subcommand};
use lark::api::HttpTranscribeClient;
use lark::{ChatSession, ClientConfig, Recorder, Sender};
use std::io::Write as _;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Lark: conversation engine for a voice-enabled AI chat client.
#[derive(Parser)]
#[command(name = "lark", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Start an interactive chat conversation.
    Chat {
        /// Chat model to use instead of the configured default.
        #[arg(short, long)]
        model: Option<String>,

        /// Enrich each turn with web search results.
        #[arg(long)]
        web_search: bool,
    },

    /// Record one utterance and print its transcript.
    Transcribe,

    /// List available audio input devices.
    Devices,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Suppress noisy dependency logs by default; RUST_LOG overrides.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lark=info")),
        )
        .init();

    let cli = Cli::parse();

    let config = if let Some(ref path) = cli.config {
        ClientConfig::from_file(path)?
    } else {
        ClientConfig::load()?
    };

    match cli.command.unwrap_or(Command::Chat {
        model: None,
        web_search: false,
    }) {
        Command::Chat { model, web_search } => run_chat(config, model, web_search).await,
        Command::Transcribe => run_transcribe(config).await,
        Command::Devices => list_devices(),
    }
}

async fn run_chat(
    config: ClientConfig,
    model: Option<String>,
    web_search: bool,
) -> anyhow::Result<()> {
    println!("lark v{}", env!("CARGO_PKG_VERSION"));
    println!("models:");
    for entry in &config.models {
        println!("  {} — {}", entry.id, entry.name);
    }

    let mut session = ChatSession::from_config(config)?;
    if let Some(model) = model {
        session.set_model(model);
    }
    session.set_auto_web_search(web_search);

    println!(
        "\nusing {} (web search {})",
        session.selected_model(),
        if session.auto_web_search() { "on" } else { "off" }
    );
    println!("type a message, or 'quit' to exit\n");

    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        if std::io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text == "quit" || text == "exit" {
            break;
        }

        match session.send_message(text).await {
            Ok(()) => {
                let reply = session
                    .messages()
                    .iter()
                    .rev()
                    .find(|m| m.sender == Sender::Bot);
                if let Some(reply) = reply {
                    println!("{}", reply.text);
                    for source in &reply.search_sources {
                        println!("  [{}] {}", source.index, source.url);
                    }
                }
            }
            Err(err) => eprintln!("error: {err}"),
        }
    }

    Ok(())
}

async fn run_transcribe(config: ClientConfig) -> anyhow::Result<()> {
    let client = HttpTranscribeClient::new(&config)?;
    let mut recorder = Recorder::new();

    recorder.start()?;
    println!("recording... press Enter to stop");
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;

    let clip = recorder.stop()?;
    println!("captured {:.1}s of audio", clip.duration_secs);

    let transcript = client.transcribe(clip).await?;
    println!("{transcript}");
    Ok(())
}

fn list_devices() -> anyhow::Result<()> {
    let devices = Recorder::list_input_devices()?;
    if devices.is_empty() {
        println!("no input devices found");
    }
    for name in devices {
        println!("  {name}");
    }
    Ok(())
}
