use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

use stationfolio::assistant::{Assistant, ChatSession};
use stationfolio::config::AssistantConfig;
use stationfolio::gemini::GeminiBackend;
use stationfolio::resume::ResumeData;
use stationfolio::server;

const DEFAULT_RESUME: &str = "data/resume.yaml";

/// Portfolio site tooling: resume assistant and development server.
#[derive(Parser)]
#[command(name = "stationfolio")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Resume data file (.yaml, .yml or .json)
    #[arg(short, long, global = true, default_value = DEFAULT_RESUME)]
    resume: PathBuf,

    #[command(flatten)]
    assistant: AssistantConfig,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the built site with live reload and the assistant endpoint
    Serve {
        /// Directory containing the built site
        #[arg(short, long, default_value = "dist")]
        site: PathBuf,

        /// Port to run the server on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
    /// Ask the assistant a single question
    Ask {
        /// The question
        question: String,
    },
    /// Chat with the assistant on stdin
    Chat,
    /// Print the context JSON sent to the model
    Context,
}

fn load_assistant(resume: &Path, config: &AssistantConfig) -> anyhow::Result<Assistant<GeminiBackend>> {
    let data = ResumeData::load(resume)?;
    Ok(Assistant::new(&data, config.backend())?)
}

async fn chat(assistant: &Assistant<GeminiBackend>) -> anyhow::Result<()> {
    let mut session = ChatSession::new();
    let mut stdout = tokio::io::stdout();

    for message in session.messages() {
        stdout.write_all(format!("{}\n", message.text).as_bytes()).await?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if let Some(reply) = session.send(assistant, &line).await {
            stdout.write_all(format!("{}\n", reply.text).as_bytes()).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { site, port } => {
            let assistant = load_assistant(&cli.resume, &cli.assistant)?;
            server::serve(&site, assistant, port).await?;
        }
        Commands::Ask { question } => {
            let assistant = load_assistant(&cli.resume, &cli.assistant)?;
            println!("{}", assistant.respond(&question).await);
        }
        Commands::Chat => {
            let assistant = load_assistant(&cli.resume, &cli.assistant)?;
            chat(&assistant).await?;
        }
        Commands::Context => {
            let data = ResumeData::load(&cli.resume)?;
            println!("{}", data.to_context_json()?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_serve_with_defaults() {
        let cli = Cli::try_parse_from(["stationfolio", "serve"]).unwrap();
        assert_eq!(cli.resume, PathBuf::from(DEFAULT_RESUME));
        match cli.command {
            Commands::Serve { site, port } => {
                assert_eq!(site, PathBuf::from("dist"));
                assert_eq!(port, 3000);
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn cli_parses_ask_subcommand() {
        let cli = Cli::try_parse_from([
            "stationfolio",
            "ask",
            "--resume",
            "me.json",
            "What do you build?",
        ])
        .unwrap();
        assert_eq!(cli.resume, PathBuf::from("me.json"));
        match cli.command {
            Commands::Ask { question } => assert_eq!(question, "What do you build?"),
            _ => panic!("Expected Ask command"),
        }
    }

    #[test]
    fn cli_accepts_assistant_overrides() {
        let cli = Cli::try_parse_from([
            "stationfolio",
            "context",
            "--model",
            "gemini-test",
            "--endpoint",
            "http://localhost:9999/v1beta",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Context));
        assert_eq!(cli.assistant.model, "gemini-test");
        assert_eq!(cli.assistant.endpoint, "http://localhost:9999/v1beta");
    }

    #[test]
    fn cli_requires_a_subcommand() {
        assert!(Cli::try_parse_from(["stationfolio"]).is_err());
    }
}
