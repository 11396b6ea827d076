use tabular_chat_agent::commands::CommandHandler;
use tabular_chat_agent::config::Config;
use tabular_chat_agent::providers::gemini::GeminiProvider;
use tabular_chat_agent::rag::RagSystem;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use dotenv::dotenv;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Gemini API key (falls back to GEMINI_API_KEY / GOOGLE_API_KEY)
    #[arg(short, long)]
    api_key: Option<String>,

    /// Directory where the vector index is persisted
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Tabular files to process before entering the prompt loop
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize colored output
    colored::control::set_override(true);

    // Load environment variables
    dotenv().ok();
    env_logger::init();

    // Parse command line arguments
    let args = Args::parse();

    // Missing credential is fatal at startup, not per request
    let mut config = match &args.api_key {
        Some(key) => Config::with_api_key(key.clone()),
        None => Config::from_env()?,
    };
    if let Some(dir) = &args.data_dir {
        config.index_dir = dir.clone();
    }

    let provider = Arc::new(GeminiProvider::new(&config));
    let rag = RagSystem::new(config, provider);
    let mut command_handler = CommandHandler::new(rag);

    // Show initial help menu
    command_handler.handle_command("help").await.ok();

    // Process any files given on the command line up front
    if !args.files.is_empty() {
        let line = format!(
            "process {}",
            args.files
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(" ")
        );
        if let Err(e) = command_handler.handle_command(&line).await {
            println!("{}", e.red());
        }
    }

    // Initialize rustyline editor
    let mut rl = Editor::<(), DefaultHistory>::new()?;

    // Main input loop
    loop {
        match rl.readline("👤 ") {
            Ok(line) => {
                let input = line.trim();
                if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
                    break;
                }
                let _ = rl.add_history_entry(input);

                if let Err(e) = command_handler.handle_command(input).await {
                    println!("{}", e.red());
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
