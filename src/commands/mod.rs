use std::path::PathBuf;
use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::ingest;
use crate::rag::RagSystem;

/// Dispatches REPL input: `process <files...>` rebuilds the index, anything
/// else is treated as a question against it.
pub struct CommandHandler {
    rag: RagSystem,
}

impl CommandHandler {
    pub fn new(rag: RagSystem) -> Self {
        Self { rag }
    }

    pub async fn handle_command(&mut self, input: &str) -> Result<(), String> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(());
        }

        if input.eq_ignore_ascii_case("help") {
            self.show_help();
            return Ok(());
        }

        if let Some(args) = input
            .strip_prefix("process ")
            .or_else(|| input.strip_prefix("index "))
        {
            return self.process_files(args).await;
        }

        let question = input.strip_prefix("ask ").unwrap_or(input);
        self.answer(question).await
    }

    fn show_help(&self) {
        println!("📊 Chat with your Excel/CSV files:");
        println!("  process <file.csv> [file.xlsx ...]  - Read files and build the index");
        println!("  ask <question>                      - Ask a question about the data");
        println!("  <question>                          - Same, without the prefix");
        println!("  help                                - Show this menu");
        println!("  exit                                - Leave");
    }

    async fn process_files(&self, args: &str) -> Result<(), String> {
        let paths: Vec<PathBuf> = args.split_whitespace().map(PathBuf::from).collect();
        if paths.is_empty() {
            return Err("Usage: process <file.csv> [file.xlsx ...]".to_string());
        }

        println!("📂 Processing {} file(s)...", paths.len());

        let report = ingest::gather_text(&paths);
        for warning in &report.warnings {
            println!("{}", format!("⚠️  {}", warning).yellow());
        }

        // Build skipped, not failed: nothing usable came out of the batch
        if report.text.trim().is_empty() {
            println!("{}", "⚠️  No valid content found in the uploaded files".yellow());
            return Ok(());
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message("Building index...");
        pb.enable_steady_tick(Duration::from_millis(100));

        match self.rag.build_index(&report.text).await {
            Ok(count) => {
                pb.finish_and_clear();
                println!(
                    "{}",
                    format!("✅ Processing completed: {} chunks indexed", count).green()
                );
                Ok(())
            }
            Err(e) => {
                pb.finish_and_clear();
                Err(format!("Failed to build index: {}", e))
            }
        }
    }

    async fn answer(&self, question: &str) -> Result<(), String> {
        match self.rag.answer_question(question).await {
            Ok(answer) if answer.grounded => {
                println!("\n💬 {}", answer.text.bright_green());
                Ok(())
            }
            Ok(answer) => {
                println!("\n💬 {}", answer.text.yellow());
                Ok(())
            }
            Err(e) => Err(format!("Failed to answer question: {}", e)),
        }
    }
}
