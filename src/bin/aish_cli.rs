/*!
 * aish CLI - conversational shell front end
 *
 * Thin interactive surface over aish_core: resolves free-form requests into
 * single commands, shows the interpretation, and runs it. Questions
 * ("? ...", "rag ...", trailing "?") are routed to the knowledge-retrieval
 * collaborator when one is configured.
 */

use aish_core::generative::{DEFAULT_MODEL, DEFAULT_OLLAMA_URL};
use aish_core::structured_log::{set_min_level, LogLevel};
use aish_core::{
    execute, question_from_input, CommandResolver, OllamaGenerator, Origin, SuggestionGenerator,
};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "aish_cli")]
#[command(about = "aish - natural language shell assistant", long_about = None)]
struct Cli {
    /// Generation backend endpoint
    #[arg(long, default_value = DEFAULT_OLLAMA_URL)]
    url: String,

    /// Model used for command translation and suggestions
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Resolve commands but never execute them
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve and run a single request, then exit
    Run {
        /// The request, as free text
        request: Vec<String>,
    },

    /// Print completion suggestions for a partial input, then exit
    Suggest {
        /// The partial input
        text: Vec<String>,

        /// Maximum number of suggestions
        #[arg(short, long, default_value_t = 6)]
        limit: usize,
    },

    /// Interactive session (default)
    Repl,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    set_min_level(LogLevel::Warn);

    let generator = Arc::new(OllamaGenerator::new(cli.url.clone(), cli.model.clone()));
    let resolver = CommandResolver::new(generator.clone());

    match cli.command {
        Some(Commands::Run { request }) => {
            let text = request.join(" ");
            handle_request(&resolver, &text, cli.dry_run).await;
        }
        Some(Commands::Suggest { text, limit }) => {
            let text = text.join(" ");
            match generator.suggest(&text, limit).await {
                Ok(suggestions) => {
                    for suggestion in suggestions {
                        println!("{}", suggestion);
                    }
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Version) => {
            println!("aish_cli v{}", env!("CARGO_PKG_VERSION"));
            println!("aish - natural language shell assistant");
        }
        Some(Commands::Repl) | None => {
            run_repl(&resolver, cli.dry_run).await?;
        }
    }

    Ok(())
}

async fn run_repl(resolver: &CommandResolver, dry_run: bool) -> Result<()> {
    println!("aish - type a request, or 'exit' to quit.");

    let stdin = std::io::stdin();
    loop {
        print!("aish> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            break;
        }

        if let Some(question) = question_from_input(input) {
            // The retrieval collaborator is an external service; without one
            // configured, questions get a pointer instead of a wrong answer.
            println!(
                "No knowledge base is configured; cannot answer: '{}'",
                question
            );
            continue;
        }

        handle_request(resolver, input, dry_run).await;
    }

    Ok(())
}

async fn handle_request(resolver: &CommandResolver, text: &str, dry_run: bool) {
    let Some(resolved) = resolver.resolve(text).await else {
        return;
    };

    println!("-> {} [{}]", resolved.command, origin_label(resolved.origin));
    if let Some(note) = &resolved.note {
        println!("   note: {}", note);
    }
    if dry_run {
        return;
    }

    let result = execute(&resolved.command, resolver.os()).await;
    let output = result.display_output();
    if !output.is_empty() {
        println!("{}", output.trim_end());
    }
    if result.command_not_found() {
        println!("(the command was not found on this system)");
    }
}

fn origin_label(origin: Origin) -> &'static str {
    match origin {
        Origin::Alias => "alias",
        Origin::Rule => "rule",
        Origin::Generative => "generative",
    }
}
