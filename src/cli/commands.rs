//! Command implementations for the Parley CLI.

use std::io::{self, BufRead, Write};

use crate::chat::{ChatConfig, ChatEngine};
use crate::cli::args::*;
use crate::dataset::IntentCatalog;
use crate::error::Result;
use crate::nn::{Trainer, TrainingConfig};

/// Execute a CLI command.
pub fn execute_command(args: ParleyArgs) -> Result<()> {
    match &args.command {
        Command::Train(train_args) => train(train_args.clone(), &args),
        Command::Ask(ask_args) => ask(ask_args.clone(), &args),
        Command::Chat(chat_args) => chat(chat_args.clone(), &args),
    }
}

/// Train a model and persist the artifact.
fn train(args: TrainArgs, cli_args: &ParleyArgs) -> Result<()> {
    if cli_args.verbosity() > 0 {
        println!("Training from: {}", args.dataset.display());
    }

    let catalog = IntentCatalog::load(&args.dataset)?;
    let config = TrainingConfig {
        epochs: args.epochs,
        seed: args.seed,
        ..TrainingConfig::default()
    };
    let trainer = Trainer::new(config);
    let (artifact, report) = trainer.train(&catalog)?;
    artifact.save(&args.model)?;

    if cli_args.verbosity() > 0 {
        println!("Examples:        {}", report.examples);
        println!("Vocabulary size: {}", report.vocabulary_size);
        println!("Tags:            {}", report.tag_count);
        println!("Final loss:      {:.4}", report.final_loss);
        println!("Duration:        {} ms", report.elapsed_ms);
        println!("Model saved to:  {}", args.model.display());
    }

    Ok(())
}

/// Answer a single message and print the response.
fn ask(args: AskArgs, cli_args: &ParleyArgs) -> Result<()> {
    let engine = ChatEngine::open(&args.model, &args.dataset, ChatConfig::default())?;

    if cli_args.verbosity() > 1 {
        let prediction = engine.classify(&args.message)?;
        println!(
            "[{} @ {:.1}%]",
            prediction.tag,
            prediction.confidence * 100.0
        );
    }

    let response = engine.respond(Some(&args.message))?;
    println!("{response}");

    Ok(())
}

/// Interactive chat loop over stdin/stdout.
fn chat(args: ChatArgs, cli_args: &ParleyArgs) -> Result<()> {
    let engine = ChatEngine::open(&args.model, &args.dataset, ChatConfig::default())?;

    if cli_args.verbosity() > 0 {
        println!("Chat session started. Type 'quit' to leave.");
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("you> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let message = line.trim();
        if message == "quit" || message == "exit" {
            break;
        }

        let response = engine.respond(Some(message))?;
        println!("bot> {response}");
    }

    Ok(())
}
