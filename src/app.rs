//! Application orchestration and command routing.
//!
//! Handles command-line argument parsing and delegates to appropriate command handlers.

use crate::commands;
use crate::logging;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::process;

/// A terminal form for speaker-labeled audio transcription
#[derive(Parser)]
#[command(name = "uttr")]
#[command(version)]
#[command(about = "\n\n ╻╻╋╋┏╸\n ┗┛┗┗╹ ")]
#[command(
    long_about = "\n\n ╻╻╋╋┏╸\n ┗┛┗┗╹ \n\nA terminal form for speaker-labeled audio transcription.\nPaste an audio URL or point at a local file, press Enter, and the\ndiarized transcript renders in place.\n\nDEFAULT COMMAND:\n    If no command is specified, 'form' is used by default.\n\nEXAMPLES:\n    # Open the transcription form\n    $ uttr\n    $ uttr form\n\n    # Set up your AssemblyAI API key\n    $ uttr auth\n\n    # Edit configuration file\n    $ uttr config"
)]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/uttr/uttr.toml\n    Logs:               ~/.local/state/uttr/uttr.log.*\n\nThe API key comes from 'uttr auth' or the ASSEMBLYAI_API_KEY environment\nvariable (development override)."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the transcription form (default)
    ///
    /// Tab switches between URL and file input, Enter submits, Escape exits.
    /// The transcript renders one "Speaker X: ..." line per utterance.
    #[command(visible_alias = "f")]
    Form,

    /// Set or update the AssemblyAI API key
    ///
    /// The key is stored with owner-only permissions. Press Enter without
    /// typing anything to keep the currently stored key.
    #[command(visible_alias = "a")]
    Auth,

    /// Open configuration file in your preferred editor
    ///
    /// Edit transcription options (punctuation, formatting, language
    /// detection). Uses $EDITOR environment variable or falls back to nano/vim.
    #[command(visible_alias = "c")]
    Config,

    /// Show recent log entries from the application
    ///
    /// Display the last 50 lines of the most recent log file.
    /// Useful for troubleshooting issues.
    Logs,

    /// Generate shell completion script
    ///
    /// Generate completion script for your shell. Save the output to your
    /// shell's completion directory or source it directly.
    ///
    /// Examples:
    ///   uttr completions bash > uttr.bash
    ///   uttr completions zsh > _uttr
    ///   uttr completions fish > uttr.fish
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Runs the main application based on command-line arguments.
///
/// # Exit Codes
/// - 0: Success
/// - 1: General error
/// - 2: Usage error (invalid arguments)
///
/// # Errors
/// - If logging initialization fails
/// - If command execution fails
pub async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Handle commands that don't need logging setup
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(*shell, &mut Cli::command(), "uttr", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::Logs) => {
            return match commands::handle_logs() {
                Ok(()) => Ok(()),
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(1);
                }
            };
        }
        _ => {}
    }

    // Initialize logging for all other commands
    logging::init_logging()?;

    // Route to appropriate command handler
    match cli.command {
        None | Some(Commands::Form) => {
            commands::handle_form().await?;
        }
        Some(Commands::Auth) => {
            if let Err(e) = commands::handle_auth().await {
                // Check if it's a cancellation error (cliclack already displayed the message)
                let err_msg = e.to_string();
                if err_msg.contains("cancelled") || err_msg.contains("interrupted") {
                    // Silent exit - cliclack already showed "Operation cancelled"
                    process::exit(0);
                } else {
                    return Err(e);
                }
            }
        }
        Some(Commands::Config) => {
            commands::handle_config()?;
        }
        Some(Commands::Completions { .. }) | Some(Commands::Logs) => {
            unreachable!("These commands are handled earlier")
        }
    }

    Ok(())
}
