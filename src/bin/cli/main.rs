//! CLI tool for rarstore archive operations.

mod commands;
mod exit_codes;
mod output;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use std::ffi::OsString;
use std::path::PathBuf;

use exit_codes::ExitCode;

/// Reader for stored RAR 1.5 - 4.x archives and volume sets
#[derive(Parser)]
#[command(name = "rarstore")]
#[command(author, version, about = "Reader for stored RAR archives and volume sets", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "human", global = true)]
    format: OutputFormat,

    #[command(flatten)]
    read: ReadArgs,
}

/// Options shared by every command that opens an archive.
#[derive(Args, Clone, Copy)]
pub struct ReadArgs {
    /// Verify CRC-32 checksums while reading content
    #[arg(long, global = true)]
    verify_crc: bool,

    /// Fail on split files whose parts do not link up
    #[arg(long, global = true)]
    strict: bool,

    /// Maximum number of volumes to follow
    #[arg(long, global = true, default_value_t = rarstore::volume::DEFAULT_MAX_VOLUMES)]
    max_volumes: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// List archive contents (alias: l)
    #[command(alias = "l")]
    List {
        /// First volume of the archive
        archive: PathBuf,

        /// Show every file block with its volume, CRC and split flags
        #[arg(long)]
        technical: bool,
    },

    /// Show archive information (alias: i)
    #[command(alias = "i")]
    Info {
        /// First volume of the archive
        archive: PathBuf,
    },

    /// Write the content of one entry to standard output
    Cat {
        /// First volume of the archive
        archive: PathBuf,

        /// Entry name as stored in the archive
        name: OsString,
    },

    /// Extract all files from the archive (alias: x)
    #[command(alias = "x")]
    Extract {
        /// First volume of the archive
        archive: PathBuf,

        /// Output directory
        #[arg(short = 'o', long, default_value = ".")]
        output: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

impl ReadArgs {
    fn options(self) -> rarstore::OpenOptions {
        rarstore::OpenOptions::new()
            .verify_crc(self.verify_crc)
            .strict_continuation(self.strict)
            .max_volumes(self.max_volumes)
    }
}

fn main() {
    // Set up Ctrl+C handler
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupted");
        std::process::exit(exit_codes::USER_INTERRUPT);
    })
    .ok();

    let cli = Cli::parse();
    let options = cli.read.options();

    let exit_code = match cli.command {
        Commands::List { archive, technical } => {
            commands::list(&archive, options, technical, cli.format)
        }

        Commands::Info { archive } => commands::info(&archive, options, cli.format),

        Commands::Cat { archive, name } => {
            commands::cat(&archive, options, name.as_encoded_bytes())
        }

        Commands::Extract { archive, output } => {
            commands::extract(&archive, options, &output, cli.format)
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut std::io::stdout());
            ExitCode::Success
        }
    };

    std::process::exit(exit_code.code());
}
