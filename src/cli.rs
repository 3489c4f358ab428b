use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{self, CommandReport};

#[derive(Debug, Parser)]
#[command(
    name = "altar",
    version,
    about = "Roster and raffle manager for the Família no Altar sponsorship draw"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show resolved storage locations and roster counts
    Status,
    /// List registered families
    List,
    /// Register a family with a name and a photo
    Add {
        #[arg(long)]
        nome: String,
        #[arg(long)]
        foto: PathBuf,
    },
    /// Rename a family and/or replace its photo, by raffle number
    Edit {
        numero: u32,
        #[arg(long)]
        nome: Option<String>,
        #[arg(long)]
        foto: Option<PathBuf>,
    },
    /// Remove a family; its photo is deleted unless shared
    Remove { numero: u32 },
    /// Draw a random undrawn family
    Draw,
    /// Mark a family drawn, or revert it with --undo
    SetDrawn {
        numero: u32,
        #[arg(long)]
        undo: bool,
    },
    /// Mark every family drawn with today's date
    MarkAllDrawn,
    /// Clear all draw status and reshuffle raffle numbers
    Reset,
    /// Run the startup integrity checks and repair the data files
    Validate,
    /// Write a compressed snapshot of the data directory
    Backup,
}

fn print_report(report: &CommandReport) {
    for detail in &report.details {
        println!("{detail}");
    }
    for issue in &report.issues {
        eprintln!("issue: {issue}");
    }
    if report.ok {
        println!("{}: ok", report.command);
    } else {
        eprintln!("{}: failed", report.command);
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let report = match cli.command {
        Command::Status => commands::status::run()?,
        Command::List => commands::list::run()?,
        Command::Add { nome, foto } => {
            commands::add::run(&commands::add::AddOptions { nome, foto })?
        }
        Command::Edit { numero, nome, foto } => {
            commands::edit::run(&commands::edit::EditOptions { numero, nome, foto })?
        }
        Command::Remove { numero } => {
            commands::remove::run(&commands::remove::RemoveOptions { numero })?
        }
        Command::Draw => commands::draw::run()?,
        Command::SetDrawn { numero, undo } => {
            commands::set_drawn::run(&commands::set_drawn::SetDrawnOptions { numero, undo })?
        }
        Command::MarkAllDrawn => commands::mark_all::run()?,
        Command::Reset => commands::reset::run()?,
        Command::Validate => commands::validate::run()?,
        Command::Backup => commands::backup::run()?,
    };

    print_report(&report);
    if !report.ok {
        std::process::exit(1);
    }
    Ok(())
}
