use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use mission_forge::template::{MissionTemplate, TemplateValue};

#[derive(Parser)]
#[command(author, version, about = "Create, inspect and edit mission templates")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a template holding the default settings
    New {
        /// Theater id from the library
        #[arg(long, default_value = "caucasus")]
        theater: String,

        #[arg(long)]
        output: PathBuf,
    },
    /// Print every field and the player summary
    Show { path: PathBuf },
    /// Assign FIELD=VALUE pairs, e.g. `objective_count=1,3` or `flight.1.players=Ace`
    Set {
        path: PathBuf,

        #[arg(required = true)]
        assignments: Vec<String>,
    },
    /// Remove player flight group N (1-based)
    RemoveFlight { path: PathBuf, index: usize },
    /// Reset every field to its default
    Reset { path: PathBuf },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    match Cli::parse().command {
        Command::New { theater, output } => {
            MissionTemplate::for_theater(theater).save(&output)?;
            println!("template written to {}", output.display());
        }
        Command::Show { path } => {
            let template = load(&path)?;
            for field in template.schema() {
                match &field.value {
                    TemplateValue::Choice { selected, options } => {
                        println!("{:<26} {selected} [{}]", field.name, options.join("|"))
                    }
                    value => println!("{:<26} {}", field.name, value.display()),
                }
            }
            println!("{}", template.player_summary());
        }
        Command::Set { path, assignments } => {
            let mut template = load(&path)?;
            for assignment in &assignments {
                let (field, value) = assignment
                    .split_once('=')
                    .ok_or_else(|| anyhow!("expected FIELD=VALUE, got `{assignment}`"))?;
                template.set_field(field.trim(), value)?;
            }
            template.save(&path)?;
            println!("{} field(s) updated in {}", assignments.len(), path.display());
        }
        Command::RemoveFlight { path, index } => {
            let mut template = load(&path)?;
            let removed = template
                .remove_flight_group(index)
                .ok_or_else(|| anyhow!("no flight group {index} in {}", path.display()))?;
            template.save(&path)?;
            println!("removed flight group {index} ({})", removed.aircraft);
        }
        Command::Reset { path } => {
            let mut template = load(&path)?;
            template.clear();
            template.save(&path)?;
            println!("template {} reset", path.display());
        }
    }
    Ok(())
}

fn load(path: &Path) -> anyhow::Result<MissionTemplate> {
    MissionTemplate::load(path).with_context(|| format!("loading template {}", path.display()))
}
