use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::Parser;
use mission_forge::config::Library;
use mission_forge::export::{RasterOptions, Resource};
use mission_forge::template::MissionTemplate;
use mission_forge::{Job, run};

#[derive(Parser)]
#[command(author, version, about = "Generate a DCS World mission archive from a template")]
struct Cli {
    /// Template file (TOML) as written by `template new`
    #[arg(long)]
    template: PathBuf,

    /// Library directory holding theaters/, aircraft.yaml, coalitions.yaml
    #[arg(long, default_value = "configs")]
    library: PathBuf,

    /// Seed for the random source (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,

    /// Destination .miz archive
    #[arg(long)]
    output: PathBuf,

    /// Briefing document to write alongside (.html, .png or .jpg)
    #[arg(long)]
    briefing: Option<PathBuf>,

    /// JSON summary of the generated mission
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Briefing image to package into the archive (repeatable)
    #[arg(long = "resource")]
    resources: Vec<PathBuf>,

    /// Raster briefing width in pixels
    #[arg(long, default_value_t = 1024)]
    width: u32,

    /// Raster briefing height in pixels
    #[arg(long, default_value_t = 1400)]
    height: u32,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let template = MissionTemplate::load(&cli.template)
        .with_context(|| format!("loading template {}", cli.template.display()))?;
    let library = Library::load(&cli.library)
        .with_context(|| format!("loading library {}", cli.library.display()))?;

    let seed = cli.seed.unwrap_or_else(clock_seed);
    let mut job = Job::new(seed, &cli.output);
    job.briefing = cli.briefing.clone();
    job.summary = cli.summary.clone();
    job.resources = cli.resources.iter().cloned().map(Resource::from_file).collect();
    job.raster = RasterOptions {
        width: cli.width,
        height: cli.height,
        ..RasterOptions::default()
    };

    log::info!("generating with seed {seed}");
    let report = run(&template, &library, &job)
        .with_context(|| format!("mission generation failed (seed {seed})"))?;

    println!("{} (seed {seed})", report.summary.name);
    println!(
        "  archive : {} ({} bytes, {} dictionary entries)",
        report.archive.path.display(),
        report.archive.bytes,
        report.archive.dictionary_entries
    );
    if let Some(path) = &report.briefing {
        println!("  briefing: {}", path.display());
    }
    println!(
        "  {} group(s), {} unit(s), {} player seat(s)",
        report.summary.groups, report.summary.units, report.summary.player_units
    );
    Ok(())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}
