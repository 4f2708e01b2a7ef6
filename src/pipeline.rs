//! One generate-and-export run, as driven by the command line.

use std::fs;
use std::path::{Path, PathBuf};

use forge_config::Library;
use forge_core::time::format_clock;
use forge_export::{
    BriefingError, BriefingFormat, ExportError, ExportReport, MizExporter, RasterOptions,
    Resource, export_briefing, write_html_page,
};
use forge_generator::{GenerationError, failure_html, generate_seeded};
use forge_mission::Mission;
use forge_template::MissionTemplate;
use log::{info, warn};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForgeError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Briefing(#[from] BriefingError),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode mission summary: {0}")]
    Summary(#[from] serde_json::Error),
}

/// Inputs and destinations of a run.
#[derive(Debug, Clone)]
pub struct Job {
    pub seed: u64,
    pub archive: PathBuf,
    pub briefing: Option<PathBuf>,
    pub summary: Option<PathBuf>,
    pub resources: Vec<Resource>,
    pub raster: RasterOptions,
}

impl Job {
    pub fn new(seed: u64, archive: impl Into<PathBuf>) -> Self {
        Self {
            seed,
            archive: archive.into(),
            briefing: None,
            summary: None,
            resources: Vec::new(),
            raster: RasterOptions::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct JobReport {
    pub mission: Mission,
    pub archive: ExportReport,
    pub briefing: Option<PathBuf>,
    pub summary: MissionSummary,
}

/// Machine-readable digest written next to the archive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionSummary {
    pub name: String,
    pub theater: String,
    pub date: String,
    pub start_time: String,
    pub player_side: String,
    pub player_coalition: String,
    pub seed: u64,
    pub groups: usize,
    pub units: usize,
    pub player_units: usize,
    pub objectives: Vec<String>,
    pub archive: PathBuf,
    pub archive_bytes: u64,
    pub dictionary_entries: usize,
}

impl MissionSummary {
    pub fn new(mission: &Mission, seed: u64, archive: &ExportReport) -> Self {
        Self {
            name: mission.briefing.name.clone(),
            theater: mission.theater.name.clone(),
            date: mission.date.format("%Y-%m-%d").to_string(),
            start_time: format_clock(mission.start_time_seconds),
            player_side: mission.player_side.as_str().to_string(),
            player_coalition: mission.coalition(mission.player_side).name.clone(),
            seed,
            groups: mission.group_count(),
            units: mission.unit_count(),
            player_units: mission.player_unit_count(),
            objectives: mission.briefing.objectives.clone(),
            archive: archive.path.clone(),
            archive_bytes: archive.bytes,
            dictionary_entries: archive.dictionary_entries,
        }
    }
}

/// Generate from `template` and write every requested output.
///
/// When generation fails and the briefing destination is an HTML file, the
/// failure page is written there before the error is returned.
pub fn run(template: &MissionTemplate, library: &Library, job: &Job) -> Result<JobReport, ForgeError> {
    let mission = match generate_seeded(template, library, job.seed) {
        Ok(mission) => mission,
        Err(err) => {
            if let Some(path) = job.briefing.as_deref() {
                write_failure_page(path, &err.to_string());
            }
            return Err(err.into());
        }
    };

    let mut exporter = MizExporter::new();
    for resource in &job.resources {
        exporter.add_resource(resource.clone());
    }
    let archive = exporter.export(&mission, &job.archive)?;

    let briefing = match &job.briefing {
        Some(path) => {
            let format = BriefingFormat::from_path(path)
                .ok_or_else(|| BriefingError::UnsupportedFormat(path.clone()))?;
            Some(export_briefing(&mission.briefing, format, path, &job.raster)?)
        }
        None => None,
    };

    let summary = MissionSummary::new(&mission, job.seed, &archive);
    if let Some(path) = &job.summary {
        let json = serde_json::to_string_pretty(&summary)?;
        fs::write(path, json).map_err(|source| ForgeError::Io {
            path: path.clone(),
            source,
        })?;
    }
    info!(
        "`{}` ready: {} group(s), {} unit(s)",
        summary.name, summary.groups, summary.units
    );
    Ok(JobReport {
        mission,
        archive,
        briefing,
        summary,
    })
}

fn write_failure_page(path: &Path, message: &str) {
    if BriefingFormat::from_path(path) != Some(BriefingFormat::Html) {
        return;
    }
    if let Err(err) = write_html_page(&failure_html(message), path) {
        warn!("could not write failure page {}: {err}", path.display());
    }
}
