//! Standalone briefing documents: the HTML page or a rendered image of it.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use forge_mission::Briefing;
use log::info;
use plotters::prelude::*;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BriefingFormat {
    Html,
    Png,
    Jpeg,
}

impl BriefingFormat {
    /// Format implied by the path's extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "html" | "htm" => Some(Self::Html),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

/// Canvas settings for raster briefings.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterOptions {
    pub width: u32,
    pub height: u32,
    pub font_family: String,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 1400,
            font_family: default_font_family().to_string(),
        }
    }
}

fn default_font_family() -> &'static str {
    if cfg!(target_os = "macos") {
        "Helvetica"
    } else if cfg!(target_os = "windows") {
        "Arial"
    } else {
        "DejaVu Sans"
    }
}

#[derive(Debug, Error)]
pub enum BriefingError {
    #[error("unsupported briefing format for {0}; use .html, .png or .jpg")]
    UnsupportedFormat(PathBuf),
    #[error("failed to write briefing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to render briefing image: {0}")]
    Render(String),
}

/// Export `briefing` to `path`, inferring the format from the extension.
pub fn export_briefing_to(
    briefing: &Briefing,
    path: &Path,
    options: &RasterOptions,
) -> Result<PathBuf, BriefingError> {
    let format = BriefingFormat::from_path(path)
        .ok_or_else(|| BriefingError::UnsupportedFormat(path.to_path_buf()))?;
    export_briefing(briefing, format, path, options)
}

/// Write `briefing` to `path` as `format`; the destination is only replaced on success.
pub fn export_briefing(
    briefing: &Briefing,
    format: BriefingFormat,
    path: &Path,
    options: &RasterOptions,
) -> Result<PathBuf, BriefingError> {
    match format {
        BriefingFormat::Html => write_html_page(&briefing.html, path),
        BriefingFormat::Png | BriefingFormat::Jpeg => {
            let staging = staging_file(path, format)?;
            render_raster(briefing, staging.path(), options)?;
            commit(staging, path)
        }
    }
}

/// Write a standalone HTML page, e.g. the failure page, replacing `path` only on success.
pub fn write_html_page(html: &str, path: &Path) -> Result<PathBuf, BriefingError> {
    let mut staging = staging_file(path, BriefingFormat::Html)?;
    staging
        .as_file_mut()
        .write_all(html.as_bytes())
        .map_err(|source| io_error(path, source))?;
    commit(staging, path)
}

fn io_error(path: &Path, source: std::io::Error) -> BriefingError {
    BriefingError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Temporary file next to `path`; removed on drop unless committed.
fn staging_file(path: &Path, format: BriefingFormat) -> Result<NamedTempFile, BriefingError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(|source| io_error(path, source))?;

    // the renderer picks the image encoder from the suffix
    tempfile::Builder::new()
        .prefix(".briefing")
        .suffix(&format!(".{}", format.extension()))
        .tempfile_in(&dir)
        .map_err(|source| io_error(path, source))
}

fn commit(staging: NamedTempFile, path: &Path) -> Result<PathBuf, BriefingError> {
    staging
        .persist(path)
        .map_err(|err| io_error(path, err.error))?;
    info!("briefing written to {}", path.display());
    Ok(path.to_path_buf())
}

fn render_raster(
    briefing: &Briefing,
    path: &Path,
    options: &RasterOptions,
) -> Result<(), BriefingError> {
    let root = BitMapBackend::new(path, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_error)?;

    let family = FontFamily::Name(options.font_family.as_str());
    let title = FontDesc::new(family, 34.0, FontStyle::Bold).color(&RGBColor(20, 30, 70));
    let heading = FontDesc::new(family, 24.0, FontStyle::Bold).color(&BLACK);
    let body = FontDesc::new(family, 18.0, FontStyle::Normal).color(&BLACK);

    let margin = 40;
    let bottom = options.height as i32 - margin;
    let columns = ((options.width as i32 - 2 * margin) / 10).max(20) as usize;
    let mut y = margin;

    root.draw_text(&briefing.name, &title, (margin, y))
        .map_err(render_error)?;
    y += 56;

    let sections: [(&str, Vec<String>); 4] = [
        ("Description", vec![briefing.description.clone()]),
        ("Objectives", numbered(&briefing.objectives)),
        ("Flights", bulleted(&briefing.flights)),
        ("Remarks", bulleted(&briefing.remarks)),
    ];
    for (name, paragraphs) in &sections {
        if paragraphs.is_empty() || y > bottom {
            continue;
        }
        root.draw_text(name, &heading, (margin, y))
            .map_err(render_error)?;
        y += 34;
        for line in paragraphs.iter().flat_map(|p| wrap(p, columns)) {
            if y > bottom {
                break;
            }
            root.draw_text(&line, &body, (margin + 10, y))
                .map_err(render_error)?;
            y += 24;
        }
        y += 16;
    }
    root.present().map_err(render_error)?;
    Ok(())
}

fn render_error(err: impl std::fmt::Display) -> BriefingError {
    BriefingError::Render(err.to_string())
}

fn numbered(items: &[String]) -> Vec<String> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {item}", i + 1))
        .collect()
}

fn bulleted(items: &[String]) -> Vec<String> {
    items.iter().map(|item| format!("- {item}")).collect()
}

/// Greedy word wrap at `max_chars`; words longer than a line are split.
pub fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                lines.push(word.drain(..max_chars).collect());
            }
            let word: String = word.into_iter().collect();
            if word.is_empty() {
                continue;
            }
            let needed = usize::from(!line.is_empty()) + word.chars().count();
            if line.chars().count() + needed > max_chars {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(&word);
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines
}
