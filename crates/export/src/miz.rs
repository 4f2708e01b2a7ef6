//! Packaging a mission into the simulator's `.miz` archive.
//!
//! The archive is first written to a temporary file next to the destination
//! and renamed over it only once every entry has been written. Any failure
//! drops the temporary file, so the destination keeps its previous content.

use std::fs;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};

use forge_mission::Mission;
use log::{debug, info};
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::sections::{RESOURCE_DIR, SectionSet, build_sections};

/// Errors raised while building or writing an archive.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write archive {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read resource {path}: {source}")]
    Resource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("archive packaging failed: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("section `{section}` references missing key `{key}`")]
    DanglingReference { section: String, key: String },
    #[error("resource file name `{0}` is used twice")]
    DuplicateResource(String),
}

/// Where a resource's bytes come from.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceSource {
    Bytes(Vec<u8>),
    /// Read while the archive is written.
    File(PathBuf),
}

/// A briefing image packaged under `l10n/DEFAULT/<file_name>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub file_name: String,
    pub source: ResourceSource,
}

impl Resource {
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            source: ResourceSource::Bytes(bytes),
        }
    }

    /// Resource read from `path`, packaged under the path's file name.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "resource".to_string());
        Self {
            file_name,
            source: ResourceSource::File(path),
        }
    }

    pub fn entry_name(&self) -> String {
        format!("{RESOURCE_DIR}/{}", self.file_name)
    }
}

/// Summary of a committed archive.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    pub path: PathBuf,
    pub entries: Vec<String>,
    pub dictionary_entries: usize,
    pub bytes: u64,
}

#[derive(Debug, Clone, Default)]
pub struct MizExporter {
    resources: Vec<Resource>,
}

impl MizExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }

    pub fn add_resource(&mut self, resource: Resource) {
        self.resources.push(resource);
    }

    /// Serialize every text section and check cross references, without touching disk.
    pub fn sections(&self, mission: &Mission) -> Result<SectionSet, ExportError> {
        let mut names: Vec<String> = Vec::with_capacity(self.resources.len());
        for resource in &self.resources {
            if names.contains(&resource.file_name) {
                return Err(ExportError::DuplicateResource(resource.file_name.clone()));
            }
            names.push(resource.file_name.clone());
        }
        build_sections(mission, &names)
    }

    /// Archive bytes for `mission`; identical missions produce identical bytes.
    pub fn to_bytes(&self, mission: &Mission) -> Result<Vec<u8>, ExportError> {
        let sections = self.sections(mission)?;
        let mut cursor = std::io::Cursor::new(Vec::new());
        self.write_archive(&mut cursor, &sections)?;
        Ok(cursor.into_inner())
    }

    /// Write the archive to `path`, replacing it only if every step succeeds.
    pub fn export(&self, mission: &Mission, path: &Path) -> Result<ExportReport, ExportError> {
        let sections = self.sections(mission)?;
        let io_err = |source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(io_err)?;

        // removed on drop unless persisted below
        let mut staging = NamedTempFile::new_in(&dir).map_err(io_err)?;
        debug!(
            "staging archive for {} at {}",
            path.display(),
            staging.path().display()
        );
        let entries = self.write_archive(staging.as_file_mut(), &sections)?;
        staging.as_file_mut().sync_all().map_err(io_err)?;
        let bytes = staging.as_file().metadata().map_err(io_err)?.len();
        staging
            .persist(path)
            .map_err(|err| io_err(err.error))?;

        info!(
            "mission archive written to {} ({} entries, {bytes} bytes)",
            path.display(),
            entries.len()
        );
        Ok(ExportReport {
            path: path.to_path_buf(),
            entries,
            dictionary_entries: sections.dictionary_entries,
            bytes,
        })
    }

    fn write_archive<W: Write + Seek>(
        &self,
        writer: W,
        sections: &SectionSet,
    ) -> Result<Vec<String>, ExportError> {
        // fixed 1980-01-01 timestamp keeps output reproducible
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());
        let mut zip = ZipWriter::new(writer);
        let mut entries = Vec::with_capacity(sections.entries.len() + self.resources.len());

        for (name, text) in &sections.entries {
            zip.start_file(*name, options)?;
            zip.write_all(text.as_bytes())
                .map_err(|source| ExportError::Io {
                    path: PathBuf::from(*name),
                    source,
                })?;
            entries.push(name.to_string());
        }
        for resource in &self.resources {
            let bytes = match &resource.source {
                ResourceSource::Bytes(bytes) => bytes.clone(),
                ResourceSource::File(path) => {
                    fs::read(path).map_err(|source| ExportError::Resource {
                        path: path.clone(),
                        source,
                    })?
                }
            };
            let entry = resource.entry_name();
            zip.start_file(entry.as_str(), options)?;
            zip.write_all(&bytes).map_err(|source| ExportError::Io {
                path: PathBuf::from(&entry),
                source,
            })?;
            entries.push(entry);
        }
        zip.finish()?;
        Ok(entries)
    }
}

/// File name stem for saving `mission`, from its briefing name.
pub fn suggested_file_name(mission: &Mission, extension: &str) -> String {
    let cleaned: String = mission
        .briefing
        .name
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') && !c.is_control())
        .collect();
    let stem = match cleaned.trim().trim_end_matches('.') {
        "" => "New mission",
        stem => stem,
    };
    format!("{stem}.{}", extension.trim_start_matches('.'))
}
