//! Export orchestration: pick roots, run conversions, write files and the
//! export report.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::convert::{TargetGraph, TransformationRun, DEFAULT_BASE_URI};
use crate::error::{BiopaxError, Result};
use crate::source::SourceGraph;
use crate::validate::{validate_model, ValidationReport};
use crate::writer;

pub const REPORT_FILE: &str = "export_report.json";
pub const EVENTS_FILE: &str = "events.owl";

/// What to export. Exactly one mode per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportMode {
    SinglePathway(i64),
    MultiplePathways(Vec<i64>),
    Species(i64),
    AllSpecies,
    Events(Vec<i64>),
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub output_dir: PathBuf,
    pub base_uri: String,
    /// Overrides the source graph's version in identifiers.
    pub db_version: Option<u32>,
    pub validate: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            base_uri: DEFAULT_BASE_URI.to_string(),
            db_version: None,
            validate: true,
        }
    }
}

impl ExportOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            output_dir: config.export.output_dir.clone(),
            base_uri: config.export.base_uri.clone(),
            db_version: config.export.db_version,
            validate: config.export.validate,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportedFile {
    pub path: PathBuf,
    pub sha256: String,
    pub element_counts: BTreeMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub generated_at: DateTime<Utc>,
    pub db_version: u32,
    pub files: Vec<ExportedFile>,
}

/// `Homo sapiens` -> `Homo_sapiens.owl`
pub fn species_file_name(species_name: &str) -> String {
    let stem: String = species_name
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() || c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{}.owl", stem)
}

pub struct Exporter<'g> {
    graph: &'g SourceGraph,
    options: ExportOptions,
}

impl<'g> Exporter<'g> {
    pub fn new(graph: &'g SourceGraph, options: ExportOptions) -> Self {
        Self { graph, options }
    }

    pub fn db_version(&self) -> u32 {
        self.options.db_version.unwrap_or_else(|| self.graph.db_version())
    }

    fn new_run(&self) -> TransformationRun<'g> {
        TransformationRun::new(self.graph)
            .with_version(self.db_version())
            .with_base_uri(self.options.base_uri.clone())
    }

    /// Run `mode`, write every resulting document and the report. Unknown
    /// ids are logged and skipped; I/O failures abort.
    pub fn export(&self, mode: &ExportMode) -> Result<ExportReport> {
        std::fs::create_dir_all(&self.options.output_dir)?;
        let mut run = self.new_run();
        let mut files = Vec::new();

        match mode {
            ExportMode::SinglePathway(id) => {
                files.extend(self.export_pathway(&mut run, *id)?);
            }
            ExportMode::MultiplePathways(ids) => {
                for id in ids {
                    files.extend(self.export_pathway(&mut run, *id)?);
                }
            }
            ExportMode::Species(id) => {
                files.extend(self.export_species(&mut run, *id)?);
            }
            ExportMode::AllSpecies => {
                let ids: Vec<i64> = self.graph.all_species().map(|s| s.db_id).collect();
                for id in ids {
                    files.extend(self.export_species(&mut run, id)?);
                }
            }
            ExportMode::Events(ids) => match run.run_events(ids) {
                Ok(Some(target)) => {
                    let path = self.options.output_dir.join(EVENTS_FILE);
                    files.push(self.write(&target, path)?);
                }
                Ok(None) => log::warn!("No events given"),
                Err(BiopaxError::SourceNotFound(what)) => {
                    log::error!("{} is not a valid event; nothing exported", what)
                }
                Err(e) => return Err(e),
            },
        }

        let report = ExportReport {
            generated_at: Utc::now(),
            db_version: self.db_version(),
            files,
        };
        self.write_report(&report)?;
        Ok(report)
    }

    fn export_pathway(&self, run: &mut TransformationRun<'g>, id: i64) -> Result<Option<ExportedFile>> {
        match run.run_pathway(id) {
            Ok(Some(target)) => {
                let path = self.options.output_dir.join(format!("{}.owl", id));
                self.write(&target, path).map(Some)
            }
            Ok(None) => Ok(None),
            Err(BiopaxError::SourceNotFound(_)) => {
                log::error!("{} is not the identifier of a valid Pathway object", id);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn export_species(&self, run: &mut TransformationRun<'g>, id: i64) -> Result<Option<ExportedFile>> {
        let Some(species) = self.graph.species(id) else {
            log::error!("{} is not the identifier of a valid Species object", id);
            return Ok(None);
        };
        match run.run_species(id)? {
            Some(target) => {
                let path = self.options.output_dir.join(species_file_name(&species.display_name));
                let file = self.write(&target, path)?;
                log::info!(
                    "Generated BioPAX file for species {}: {}",
                    species.display_name,
                    file.path.display()
                );
                Ok(Some(file))
            }
            None => {
                log::info!("No pathways found for species {}", species.display_name);
                Ok(None)
            }
        }
    }

    fn write(&self, target: &TargetGraph, path: PathBuf) -> Result<ExportedFile> {
        let validation = if self.options.validate {
            let report = validate_model(&target.model);
            if !report.is_valid() {
                log::warn!(
                    "{} has {} validation issues",
                    path.display(),
                    report.issues.len()
                );
            }
            Some(report)
        } else {
            None
        };

        writer::write_to_file(&target.model, &path)?;
        Ok(ExportedFile {
            sha256: file_sha256(&path)?,
            element_counts: target.model.counts(),
            path,
            validation,
        })
    }

    fn write_report(&self, report: &ExportReport) -> Result<()> {
        let path = self.options.output_dir.join(REPORT_FILE);
        let json = serde_json::to_string_pretty(report)
            .map_err(|e| BiopaxError::Serialization(e.to_string()))?;
        std::fs::write(&path, json)?;
        log::info!("Wrote export report for {} files to {}", report.files.len(), path.display());
        Ok(())
    }
}

fn file_sha256(path: &Path) -> Result<String> {
    let content = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    Ok(format!("{:x}", hasher.finalize()))
}
