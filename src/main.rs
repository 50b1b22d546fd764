use anyhow::{Context, Result};
use clap::Parser;
use reactome_biopax::source::store::SourceStore;
use reactome_biopax::{Config, ExportMode, ExportOptions, Exporter, SourceGraph};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "biopax-export")]
#[command(about = "Export Reactome pathways as BioPAX Level 3 OWL files")]
struct Args {
    /// Source graph as a JSON snapshot
    #[arg(long, conflicts_with = "db")]
    input: Option<PathBuf>,

    /// Source graph as a SQLite store
    #[arg(long)]
    db: Option<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    outdir: Option<PathBuf>,

    /// A single id of a pathway
    #[arg(short = 't', long = "toplevelpath")]
    toplevelpath: Option<i64>,

    /// The id of a species
    #[arg(short, long)]
    species: Option<i64>,

    /// A list of ids of pathways, one file each
    #[arg(short, long, value_delimiter = ',')]
    multiple: Vec<i64>,

    /// A list of ids of events to be output as a single model
    #[arg(short = 'l', long = "listevents", value_delimiter = ',')]
    listevents: Vec<i64>,

    /// Version tag for identifiers (defaults to the source's version)
    #[arg(long)]
    db_version: Option<u32>,

    /// Skip model validation
    #[arg(long)]
    no_validate: bool,
}

impl Args {
    /// At most one selector may be given; none means every species.
    fn mode(&self) -> Result<ExportMode> {
        let mut modes = Vec::new();
        if let Some(id) = self.toplevelpath {
            modes.push(ExportMode::SinglePathway(id));
        }
        if let Some(id) = self.species {
            modes.push(ExportMode::Species(id));
        }
        if !self.multiple.is_empty() {
            modes.push(ExportMode::MultiplePathways(self.multiple.clone()));
        }
        if !self.listevents.is_empty() {
            modes.push(ExportMode::Events(self.listevents.clone()));
        }
        if modes.len() > 1 {
            anyhow::bail!("Only one of -t, -s, -m, -l may be given");
        }
        Ok(modes.pop().unwrap_or(ExportMode::AllSpecies))
    }

    /// CLI flags win over the config file.
    fn apply(&self, config: &mut Config) {
        if let Some(input) = &self.input {
            config.source.graph_path = Some(input.clone());
            config.source.db_path = None;
        }
        if let Some(db) = &self.db {
            config.source.db_path = Some(db.clone());
            config.source.graph_path = None;
        }
        if let Some(outdir) = &self.outdir {
            config.export.output_dir = outdir.clone();
        }
        if self.db_version.is_some() {
            config.export.db_version = self.db_version;
        }
        if self.no_validate {
            config.export.validate = false;
        }
    }
}

async fn load_source(config: &Config) -> Result<SourceGraph> {
    if let Some(path) = &config.source.graph_path {
        return SourceGraph::from_json_file(path)
            .with_context(|| format!("Failed to load source graph {}", path.display()));
    }
    let path = config
        .source
        .db_path
        .as_ref()
        .context("No source configured")?;
    let store = SourceStore::open(path)
        .await
        .with_context(|| format!("Failed to open source store {}", path.display()))?;
    Ok(store.load_graph().await?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mode = args.mode()?;

    let mut config = match Config::locate() {
        Some(path) => Config::from_file(&path)?,
        None => Config::default(),
    };
    args.apply(&mut config);

    // Initialize logger from environment variable or default to the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", config.export.log_level.as_str())
    ).init();

    config.validate()?;
    log::info!("Starting BioPAX export v{}", env!("CARGO_PKG_VERSION"));

    let graph = load_source(&config).await?;
    let exporter = Exporter::new(&graph, ExportOptions::from_config(&config));
    log::info!(
        "Exporting {:?} (version {}) to {}",
        mode,
        exporter.db_version(),
        config.output_dir().display()
    );

    let report = exporter.export(&mode)?;
    let issues: usize = report
        .files
        .iter()
        .filter_map(|f| f.validation.as_ref())
        .map(|v| v.issues.len())
        .sum();
    log::info!(
        "Export complete: {} files, {} validation issues",
        report.files.len(),
        issues
    );

    Ok(())
}
