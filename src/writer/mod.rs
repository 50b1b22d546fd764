//! Serialization of a finished model to disk.

pub mod owl;

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use crate::biopax::BiopaxModel;
use crate::error::Result;

pub use owl::{to_owl_string, write_model};

/// Write `model` as an OWL document at `path`, creating parent directories.
pub fn write_to_file(model: &BiopaxModel, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    write_model(model, BufWriter::new(file))?;
    log::info!("Wrote {} elements to {}", model.len(), path.display());
    Ok(())
}
