pub mod biopax;
pub mod config;
pub mod convert;
pub mod db;
pub mod error;
pub mod export;
pub mod source;
pub mod validate;
pub mod writer;

pub use config::Config;
pub use convert::{TargetGraph, TransformationRun};
pub use error::{BiopaxError, Result};
pub use export::{ExportMode, ExportOptions, Exporter};
pub use source::SourceGraph;
