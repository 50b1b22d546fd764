//! Source graph to BioPAX conversion.
//!
//! A [`TransformationRun`] walks the source DAG depth-first and builds a
//! [`BiopaxModel`](crate::biopax::BiopaxModel). Identifier counters and the
//! db-id caches belong to the run and are reset whenever a new run starts.

pub mod cache;
pub mod comment;
pub mod ids;
mod pathway;
mod reaction;
pub mod run;
pub mod shared;

pub use cache::ObjectCache;
pub use ids::{species_xml_base, xml_base, IdentifierAllocator, DEFAULT_BASE_URI};
pub use run::{TargetGraph, TransformationRun};
