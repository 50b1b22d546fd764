//! Entities shared by value across a whole run.
//!
//! Organisms are looked up by name and the Reactome data source by its fixed
//! identifier. Both lookups query the objects already in the model, not the
//! source graph. Evidence is the exception: every pathway and reaction gets
//! its own.

use super::ids::IdentifierAllocator;
use crate::biopax::{BioSource, BiopaxModel, BiopaxType, Element, ElementId, ElementKind, Evidence, Provenance};
use crate::error::Result;

pub const DATA_SOURCE_NAME: &str = "Reactome";
pub const DATA_SOURCE_COMMENT: &str = "http://www.reactome.org";

/// Reuse the BioSource whose name set is exactly `[species]`, or create it.
pub fn resolve_organism(
    model: &mut BiopaxModel,
    ids: &mut IdentifierAllocator,
    species: &str,
) -> Result<ElementId> {
    let existing = model.objects_of(BiopaxType::BioSource).into_iter().find(|id| {
        model
            .get(*id)
            .map(|e| {
                let names = e.names();
                names.len() == 1 && names[0] == species
            })
            .unwrap_or(false)
    });
    if let Some(id) = existing {
        log::debug!("Reusing organism {} for {}", id.index(), species);
        return Ok(id);
    }

    let uri = ids.next(BiopaxType::BioSource);
    log::debug!("Creating organism {} for {}", uri, species);
    model.add(Element::new(
        uri,
        ElementKind::BioSource(BioSource {
            names: vec![species.to_string()],
        }),
    ))
}

/// The run's single Reactome Provenance. It is always the first Provenance
/// allocated, so its identifier doubles as the lookup key.
pub fn resolve_data_source(model: &mut BiopaxModel, ids: &mut IdentifierAllocator) -> Result<ElementId> {
    if let Some(id) = model.find_by_uri(&ids.id_of(BiopaxType::Provenance, 1)) {
        return Ok(id);
    }

    let uri = ids.next(BiopaxType::Provenance);
    log::debug!("Creating data source {}", uri);
    model.add(Element::new(
        uri,
        ElementKind::Provenance(Provenance {
            names: vec![DATA_SOURCE_NAME.to_string()],
            comments: vec![DATA_SOURCE_COMMENT.to_string()],
        }),
    ))
}

/// Always a new object.
pub fn create_evidence(model: &mut BiopaxModel, ids: &mut IdentifierAllocator) -> Result<ElementId> {
    let uri = ids.next(BiopaxType::Evidence);
    model.add(Element::new(uri, ElementKind::Evidence(Evidence)))
}
