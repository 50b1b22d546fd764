//! In-memory BioPAX Level 3 object model.
//!
//! Elements live in an arena owned by [`BiopaxModel`] and are referenced by
//! copyable [`ElementId`] handles, so a sub-pathway shared by several parents
//! is one element referenced from each of them.

mod element;

pub use element::{
    BioSource, BiochemicalReaction, BiopaxType, Catalysis, Element, ElementKind, Evidence,
    Participant, Pathway, PathwayStep, Provenance,
};
pub(crate) use element::push_unique;

use std::collections::{BTreeMap, HashMap};

use crate::error::{BiopaxError, Result};

/// Handle to an element inside one [`BiopaxModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) usize);

impl ElementId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Arena of BioPAX elements for one export run.
#[derive(Debug, Clone, Default)]
pub struct BiopaxModel {
    xml_base: String,
    elements: Vec<Element>,
    by_uri: HashMap<String, ElementId>,
}

impl BiopaxModel {
    pub fn new(xml_base: impl Into<String>) -> Self {
        Self {
            xml_base: xml_base.into(),
            elements: Vec::new(),
            by_uri: HashMap::new(),
        }
    }

    pub fn xml_base(&self) -> &str {
        &self.xml_base
    }

    /// Register a new element. URIs are unique within a model.
    pub fn add(&mut self, element: Element) -> Result<ElementId> {
        if self.by_uri.contains_key(&element.uri) {
            return Err(BiopaxError::DuplicateIdentifier(element.uri));
        }
        let id = ElementId(self.elements.len());
        self.by_uri.insert(element.uri.clone(), id);
        self.elements.push(element);
        Ok(id)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    pub fn uri(&self, id: ElementId) -> Option<&str> {
        self.get(id).map(|e| e.uri.as_str())
    }

    pub fn find_by_uri(&self, uri: &str) -> Option<ElementId> {
        self.by_uri.get(uri).copied()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// All elements with their handles, in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, e)| (ElementId(i), e))
    }

    /// Handles of every element of one class, in creation order.
    pub fn objects_of(&self, ty: BiopaxType) -> Vec<ElementId> {
        self.iter()
            .filter(|(_, e)| e.biopax_type() == ty)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn count_of(&self, ty: BiopaxType) -> usize {
        self.elements
            .iter()
            .filter(|e| e.biopax_type() == ty)
            .count()
    }

    /// Element counts keyed by class name.
    pub fn counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for e in &self.elements {
            *counts.entry(e.biopax_type().as_str().to_string()).or_insert(0) += 1;
        }
        counts
    }

    pub fn pathway(&self, id: ElementId) -> Option<&Pathway> {
        self.get(id).and_then(Element::as_pathway)
    }

    pub fn step(&self, id: ElementId) -> Option<&PathwayStep> {
        self.get(id).and_then(Element::as_step)
    }

    pub fn reaction(&self, id: ElementId) -> Option<&BiochemicalReaction> {
        self.get(id).and_then(Element::as_reaction)
    }

    pub fn catalysis(&self, id: ElementId) -> Option<&Catalysis> {
        self.get(id).and_then(Element::as_catalysis)
    }

    fn kind_mut(&mut self, id: ElementId) -> Result<&mut ElementKind> {
        self.elements
            .get_mut(id.0)
            .map(|e| &mut e.kind)
            .ok_or_else(|| BiopaxError::InvalidInput(format!("unknown element handle {}", id.0)))
    }

    pub fn pathway_mut(&mut self, id: ElementId) -> Result<&mut Pathway> {
        match self.kind_mut(id)? {
            ElementKind::Pathway(p) => Ok(p),
            other => Err(mismatch(id, other, "Pathway")),
        }
    }

    pub fn step_mut(&mut self, id: ElementId) -> Result<&mut PathwayStep> {
        match self.kind_mut(id)? {
            ElementKind::PathwayStep(s) => Ok(s),
            other => Err(mismatch(id, other, "PathwayStep")),
        }
    }

    pub fn reaction_mut(&mut self, id: ElementId) -> Result<&mut BiochemicalReaction> {
        match self.kind_mut(id)? {
            ElementKind::BiochemicalReaction(r) => Ok(r),
            other => Err(mismatch(id, other, "BiochemicalReaction")),
        }
    }

    /// Attach a data source to a pathway or reaction.
    pub fn add_data_source(&mut self, entity: ElementId, source: ElementId) -> Result<()> {
        match self.kind_mut(entity)? {
            ElementKind::Pathway(p) => push_unique(&mut p.data_sources, source),
            ElementKind::BiochemicalReaction(r) => push_unique(&mut r.data_sources, source),
            other => return Err(mismatch(entity, other, "Pathway or BiochemicalReaction")),
        }
        Ok(())
    }

    /// Attach evidence to a pathway or reaction.
    pub fn add_evidence(&mut self, entity: ElementId, evidence: ElementId) -> Result<()> {
        match self.kind_mut(entity)? {
            ElementKind::Pathway(p) => push_unique(&mut p.evidence, evidence),
            ElementKind::BiochemicalReaction(r) => push_unique(&mut r.evidence, evidence),
            other => return Err(mismatch(entity, other, "Pathway or BiochemicalReaction")),
        }
        Ok(())
    }

    /// Link a catalysis to the reaction it controls, in both directions.
    pub fn link_control(&mut self, catalysis: ElementId, reaction: ElementId) -> Result<()> {
        self.reaction_mut(reaction)?;
        match self.kind_mut(catalysis)? {
            ElementKind::Catalysis(c) => c.controlled = Some(reaction),
            other => return Err(mismatch(catalysis, other, "Catalysis")),
        }
        push_unique(&mut self.reaction_mut(reaction)?.controlled_of, catalysis);
        Ok(())
    }
}

fn mismatch(id: ElementId, found: &ElementKind, expected: &str) -> BiopaxError {
    BiopaxError::InvalidInput(format!(
        "element {} is a {}, expected {}",
        id.0,
        found.biopax_type(),
        expected
    ))
}
