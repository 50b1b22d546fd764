//! BioPAX Level 3 element records held by the model arena.

use serde::Serialize;

use super::ElementId;

/// BioPAX class of an element; `as_str` is the exact class name used in
/// identifiers and as the OWL element name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum BiopaxType {
    Pathway,
    PathwayStep,
    BiochemicalReaction,
    Catalysis,
    BioSource,
    Provenance,
    Evidence,
    SmallMolecule,
    Protein,
    Complex,
    PhysicalEntity,
}

impl BiopaxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BiopaxType::Pathway => "Pathway",
            BiopaxType::PathwayStep => "PathwayStep",
            BiopaxType::BiochemicalReaction => "BiochemicalReaction",
            BiopaxType::Catalysis => "Catalysis",
            BiopaxType::BioSource => "BioSource",
            BiopaxType::Provenance => "Provenance",
            BiopaxType::Evidence => "Evidence",
            BiopaxType::SmallMolecule => "SmallMolecule",
            BiopaxType::Protein => "Protein",
            BiopaxType::Complex => "Complex",
            BiopaxType::PhysicalEntity => "PhysicalEntity",
        }
    }
}

impl std::fmt::Display for BiopaxType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Push `id` unless it is already present. BioPAX object properties are sets;
/// insertion order is kept so output stays deterministic.
pub(crate) fn push_unique(list: &mut Vec<ElementId>, id: ElementId) {
    if !list.contains(&id) {
        list.push(id);
    }
}

#[derive(Debug, Clone, Default)]
pub struct Pathway {
    pub display_name: Option<String>,
    pub comments: Vec<String>,
    pub organism: Option<ElementId>,
    /// One entry per step, in source order.
    pub pathway_order: Vec<ElementId>,
    pub pathway_components: Vec<ElementId>,
    pub data_sources: Vec<ElementId>,
    pub evidence: Vec<ElementId>,
}

#[derive(Debug, Clone, Default)]
pub struct PathwayStep {
    pub step_processes: Vec<ElementId>,
}

#[derive(Debug, Clone, Default)]
pub struct BiochemicalReaction {
    pub display_name: Option<String>,
    pub comments: Vec<String>,
    pub left: Vec<ElementId>,
    pub right: Vec<ElementId>,
    pub data_sources: Vec<ElementId>,
    pub evidence: Vec<ElementId>,
    /// Catalyses controlling this reaction (inverse of `Catalysis::controlled`).
    pub controlled_of: Vec<ElementId>,
}

#[derive(Debug, Clone, Default)]
pub struct Catalysis {
    pub controlled: Option<ElementId>,
}

#[derive(Debug, Clone, Default)]
pub struct BioSource {
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Provenance {
    pub names: Vec<String>,
    pub comments: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Evidence;

/// Reaction participant; the concrete BioPAX class is carried by the owning
/// `Element`'s kind.
#[derive(Debug, Clone, Default)]
pub struct Participant {
    pub display_name: Option<String>,
}

#[derive(Debug, Clone)]
pub enum ElementKind {
    Pathway(Pathway),
    PathwayStep(PathwayStep),
    BiochemicalReaction(BiochemicalReaction),
    Catalysis(Catalysis),
    BioSource(BioSource),
    Provenance(Provenance),
    Evidence(Evidence),
    SmallMolecule(Participant),
    Protein(Participant),
    Complex(Participant),
    PhysicalEntity(Participant),
}

impl ElementKind {
    pub fn biopax_type(&self) -> BiopaxType {
        match self {
            ElementKind::Pathway(_) => BiopaxType::Pathway,
            ElementKind::PathwayStep(_) => BiopaxType::PathwayStep,
            ElementKind::BiochemicalReaction(_) => BiopaxType::BiochemicalReaction,
            ElementKind::Catalysis(_) => BiopaxType::Catalysis,
            ElementKind::BioSource(_) => BiopaxType::BioSource,
            ElementKind::Provenance(_) => BiopaxType::Provenance,
            ElementKind::Evidence(_) => BiopaxType::Evidence,
            ElementKind::SmallMolecule(_) => BiopaxType::SmallMolecule,
            ElementKind::Protein(_) => BiopaxType::Protein,
            ElementKind::Complex(_) => BiopaxType::Complex,
            ElementKind::PhysicalEntity(_) => BiopaxType::PhysicalEntity,
        }
    }
}

/// An element together with its RDF identifier.
#[derive(Debug, Clone)]
pub struct Element {
    pub uri: String,
    pub kind: ElementKind,
}

impl Element {
    pub fn new(uri: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            uri: uri.into(),
            kind,
        }
    }

    pub fn biopax_type(&self) -> BiopaxType {
        self.kind.biopax_type()
    }

    pub fn as_pathway(&self) -> Option<&Pathway> {
        match &self.kind {
            ElementKind::Pathway(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_step(&self) -> Option<&PathwayStep> {
        match &self.kind {
            ElementKind::PathwayStep(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_reaction(&self) -> Option<&BiochemicalReaction> {
        match &self.kind {
            ElementKind::BiochemicalReaction(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_catalysis(&self) -> Option<&Catalysis> {
        match &self.kind {
            ElementKind::Catalysis(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_participant(&self) -> Option<&Participant> {
        match &self.kind {
            ElementKind::SmallMolecule(p)
            | ElementKind::Protein(p)
            | ElementKind::Complex(p)
            | ElementKind::PhysicalEntity(p) => Some(p),
            _ => None,
        }
    }

    /// Names of named utility classes (BioSource, Provenance).
    pub fn names(&self) -> &[String] {
        match &self.kind {
            ElementKind::BioSource(b) => &b.names,
            ElementKind::Provenance(p) => &p.names,
            _ => &[],
        }
    }
}
