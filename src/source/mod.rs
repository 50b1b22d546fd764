//! Read-only snapshot of the Reactome event hierarchy.
//!
//! Events reference their children and participants by db id, so a
//! sub-pathway or reaction shared by several parents is stored once and the
//! graph forms a DAG rather than a tree.

pub mod store;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::error::{BiopaxError, Result};

/// Free-text note attached to an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summation {
    pub text: String,
}

/// A catalyst activity only triggers creation of one catalysis link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalystActivity {
    #[serde(default)]
    pub db_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcePathway {
    pub db_id: i64,
    pub display_name: String,
    #[serde(default)]
    pub species_name: Option<String>,
    #[serde(default)]
    pub summation: Vec<Summation>,
    /// Child event ids, in source order.
    #[serde(default)]
    pub has_event: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReaction {
    pub db_id: i64,
    pub display_name: String,
    #[serde(default)]
    pub species_name: Option<String>,
    #[serde(default)]
    pub summation: Vec<Summation>,
    #[serde(default)]
    pub catalyst_activity: Vec<CatalystActivity>,
    /// Physical entity ids consumed by the reaction.
    #[serde(default)]
    pub input: Vec<i64>,
    /// Physical entity ids produced by the reaction.
    #[serde(default)]
    pub output: Vec<i64>,
}

/// Pathway or reaction-like event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceEvent {
    Pathway(SourcePathway),
    Reaction(SourceReaction),
}

impl SourceEvent {
    pub fn db_id(&self) -> i64 {
        match self {
            SourceEvent::Pathway(p) => p.db_id,
            SourceEvent::Reaction(r) => r.db_id,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            SourceEvent::Pathway(p) => &p.display_name,
            SourceEvent::Reaction(r) => &r.display_name,
        }
    }

    pub fn species_name(&self) -> Option<&str> {
        match self {
            SourceEvent::Pathway(p) => p.species_name.as_deref(),
            SourceEvent::Reaction(r) => r.species_name.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhysicalEntityKind {
    SimpleEntity,
    EntityWithAccessionedSequence,
    Complex,
    Other,
}

impl PhysicalEntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhysicalEntityKind::SimpleEntity => "simple_entity",
            PhysicalEntityKind::EntityWithAccessionedSequence => "entity_with_accessioned_sequence",
            PhysicalEntityKind::Complex => "complex",
            PhysicalEntityKind::Other => "other",
        }
    }

    /// Unknown kinds map to `Other`.
    pub fn parse(s: &str) -> Self {
        match s {
            "simple_entity" => PhysicalEntityKind::SimpleEntity,
            "entity_with_accessioned_sequence" => PhysicalEntityKind::EntityWithAccessionedSequence,
            "complex" => PhysicalEntityKind::Complex,
            _ => PhysicalEntityKind::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcePhysicalEntity {
    pub db_id: i64,
    pub display_name: String,
    pub kind: PhysicalEntityKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSpecies {
    pub db_id: i64,
    pub display_name: String,
}

/// On-disk JSON layout of a source graph.
#[derive(Debug, Default, Serialize, Deserialize)]
struct GraphDocument {
    #[serde(default)]
    db_version: u32,
    #[serde(default)]
    species: Vec<SourceSpecies>,
    #[serde(default)]
    events: Vec<SourceEvent>,
    #[serde(default)]
    physical_entities: Vec<SourcePhysicalEntity>,
}

/// In-memory source graph, keyed by db id.
#[derive(Debug, Clone, Default)]
pub struct SourceGraph {
    db_version: u32,
    species: BTreeMap<i64, SourceSpecies>,
    events: BTreeMap<i64, SourceEvent>,
    physical_entities: BTreeMap<i64, SourcePhysicalEntity>,
}

impl SourceGraph {
    pub fn new(db_version: u32) -> Self {
        Self {
            db_version,
            ..Default::default()
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let doc: GraphDocument = serde_json::from_str(content)
            .map_err(|e| BiopaxError::Parse(format!("source graph JSON: {}", e)))?;
        let mut graph = SourceGraph::new(doc.db_version);
        for s in doc.species {
            graph.add_species(s);
        }
        for pe in doc.physical_entities {
            graph.add_physical_entity(pe);
        }
        for ev in doc.events {
            graph.add_event(ev);
        }
        graph.check_references()?;
        Ok(graph)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let graph = Self::from_json_str(&content)
            .map_err(|e| BiopaxError::Parse(format!("{}: {}", path.display(), e)))?;
        log::info!(
            "Loaded source graph from {}: {} events, {} species",
            path.display(),
            graph.events.len(),
            graph.species.len()
        );
        Ok(graph)
    }

    pub fn add_species(&mut self, species: SourceSpecies) {
        self.species.insert(species.db_id, species);
    }

    pub fn add_event(&mut self, event: SourceEvent) {
        self.events.insert(event.db_id(), event);
    }

    pub fn add_physical_entity(&mut self, entity: SourcePhysicalEntity) {
        self.physical_entities.insert(entity.db_id, entity);
    }

    /// Every child and participant id must name a record in the graph.
    pub fn check_references(&self) -> Result<()> {
        for event in self.events.values() {
            match event {
                SourceEvent::Pathway(p) => {
                    if let Some(missing) = p.has_event.iter().find(|id| !self.events.contains_key(*id)) {
                        return Err(BiopaxError::Parse(format!(
                            "pathway {} references unknown event {}",
                            p.db_id, missing
                        )));
                    }
                }
                SourceEvent::Reaction(r) => {
                    if let Some(missing) = r
                        .input
                        .iter()
                        .chain(r.output.iter())
                        .find(|id| !self.physical_entities.contains_key(*id))
                    {
                        return Err(BiopaxError::Parse(format!(
                            "reaction {} references unknown physical entity {}",
                            r.db_id, missing
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn db_version(&self) -> u32 {
        self.db_version
    }

    pub fn event(&self, db_id: i64) -> Option<&SourceEvent> {
        self.events.get(&db_id)
    }

    pub fn pathway(&self, db_id: i64) -> Option<&SourcePathway> {
        match self.events.get(&db_id) {
            Some(SourceEvent::Pathway(p)) => Some(p),
            _ => None,
        }
    }

    pub fn physical_entity(&self, db_id: i64) -> Option<&SourcePhysicalEntity> {
        self.physical_entities.get(&db_id)
    }

    pub fn species(&self, db_id: i64) -> Option<&SourceSpecies> {
        self.species.get(&db_id)
    }

    pub fn all_species(&self) -> impl Iterator<Item = &SourceSpecies> {
        self.species.values()
    }

    pub fn species_by_name(&self, name: &str) -> Option<&SourceSpecies> {
        self.species.values().find(|s| s.display_name == name)
    }

    pub fn events(&self) -> impl Iterator<Item = &SourceEvent> {
        self.events.values()
    }

    pub fn physical_entities(&self) -> impl Iterator<Item = &SourcePhysicalEntity> {
        self.physical_entities.values()
    }

    /// All pathways of a species, in db-id order.
    pub fn pathways_for_species(&self, species_id: i64) -> Vec<&SourcePathway> {
        let Some(species) = self.species.get(&species_id) else {
            return Vec::new();
        };
        self.events
            .values()
            .filter_map(|e| match e {
                SourceEvent::Pathway(p)
                    if p.species_name.as_deref() == Some(species.display_name.as_str()) =>
                {
                    Some(p)
                }
                _ => None,
            })
            .collect()
    }

    /// Pathways of a species that no other event lists as a child.
    pub fn top_level_pathways_for_species(&self, species_id: i64) -> Vec<&SourcePathway> {
        let children: HashSet<i64> = self
            .events
            .values()
            .filter_map(|e| match e {
                SourceEvent::Pathway(p) => Some(p.has_event.iter().copied()),
                _ => None,
            })
            .flatten()
            .collect();
        self.pathways_for_species(species_id)
            .into_iter()
            .filter(|p| !children.contains(&p.db_id))
            .collect()
    }
}
