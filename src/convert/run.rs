//! One end-to-end conversion from the source graph to a BioPAX model.

use super::cache::ObjectCache;
use super::ids::{species_xml_base, xml_base, IdentifierAllocator, DEFAULT_BASE_URI};
use super::shared;
use crate::biopax::{BiopaxModel, ElementId};
use crate::error::{BiopaxError, Result};
use crate::source::{SourceGraph, SourcePathway};

/// Db id of the synthetic root wrapping an explicit event list.
pub const EVENTS_ROOT_ID: i64 = 0;
pub const EVENTS_ROOT_NAME: &str = "Events";

/// Finished output of a run: the model plus the pathways it was rooted at.
#[derive(Debug)]
pub struct TargetGraph {
    pub model: BiopaxModel,
    pub roots: Vec<ElementId>,
}

impl TargetGraph {
    pub fn root(&self) -> Option<ElementId> {
        self.roots.first().copied()
    }

    pub fn xml_base(&self) -> &str {
        self.model.xml_base()
    }
}

/// Owns the run-scoped allocator, caches and model under construction.
/// Every `run*` call starts from a clean slate, so one instance can drive
/// many runs without state leaking between them.
pub struct TransformationRun<'g> {
    pub(super) graph: &'g SourceGraph,
    version: u32,
    base_uri: String,
    pub(super) ids: IdentifierAllocator,
    pub(super) events: ObjectCache,
    pub(super) participants: ObjectCache,
    pub(super) model: BiopaxModel,
}

impl<'g> TransformationRun<'g> {
    pub fn new(graph: &'g SourceGraph) -> Self {
        Self {
            graph,
            version: graph.db_version(),
            base_uri: DEFAULT_BASE_URI.to_string(),
            ids: IdentifierAllocator::new(""),
            events: ObjectCache::new(),
            participants: ObjectCache::new(),
            model: BiopaxModel::default(),
        }
    }

    /// Version tag used in identifiers instead of the graph's own.
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = base_uri.into();
        self
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub(super) fn reset(&mut self, prefix: String) {
        self.ids.reset(prefix.clone());
        self.events.clear();
        self.participants.clear();
        self.model = BiopaxModel::new(prefix);
    }

    fn finish(&mut self, roots: Vec<ElementId>) -> TargetGraph {
        let model = std::mem::take(&mut self.model);
        self.events.clear();
        self.participants.clear();
        log::info!(
            "Run under {} finished with {} elements",
            model.xml_base(),
            model.len()
        );
        TargetGraph { model, roots }
    }

    /// Convert one root pathway. An absent root yields `None` and creates
    /// nothing.
    pub fn run(&mut self, root: Option<&SourcePathway>) -> Result<Option<TargetGraph>> {
        let Some(root) = root else {
            return Ok(None);
        };
        self.reset(xml_base(&self.base_uri, self.version, root.db_id));
        log::info!("Converting pathway {} ({})", root.db_id, root.display_name);
        let converted = self.transform_pathway(Some(root))?;
        Ok(converted.map(|id| self.finish(vec![id])))
    }

    /// Convert a pathway by db id; unknown ids and non-pathway events are
    /// reported as `SourceNotFound`.
    pub fn run_pathway(&mut self, db_id: i64) -> Result<Option<TargetGraph>> {
        let graph = self.graph;
        let root = graph
            .pathway(db_id)
            .ok_or_else(|| BiopaxError::SourceNotFound(format!("pathway {}", db_id)))?;
        self.run(Some(root))
    }

    /// Convert every top-level pathway of a species into one model. The
    /// species' organism is created first so it is always `BioSource1`.
    /// A species without pathways yields `None`.
    pub fn run_species(&mut self, species_id: i64) -> Result<Option<TargetGraph>> {
        let graph = self.graph;
        let species = graph
            .species(species_id)
            .ok_or_else(|| BiopaxError::SourceNotFound(format!("species {}", species_id)))?;
        let roots = graph.top_level_pathways_for_species(species_id);
        if roots.is_empty() {
            log::warn!("Species {} has no pathways", species.display_name);
            return Ok(None);
        }

        self.reset(species_xml_base(&self.base_uri, self.version, species_id));
        log::info!(
            "Converting {} top-level pathways of {}",
            roots.len(),
            species.display_name
        );
        shared::resolve_organism(&mut self.model, &mut self.ids, &species.display_name)?;

        let mut converted = Vec::with_capacity(roots.len());
        for root in roots {
            if let Some(id) = self.transform_pathway(Some(root))? {
                converted.push(id);
            }
        }
        Ok(Some(self.finish(converted)))
    }

    /// Convert an explicit list of events under one synthetic `Events`
    /// pathway, keeping the given order. Every id must exist.
    pub fn run_events(&mut self, event_ids: &[i64]) -> Result<Option<TargetGraph>> {
        if event_ids.is_empty() {
            return Ok(None);
        }
        if let Some(missing) = event_ids.iter().find(|id| self.graph.event(**id).is_none()) {
            return Err(BiopaxError::SourceNotFound(format!("event {}", missing)));
        }
        let root = SourcePathway {
            db_id: EVENTS_ROOT_ID,
            display_name: EVENTS_ROOT_NAME.to_string(),
            species_name: None,
            summation: Vec::new(),
            has_event: event_ids.to_vec(),
        };
        self.run(Some(&root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biopax::BiopaxType;
    use crate::source::{
        CatalystActivity, SourceEvent, SourceReaction, SourceSpecies, Summation,
    };
    use std::collections::HashSet;

    fn pathway(db_id: i64, species: &str, children: Vec<i64>) -> SourceEvent {
        SourceEvent::Pathway(SourcePathway {
            db_id,
            display_name: format!("Pathway {}", db_id),
            species_name: Some(species.to_string()),
            summation: vec![Summation {
                text: format!("About <i>pathway</i> {}", db_id),
            }],
            has_event: children,
        })
    }

    fn reaction(db_id: i64, catalysts: usize) -> SourceEvent {
        SourceEvent::Reaction(SourceReaction {
            db_id,
            display_name: format!("Reaction {}", db_id),
            species_name: Some("Homo sapiens".to_string()),
            summation: Vec::new(),
            catalyst_activity: vec![CatalystActivity::default(); catalysts],
            input: Vec::new(),
            output: Vec::new(),
        })
    }

    /// P1 -> P2 -> P3 -> R1 (one catalyst activity).
    fn three_levels() -> SourceGraph {
        let mut graph = SourceGraph::new(99);
        graph.add_species(SourceSpecies {
            db_id: 48887,
            display_name: "Homo sapiens".to_string(),
        });
        graph.add_event(pathway(1, "Homo sapiens", vec![2]));
        graph.add_event(pathway(2, "Homo sapiens", vec![3]));
        graph.add_event(pathway(3, "Homo sapiens", vec![100]));
        graph.add_event(reaction(100, 1));
        graph
    }

    #[test]
    fn test_three_level_scenario() {
        let graph = three_levels();
        let mut run = TransformationRun::new(&graph);
        let target = run.run(graph.pathway(1)).unwrap().unwrap();
        let model = &target.model;

        assert_eq!(model.count_of(BiopaxType::Pathway), 3);
        assert_eq!(model.count_of(BiopaxType::PathwayStep), 3);
        assert_eq!(model.count_of(BiopaxType::BiochemicalReaction), 1);
        assert_eq!(model.count_of(BiopaxType::Catalysis), 1);
        assert_eq!(model.count_of(BiopaxType::BioSource), 1);
        assert_eq!(model.count_of(BiopaxType::Provenance), 1);

        let reaction = model.objects_of(BiopaxType::BiochemicalReaction)[0];
        let catalysis = model.objects_of(BiopaxType::Catalysis)[0];
        let p3 = model.find_by_uri("http://www.reactome.org/biopax/99/1#Pathway3").unwrap();
        let step = model.pathway(p3).unwrap().pathway_order[0];
        assert_eq!(model.step(step).unwrap().step_processes, vec![reaction, catalysis]);

        let organisms: HashSet<_> = model
            .objects_of(BiopaxType::Pathway)
            .into_iter()
            .map(|p| model.pathway(p).unwrap().organism)
            .collect();
        assert_eq!(organisms.len(), 1);
        let sources: HashSet<_> = model
            .objects_of(BiopaxType::Pathway)
            .into_iter()
            .map(|p| model.pathway(p).unwrap().data_sources.clone())
            .collect();
        assert_eq!(sources.len(), 1);
    }

    #[test]
    fn test_identifier_allocation_order() {
        let graph = three_levels();
        let mut run = TransformationRun::new(&graph);
        let target = run.run(graph.pathway(1)).unwrap().unwrap();
        let uris: Vec<&str> = target.model.iter().map(|(_, e)| e.uri.as_str()).collect();
        let local: Vec<&str> = uris
            .iter()
            .map(|u| u.trim_start_matches("http://www.reactome.org/biopax/99/1#"))
            .collect();
        assert_eq!(
            local,
            vec![
                "Pathway1",
                "BioSource1",
                "Provenance1",
                "Evidence1",
                "PathwayStep1",
                "Pathway2",
                "Evidence2",
                "PathwayStep2",
                "Pathway3",
                "Evidence3",
                "PathwayStep3",
                "BiochemicalReaction1",
                "Catalysis1",
                "Evidence4",
            ]
        );
    }

    #[test]
    fn test_identifiers_unique_and_well_formed() {
        let graph = three_levels();
        let mut run = TransformationRun::new(&graph);
        let target = run.run(graph.pathway(1)).unwrap().unwrap();
        let prefix = target.xml_base().to_string();
        assert_eq!(prefix, "http://www.reactome.org/biopax/99/1#");

        let mut seen = HashSet::new();
        for (_, element) in target.model.iter() {
            assert!(seen.insert(element.uri.clone()));
            let local = element.uri.strip_prefix(&prefix).unwrap();
            let counter = local.strip_prefix(element.biopax_type().as_str()).unwrap();
            assert!(counter.parse::<u32>().unwrap() >= 1);
        }
    }

    #[test]
    fn test_runs_are_deterministic_and_independent() {
        let graph = three_levels();
        let mut run = TransformationRun::new(&graph);
        let first = run.run(graph.pathway(1)).unwrap().unwrap();
        let other = run.run(graph.pathway(2)).unwrap().unwrap();
        let second = run.run(graph.pathway(1)).unwrap().unwrap();

        let snapshot = |t: &TargetGraph| -> Vec<String> {
            t.model.iter().map(|(_, e)| format!("{} {:?}", e.uri, e.kind)).collect()
        };
        assert_eq!(snapshot(&first), snapshot(&second));
        assert_eq!(
            other.model.uri(other.root().unwrap()),
            Some("http://www.reactome.org/biopax/99/2#Pathway1")
        );
    }

    #[test]
    fn test_absent_root_yields_nothing() {
        let graph = three_levels();
        let mut run = TransformationRun::new(&graph);
        assert!(run.run(None).unwrap().is_none());
        assert!(run.run(graph.pathway(100)).unwrap().is_none());
        assert!(matches!(
            run.run_pathway(100),
            Err(BiopaxError::SourceNotFound(_))
        ));
    }

    #[test]
    fn test_version_and_base_overrides() {
        let graph = three_levels();
        let mut run = TransformationRun::new(&graph)
            .with_version(42)
            .with_base_uri("http://example.org/bp/");
        let target = run.run_pathway(3).unwrap().unwrap();
        assert_eq!(target.xml_base(), "http://example.org/bp/42/3#");
        assert_eq!(run.version(), 42);
    }

    #[test]
    fn test_species_run_shares_sub_pathways_across_roots() {
        let mut graph = three_levels();
        graph.add_event(pathway(5, "Homo sapiens", vec![3]));
        graph.add_event(pathway(6, "Mus musculus", Vec::new()));

        let mut run = TransformationRun::new(&graph);
        let target = run.run_species(48887).unwrap().unwrap();
        let model = &target.model;

        assert_eq!(target.xml_base(), "http://www.reactome.org/biopax/99/species/48887#");
        assert_eq!(target.roots.len(), 2);
        assert_eq!(model.uri(target.roots[0]).map(|u| u.ends_with("#Pathway1")), Some(true));
        assert_eq!(model.count_of(BiopaxType::Pathway), 4);
        assert_eq!(model.count_of(BiopaxType::BioSource), 1);
        let organism = model.find_by_uri("http://www.reactome.org/biopax/99/species/48887#BioSource1");
        assert_eq!(model.pathway(target.roots[1]).unwrap().organism, organism);
    }

    #[test]
    fn test_species_without_pathways() {
        let mut graph = SourceGraph::new(99);
        graph.add_species(SourceSpecies {
            db_id: 7,
            display_name: "Gallus gallus".to_string(),
        });
        let mut run = TransformationRun::new(&graph);
        assert!(run.run_species(7).unwrap().is_none());
        assert!(matches!(run.run_species(8), Err(BiopaxError::SourceNotFound(_))));
    }

    #[test]
    fn test_event_list_under_synthetic_root() {
        let graph = three_levels();
        let mut run = TransformationRun::new(&graph);
        let target = run.run_events(&[100, 3]).unwrap().unwrap();
        let model = &target.model;

        assert_eq!(target.xml_base(), "http://www.reactome.org/biopax/99/0#");
        let root = model.pathway(target.root().unwrap()).unwrap();
        assert_eq!(root.display_name.as_deref(), Some(EVENTS_ROOT_NAME));
        assert!(root.organism.is_none());
        assert_eq!(root.pathway_order.len(), 2);
        assert_eq!(model.get(root.pathway_components[0]).unwrap().biopax_type(), BiopaxType::BiochemicalReaction);
        assert_eq!(model.count_of(BiopaxType::BiochemicalReaction), 1);

        assert!(run.run_events(&[]).unwrap().is_none());
        assert!(matches!(run.run_events(&[100, 999]), Err(BiopaxError::SourceNotFound(_))));
    }
}
