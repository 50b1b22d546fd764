//! Recursive pathway conversion.

use super::comment::comment_from_summations;
use super::run::TransformationRun;
use super::shared;
use crate::biopax::{push_unique, BiopaxType, Element, ElementId, ElementKind, Pathway, PathwayStep};
use crate::error::Result;
use crate::source::{SourceEvent, SourcePathway};

impl TransformationRun<'_> {
    /// Convert a pathway and everything below it.
    ///
    /// The new pathway is cached before its children are visited, so a
    /// sub-pathway reached again further down (through sharing or a cycle)
    /// resolves to the element already under construction. Each child event
    /// gets its own step, in source order.
    pub fn transform_pathway(&mut self, source: Option<&SourcePathway>) -> Result<Option<ElementId>> {
        let Some(source) = source else {
            return Ok(None);
        };
        if let Some(hit) = self.events.get(source.db_id) {
            log::debug!("Reusing pathway {}", source.db_id);
            return Ok(Some(hit));
        }

        let uri = self.ids.next(BiopaxType::Pathway);
        log::debug!("Creating {} for pathway {}", uri, source.db_id);
        let pathway = self.model.add(Element::new(
            uri,
            ElementKind::Pathway(Pathway {
                display_name: Some(source.display_name.clone()),
                ..Default::default()
            }),
        ))?;
        self.events.insert(source.db_id, pathway);

        let comment = comment_from_summations(&source.summation);
        if !comment.trim().is_empty() {
            self.model.pathway_mut(pathway)?.comments.push(comment);
        }

        match source.species_name.as_deref() {
            Some(species) => {
                let organism = shared::resolve_organism(&mut self.model, &mut self.ids, species)?;
                self.model.pathway_mut(pathway)?.organism = Some(organism);
            }
            None => log::debug!("Pathway {} has no species", source.db_id),
        }
        let data_source = shared::resolve_data_source(&mut self.model, &mut self.ids)?;
        self.model.add_data_source(pathway, data_source)?;
        let evidence = shared::create_evidence(&mut self.model, &mut self.ids)?;
        self.model.add_evidence(pathway, evidence)?;

        let graph = self.graph;
        for child_id in &source.has_event {
            let Some(child) = graph.event(*child_id) else {
                log::warn!("Pathway {} lists unknown event {}", source.db_id, child_id);
                continue;
            };

            let step_uri = self.ids.next(BiopaxType::PathwayStep);
            let step = self
                .model
                .add(Element::new(step_uri, ElementKind::PathwayStep(PathwayStep::default())))?;

            let component = match child {
                SourceEvent::Pathway(p) => self.transform_pathway(Some(p))?,
                SourceEvent::Reaction(r) => self.transform_reaction(Some(r))?,
            };
            if let Some(component) = component {
                self.add_step_process(pathway, step, component)?;
            }

            self.model.pathway_mut(pathway)?.pathway_order.push(step);
        }

        Ok(Some(pathway))
    }

    /// Record `component` on the pathway and the step. A reaction's catalyses
    /// join the same step.
    fn add_step_process(&mut self, pathway: ElementId, step: ElementId, component: ElementId) -> Result<()> {
        push_unique(&mut self.model.pathway_mut(pathway)?.pathway_components, component);

        let catalyses = self
            .model
            .reaction(component)
            .map(|r| r.controlled_of.clone())
            .unwrap_or_default();
        let step = self.model.step_mut(step)?;
        push_unique(&mut step.step_processes, component);
        for catalysis in catalyses {
            push_unique(&mut step.step_processes, catalysis);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{CatalystActivity, SourceGraph, SourceReaction, Summation};

    const PREFIX: &str = "http://www.reactome.org/biopax/99/1#";

    fn pathway(db_id: i64, species: Option<&str>, children: Vec<i64>) -> SourcePathway {
        SourcePathway {
            db_id,
            display_name: format!("Pathway {}", db_id),
            species_name: species.map(str::to_string),
            summation: Vec::new(),
            has_event: children,
        }
    }

    fn reaction(db_id: i64, catalysts: usize) -> SourceReaction {
        SourceReaction {
            db_id,
            display_name: format!("Reaction {}", db_id),
            species_name: Some("Homo sapiens".to_string()),
            summation: Vec::new(),
            catalyst_activity: vec![CatalystActivity::default(); catalysts],
            input: Vec::new(),
            output: Vec::new(),
        }
    }

    fn convert(graph: &SourceGraph, root: i64) -> (TransformationRun<'_>, ElementId) {
        let mut run = TransformationRun::new(graph);
        run.reset(PREFIX.to_string());
        let id = run.transform_pathway(graph.pathway(root)).unwrap().unwrap();
        (run, id)
    }

    #[test]
    fn test_absent_pathway_is_noop() {
        let graph = SourceGraph::new(99);
        let mut run = TransformationRun::new(&graph);
        assert_eq!(run.transform_pathway(None).unwrap(), None);
        assert!(run.model.is_empty());
    }

    #[test]
    fn test_pathway_properties() {
        let mut graph = SourceGraph::new(99);
        let mut source = pathway(1, Some("Homo sapiens"), Vec::new());
        source.summation = vec![
            Summation {
                text: "<p>First</p>".to_string(),
            },
            Summation {
                text: "A<>B".to_string(),
            },
        ];
        graph.add_event(SourceEvent::Pathway(source));

        let (run, id) = convert(&graph, 1);
        let p = run.model.pathway(id).unwrap();
        assert_eq!(run.model.uri(id), Some("http://www.reactome.org/biopax/99/1#Pathway1"));
        assert_eq!(p.display_name.as_deref(), Some("Pathway 1"));
        assert_eq!(p.comments, vec![" First \nA interconverts to B"]);
        let organism = p.organism.unwrap();
        assert_eq!(run.model.get(organism).unwrap().names(), ["Homo sapiens".to_string()]);
    }

    #[test]
    fn test_empty_pathway_still_gets_shared_entities() {
        let mut graph = SourceGraph::new(99);
        graph.add_event(SourceEvent::Pathway(pathway(1, Some("Homo sapiens"), Vec::new())));

        let (run, id) = convert(&graph, 1);
        let p = run.model.pathway(id).unwrap();
        assert!(p.pathway_order.is_empty());
        assert!(p.pathway_components.is_empty());
        assert!(p.comments.is_empty());
        assert!(p.organism.is_some());
        assert_eq!(p.data_sources.len(), 1);
        assert_eq!(p.evidence.len(), 1);
    }

    #[test]
    fn test_pathway_without_species_has_no_organism() {
        let mut graph = SourceGraph::new(99);
        graph.add_event(SourceEvent::Pathway(pathway(1, None, Vec::new())));

        let (run, id) = convert(&graph, 1);
        assert!(run.model.pathway(id).unwrap().organism.is_none());
        assert_eq!(run.model.count_of(BiopaxType::BioSource), 0);
    }

    #[test]
    fn test_steps_follow_child_order() {
        let mut graph = SourceGraph::new(99);
        graph.add_event(SourceEvent::Pathway(pathway(1, None, vec![12, 10, 11])));
        for id in [10, 11, 12] {
            graph.add_event(SourceEvent::Reaction(reaction(id, 0)));
        }

        let (run, id) = convert(&graph, 1);
        let p = run.model.pathway(id).unwrap();
        assert_eq!(p.pathway_order.len(), 3);
        let names: Vec<&str> = p
            .pathway_order
            .iter()
            .map(|step| {
                let process = run.model.step(*step).unwrap().step_processes[0];
                run.model.reaction(process).unwrap().display_name.as_deref().unwrap()
            })
            .collect();
        assert_eq!(names, vec!["Reaction 12", "Reaction 10", "Reaction 11"]);

        let first_processes: Vec<ElementId> = p
            .pathway_order
            .iter()
            .map(|s| run.model.step(*s).unwrap().step_processes[0])
            .collect();
        assert_eq!(p.pathway_components, first_processes);
    }

    #[test]
    fn test_catalyses_join_the_reaction_step() {
        let mut graph = SourceGraph::new(99);
        graph.add_event(SourceEvent::Pathway(pathway(1, None, vec![10])));
        graph.add_event(SourceEvent::Reaction(reaction(10, 2)));

        let (run, id) = convert(&graph, 1);
        let p = run.model.pathway(id).unwrap();
        let step = run.model.step(p.pathway_order[0]).unwrap();
        assert_eq!(step.step_processes.len(), 3);
        let rxn = run.model.reaction(step.step_processes[0]).unwrap();
        assert_eq!(&step.step_processes[1..], rxn.controlled_of.as_slice());
        // catalyses are step processes only, not pathway components
        assert_eq!(p.pathway_components.len(), 1);
    }

    #[test]
    fn test_shared_sub_pathway_materialized_once() {
        let mut graph = SourceGraph::new(99);
        graph.add_event(SourceEvent::Pathway(pathway(1, None, vec![2, 3])));
        graph.add_event(SourceEvent::Pathway(pathway(2, None, vec![4])));
        graph.add_event(SourceEvent::Pathway(pathway(3, None, vec![4])));
        graph.add_event(SourceEvent::Pathway(pathway(4, None, vec![10])));
        graph.add_event(SourceEvent::Reaction(reaction(10, 1)));

        let (run, _) = convert(&graph, 1);
        assert_eq!(run.model.count_of(BiopaxType::Pathway), 4);
        assert_eq!(run.model.count_of(BiopaxType::BiochemicalReaction), 1);
        assert_eq!(run.model.count_of(BiopaxType::Catalysis), 1);

        let shared = run.events.get(4).unwrap();
        let via_2 = run.model.pathway(run.events.get(2).unwrap()).unwrap();
        let via_3 = run.model.pathway(run.events.get(3).unwrap()).unwrap();
        assert_eq!(via_2.pathway_components, vec![shared]);
        assert_eq!(via_3.pathway_components, vec![shared]);
        // steps are per parent even when the component is shared
        assert_ne!(via_2.pathway_order, via_3.pathway_order);
    }

    #[test]
    fn test_shared_reaction_keeps_catalysis_on_every_parent_step() {
        let mut graph = SourceGraph::new(99);
        graph.add_event(SourceEvent::Pathway(pathway(1, None, vec![2, 3])));
        graph.add_event(SourceEvent::Pathway(pathway(2, None, vec![100])));
        graph.add_event(SourceEvent::Pathway(pathway(3, None, vec![100])));
        graph.add_event(SourceEvent::Reaction(reaction(100, 1)));

        let (run, _) = convert(&graph, 1);
        assert_eq!(run.model.count_of(BiopaxType::BiochemicalReaction), 1);
        assert_eq!(run.model.count_of(BiopaxType::Catalysis), 1);

        let rxn = run.events.get(100).unwrap();
        let catalysis = run.model.reaction(rxn).unwrap().controlled_of[0];
        for parent in [2, 3] {
            let p = run.model.pathway(run.events.get(parent).unwrap()).unwrap();
            assert_eq!(p.pathway_components, vec![rxn]);
            let step = run.model.step(p.pathway_order[0]).unwrap();
            assert_eq!(step.step_processes, vec![rxn, catalysis], "parent {}", parent);
        }
    }

    #[test]
    fn test_cycle_terminates() {
        let mut graph = SourceGraph::new(99);
        graph.add_event(SourceEvent::Pathway(pathway(1, None, vec![2])));
        graph.add_event(SourceEvent::Pathway(pathway(2, None, vec![1])));

        let (run, root) = convert(&graph, 1);
        assert_eq!(run.model.count_of(BiopaxType::Pathway), 2);
        let child = run.model.pathway(root).unwrap().pathway_components[0];
        assert_eq!(run.model.pathway(child).unwrap().pathway_components, vec![root]);
    }

    #[test]
    fn test_evidence_not_shared_between_pathways() {
        let mut graph = SourceGraph::new(99);
        graph.add_event(SourceEvent::Pathway(pathway(1, Some("Homo sapiens"), vec![2])));
        graph.add_event(SourceEvent::Pathway(pathway(2, Some("Homo sapiens"), Vec::new())));

        let (run, root) = convert(&graph, 1);
        let parent = run.model.pathway(root).unwrap();
        let child = run.model.pathway(parent.pathway_components[0]).unwrap();
        assert_ne!(parent.evidence, child.evidence);
        assert_eq!(parent.organism, child.organism);
        assert_eq!(parent.data_sources, child.data_sources);
        assert_eq!(run.model.count_of(BiopaxType::Evidence), 2);
    }
}
