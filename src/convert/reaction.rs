//! Reaction-like events to BiochemicalReaction plus Catalysis.

use super::comment::comment_from_summations;
use super::run::TransformationRun;
use super::shared;
use crate::biopax::{
    push_unique, BiochemicalReaction, BiopaxType, Catalysis, Element, ElementId, ElementKind,
    Participant,
};
use crate::error::Result;
use crate::source::{PhysicalEntityKind, SourceReaction};

fn participant_kind(kind: PhysicalEntityKind, participant: Participant) -> ElementKind {
    match kind {
        PhysicalEntityKind::SimpleEntity => ElementKind::SmallMolecule(participant),
        PhysicalEntityKind::EntityWithAccessionedSequence => ElementKind::Protein(participant),
        PhysicalEntityKind::Complex => ElementKind::Complex(participant),
        PhysicalEntityKind::Other => ElementKind::PhysicalEntity(participant),
    }
}

impl TransformationRun<'_> {
    /// Convert a reaction, or return the element already built for it in
    /// this run. An absent reaction is a no-op.
    pub fn transform_reaction(&mut self, source: Option<&SourceReaction>) -> Result<Option<ElementId>> {
        let Some(source) = source else {
            return Ok(None);
        };
        if let Some(hit) = self.events.get(source.db_id) {
            log::debug!("Reusing reaction {}", source.db_id);
            return Ok(Some(hit));
        }

        let uri = self.ids.next(BiopaxType::BiochemicalReaction);
        log::debug!("Creating {} for reaction {}", uri, source.db_id);
        let reaction = self.model.add(Element::new(
            uri,
            ElementKind::BiochemicalReaction(BiochemicalReaction {
                display_name: Some(source.display_name.clone()),
                ..Default::default()
            }),
        ))?;
        self.events.insert(source.db_id, reaction);

        let comment = comment_from_summations(&source.summation);
        if !comment.trim().is_empty() {
            self.model.reaction_mut(reaction)?.comments.push(comment);
        }

        for input in &source.input {
            if let Some(p) = self.participant(*input)? {
                push_unique(&mut self.model.reaction_mut(reaction)?.left, p);
            }
        }
        for output in &source.output {
            if let Some(p) = self.participant(*output)? {
                push_unique(&mut self.model.reaction_mut(reaction)?.right, p);
            }
        }

        for _ in &source.catalyst_activity {
            let uri = self.ids.next(BiopaxType::Catalysis);
            let catalysis = self
                .model
                .add(Element::new(uri, ElementKind::Catalysis(Catalysis::default())))?;
            self.model.link_control(catalysis, reaction)?;
        }

        let data_source = shared::resolve_data_source(&mut self.model, &mut self.ids)?;
        self.model.add_data_source(reaction, data_source)?;
        let evidence = shared::create_evidence(&mut self.model, &mut self.ids)?;
        self.model.add_evidence(reaction, evidence)?;

        Ok(Some(reaction))
    }

    /// Physical entities are shared between reactions within a run.
    fn participant(&mut self, db_id: i64) -> Result<Option<ElementId>> {
        let graph = self.graph;
        let Some(entity) = graph.physical_entity(db_id) else {
            log::warn!("Skipping unknown physical entity {}", db_id);
            return Ok(None);
        };
        let model = &mut self.model;
        let ids = &mut self.ids;
        let id = self.participants.get_or_create(db_id, || {
            let kind = participant_kind(
                entity.kind,
                Participant {
                    display_name: Some(entity.display_name.clone()),
                },
            );
            let uri = ids.next(kind.biopax_type());
            model.add(Element::new(uri, kind))
        })?;
        Ok(Some(id))
    }
}
