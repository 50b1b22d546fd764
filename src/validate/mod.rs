//! Structural checks on a finished model.
//!
//! Issues are collected rather than raised; the exporter logs them and
//! records them in the export report.

use serde::Serialize;
use std::collections::HashMap;

use crate::biopax::{BiopaxModel, BiopaxType, ElementId};

pub const RULE_STEP_OWNER: &str = "step-owner";
pub const RULE_STEP_PROCESS: &str = "step-process";
pub const RULE_CATALYSIS_CONTROLLED: &str = "catalysis-controlled";
pub const RULE_PATHWAY_NAME: &str = "pathway-display-name";
pub const RULE_SINGLE_PROVENANCE: &str = "single-provenance";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub uri: String,
    pub rule: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    fn push(&mut self, model: &BiopaxModel, id: ElementId, rule: &str, message: String) {
        self.issues.push(ValidationIssue {
            uri: model.uri(id).unwrap_or_default().to_string(),
            rule: rule.to_string(),
            message,
        });
    }

    pub fn issues_for(&self, rule: &str) -> impl Iterator<Item = &ValidationIssue> {
        let rule = rule.to_string();
        self.issues.iter().filter(move |i| i.rule == rule)
    }
}

pub fn validate_model(model: &BiopaxModel) -> ValidationReport {
    let mut report = ValidationReport::default();

    let mut owners: HashMap<ElementId, Vec<ElementId>> = HashMap::new();
    for pathway in model.objects_of(BiopaxType::Pathway) {
        let Some(p) = model.pathway(pathway) else { continue };
        if p.display_name.as_deref().map_or(true, str::is_empty) {
            report.push(model, pathway, RULE_PATHWAY_NAME, "pathway has no display name".to_string());
        }
        for step in &p.pathway_order {
            owners.entry(*step).or_default().push(pathway);
        }
    }

    for step in model.objects_of(BiopaxType::PathwayStep) {
        let owner = match owners.get(&step).map(Vec::as_slice) {
            Some([owner]) => *owner,
            Some(many) => {
                report.push(
                    model,
                    step,
                    RULE_STEP_OWNER,
                    format!("step is listed by {} pathways", many.len()),
                );
                continue;
            }
            None => {
                report.push(model, step, RULE_STEP_OWNER, "step belongs to no pathway".to_string());
                continue;
            }
        };
        let (Some(s), Some(p)) = (model.step(step), model.pathway(owner)) else { continue };
        for process in &s.step_processes {
            let is_component = p.pathway_components.contains(process);
            let controls_component = model
                .catalysis(*process)
                .and_then(|c| c.controlled)
                .map_or(false, |r| p.pathway_components.contains(&r));
            if !is_component && !controls_component {
                report.push(
                    model,
                    step,
                    RULE_STEP_PROCESS,
                    format!(
                        "step process {} is not part of {}",
                        model.uri(*process).unwrap_or_default(),
                        model.uri(owner).unwrap_or_default()
                    ),
                );
            }
        }
    }

    for catalysis in model.objects_of(BiopaxType::Catalysis) {
        if model.catalysis(catalysis).and_then(|c| c.controlled).is_none() {
            report.push(model, catalysis, RULE_CATALYSIS_CONTROLLED, "catalysis controls nothing".to_string());
        }
    }

    let provenances = model.objects_of(BiopaxType::Provenance);
    if provenances.len() > 1 {
        for extra in &provenances[1..] {
            report.push(
                model,
                *extra,
                RULE_SINGLE_PROVENANCE,
                format!("{} data sources in one document", provenances.len()),
            );
        }
    }

    for issue in &report.issues {
        log::warn!("Validation [{}] {}: {}", issue.rule, issue.uri, issue.message);
    }
    report
}
