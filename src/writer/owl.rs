//! BioPAX Level 3 RDF/XML output.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

use crate::biopax::{BiopaxModel, Element, ElementId, ElementKind};
use crate::error::{BiopaxError, Result};

pub const BIOPAX_NS: &str = "http://www.biopax.org/release/biopax-level3.owl#";
const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";
const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";
const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

fn xml_err(e: impl std::fmt::Display) -> BiopaxError {
    BiopaxError::Serialization(e.to_string())
}

struct OwlWriter<'m, W: Write> {
    xml: Writer<W>,
    model: &'m BiopaxModel,
}

impl<'m, W: Write> OwlWriter<'m, W> {
    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.xml.write_event(event).map_err(xml_err)
    }

    /// `rdf:ID` for identifiers under the document base, `rdf:about` otherwise.
    fn subject_attr<'a>(&'a self, uri: &'a str) -> (&'a str, &'a str) {
        match uri.strip_prefix(self.model.xml_base()) {
            Some(local) if !self.model.xml_base().is_empty() => ("rdf:ID", local),
            _ => ("rdf:about", uri),
        }
    }

    fn resource(&self, id: ElementId) -> Result<String> {
        let uri = self
            .model
            .uri(id)
            .ok_or_else(|| xml_err(format!("dangling element handle {}", id.index())))?;
        Ok(match uri.strip_prefix(self.model.xml_base()) {
            Some(local) if !self.model.xml_base().is_empty() => format!("#{}", local),
            _ => uri.to_string(),
        })
    }

    fn literal(&mut self, property: &str, value: &str) -> Result<()> {
        let mut start = BytesStart::new(property);
        start.push_attribute(("rdf:datatype", XSD_STRING));
        self.event(Event::Start(start))?;
        self.event(Event::Text(BytesText::new(value)))?;
        self.event(Event::End(BytesEnd::new(property)))
    }

    fn literals(&mut self, property: &str, values: &[String]) -> Result<()> {
        for value in values {
            self.literal(property, value)?;
        }
        Ok(())
    }

    fn reference(&mut self, property: &str, target: ElementId) -> Result<()> {
        let resource = self.resource(target)?;
        let mut empty = BytesStart::new(property);
        empty.push_attribute(("rdf:resource", resource.as_str()));
        self.event(Event::Empty(empty))
    }

    fn references(&mut self, property: &str, targets: &[ElementId]) -> Result<()> {
        for target in targets {
            self.reference(property, *target)?;
        }
        Ok(())
    }

    fn header(&mut self) -> Result<()> {
        self.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        let mut root = BytesStart::new("rdf:RDF");
        root.push_attribute(("xmlns:xsd", XSD_NS));
        root.push_attribute(("xmlns:rdf", RDF_NS));
        root.push_attribute(("xmlns:rdfs", RDFS_NS));
        root.push_attribute(("xmlns:owl", OWL_NS));
        root.push_attribute(("xmlns:bp", BIOPAX_NS));
        root.push_attribute(("xml:base", self.model.xml_base()));
        self.event(Event::Start(root))?;

        let mut ontology = BytesStart::new("owl:Ontology");
        ontology.push_attribute(("rdf:about", ""));
        self.event(Event::Start(ontology))?;
        let mut imports = BytesStart::new("owl:imports");
        imports.push_attribute(("rdf:resource", BIOPAX_NS));
        self.event(Event::Empty(imports))?;
        self.event(Event::End(BytesEnd::new("owl:Ontology")))
    }

    fn element(&mut self, element: &Element) -> Result<()> {
        let tag = format!("bp:{}", element.biopax_type());
        let mut start = BytesStart::new(tag.as_str());
        start.push_attribute(self.subject_attr(&element.uri));
        self.event(Event::Start(start))?;

        match &element.kind {
            ElementKind::Pathway(p) => {
                if let Some(name) = &p.display_name {
                    self.literal("bp:displayName", name)?;
                }
                self.literals("bp:comment", &p.comments)?;
                if let Some(organism) = p.organism {
                    self.reference("bp:organism", organism)?;
                }
                self.references("bp:pathwayComponent", &p.pathway_components)?;
                self.references("bp:pathwayOrder", &p.pathway_order)?;
                self.references("bp:dataSource", &p.data_sources)?;
                self.references("bp:evidence", &p.evidence)?;
            }
            ElementKind::PathwayStep(s) => {
                self.references("bp:stepProcess", &s.step_processes)?;
            }
            ElementKind::BiochemicalReaction(r) => {
                if let Some(name) = &r.display_name {
                    self.literal("bp:displayName", name)?;
                }
                self.literals("bp:comment", &r.comments)?;
                self.references("bp:left", &r.left)?;
                self.references("bp:right", &r.right)?;
                self.references("bp:dataSource", &r.data_sources)?;
                self.references("bp:evidence", &r.evidence)?;
            }
            ElementKind::Catalysis(c) => {
                if let Some(controlled) = c.controlled {
                    self.reference("bp:controlled", controlled)?;
                }
            }
            ElementKind::BioSource(b) => {
                self.literals("bp:name", &b.names)?;
            }
            ElementKind::Provenance(p) => {
                self.literals("bp:name", &p.names)?;
                self.literals("bp:comment", &p.comments)?;
            }
            ElementKind::Evidence(_) => {}
            ElementKind::SmallMolecule(p)
            | ElementKind::Protein(p)
            | ElementKind::Complex(p)
            | ElementKind::PhysicalEntity(p) => {
                if let Some(name) = &p.display_name {
                    self.literal("bp:displayName", name)?;
                }
            }
        }

        self.event(Event::End(BytesEnd::new(tag.as_str())))
    }
}

/// Serialize every element of `model`, in creation order.
pub fn write_model<W: Write>(model: &BiopaxModel, out: W) -> Result<()> {
    let mut writer = OwlWriter {
        xml: Writer::new_with_indent(out, b' ', 2),
        model,
    };
    writer.header()?;
    for (_, element) in model.iter() {
        writer.element(element)?;
    }
    writer.event(Event::End(BytesEnd::new("rdf:RDF")))?;
    writer.xml.get_mut().flush()?;
    Ok(())
}

pub fn to_owl_string(model: &BiopaxModel) -> Result<String> {
    let mut buf = Vec::new();
    write_model(model, &mut buf)?;
    String::from_utf8(buf).map_err(xml_err)
}
