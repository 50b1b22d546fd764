//! Run-scoped identifier allocation.

use std::collections::HashMap;

use crate::biopax::BiopaxType;

/// Namespace every Reactome BioPAX document lives under.
pub const DEFAULT_BASE_URI: &str = "http://www.reactome.org/biopax/";

/// `<base><version>/<rootId>#`
pub fn xml_base(base_uri: &str, version: u32, root_id: i64) -> String {
    format!("{}{}/{}#", base_uri, version, root_id)
}

/// `<base><version>/species/<speciesId>#`
pub fn species_xml_base(base_uri: &str, version: u32, species_id: i64) -> String {
    format!("{}{}/species/{}#", base_uri, version, species_id)
}

/// Hands out `<prefix><TypeName><N>` identifiers with a 1-based counter per
/// type name. One allocator belongs to one run.
#[derive(Debug, Clone)]
pub struct IdentifierAllocator {
    prefix: String,
    counters: HashMap<String, u32>,
}

impl IdentifierAllocator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counters: HashMap::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Start a fresh run under a new prefix; every counter restarts at 1.
    pub fn reset(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
        self.counters.clear();
    }

    pub fn next(&mut self, ty: BiopaxType) -> String {
        self.next_for_name(ty.as_str())
    }

    /// # Panics
    ///
    /// Panics if `type_name` is empty; that is a caller bug, not a data error.
    pub fn next_for_name(&mut self, type_name: &str) -> String {
        assert!(!type_name.is_empty(), "identifier type name must not be empty");
        let counter = self.counters.entry(type_name.to_string()).or_insert(0);
        *counter += 1;
        format!("{}{}{}", self.prefix, type_name, counter)
    }

    /// Identifier the `n`th object of `ty` received (or will receive) in this run.
    pub fn id_of(&self, ty: BiopaxType, n: u32) -> String {
        format!("{}{}{}", self.prefix, ty.as_str(), n)
    }

    /// Number of identifiers issued so far for `ty`.
    pub fn issued(&self, ty: BiopaxType) -> u32 {
        self.counters.get(ty.as_str()).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_xml_base_format() {
        assert_eq!(
            xml_base(DEFAULT_BASE_URI, 99, 9010984),
            "http://www.reactome.org/biopax/99/9010984#"
        );
        assert_eq!(
            species_xml_base(DEFAULT_BASE_URI, 42, 48887),
            "http://www.reactome.org/biopax/42/species/48887#"
        );
    }

    #[test]
    fn test_counters_are_per_type_and_one_based() {
        let mut ids = IdentifierAllocator::new(xml_base(DEFAULT_BASE_URI, 42, 123));
        assert_eq!(ids.next(BiopaxType::Pathway), "http://www.reactome.org/biopax/42/123#Pathway1");
        assert_eq!(ids.next(BiopaxType::PathwayStep), "http://www.reactome.org/biopax/42/123#PathwayStep1");
        assert_eq!(ids.next(BiopaxType::Pathway), "http://www.reactome.org/biopax/42/123#Pathway2");
        assert_eq!(ids.issued(BiopaxType::Pathway), 2);
        assert_eq!(ids.issued(BiopaxType::Evidence), 0);
    }

    #[test]
    fn test_no_duplicates_across_many_calls() {
        let mut ids = IdentifierAllocator::new("p#");
        let mut seen = HashSet::new();
        for _ in 0..50 {
            for ty in [BiopaxType::Pathway, BiopaxType::Catalysis, BiopaxType::Evidence] {
                assert!(seen.insert(ids.next(ty)));
            }
        }
        assert_eq!(seen.len(), 150);
    }

    #[test]
    fn test_reset_restarts_counters_under_new_prefix() {
        let mut ids = IdentifierAllocator::new("a#");
        ids.next(BiopaxType::Pathway);
        ids.next(BiopaxType::Pathway);
        ids.reset("b#");
        assert_eq!(ids.prefix(), "b#");
        assert_eq!(ids.next(BiopaxType::Pathway), "b#Pathway1");
    }

    #[test]
    fn test_id_of_matches_issued_identifier() {
        let mut ids = IdentifierAllocator::new("x#");
        let first = ids.next(BiopaxType::Provenance);
        assert_eq!(ids.id_of(BiopaxType::Provenance, 1), first);
    }

    #[test]
    fn test_free_form_type_name() {
        let mut ids = IdentifierAllocator::new("x#");
        assert_eq!(ids.next_for_name("Process"), "x#Process1");
    }

    #[test]
    #[should_panic(expected = "must not be empty")]
    fn test_empty_type_name_panics() {
        let mut ids = IdentifierAllocator::new("x#");
        ids.next_for_name("");
    }
}
