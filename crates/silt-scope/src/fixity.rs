//! Per-scope fixity table, and the bridge from it to a `silt_mixfix`
//! precedence DAG for one reparse call.

use std::collections::HashSet;

use rustc_hash::FxHashMap;

pub use silt_mixfix::{Assoc, Fixity, PrecedenceLevel};
use silt_mixfix::{NewNotation, PrecedenceDag};

use crate::names::Name;

#[derive(Debug, Clone, Default)]
pub struct FixityTable {
    fixities: FxHashMap<Name, Fixity>,
}

impl FixityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: Name, fixity: Fixity) {
        self.fixities.insert(name, fixity);
    }

    pub fn contains(&self, name: &Name) -> bool {
        self.fixities.contains_key(name)
    }

    pub fn get(&self, name: &Name) -> Option<Fixity> {
        self.fixities.get(name).copied()
    }

    /// Builds the precedence DAG restricted to notations whose name pieces
    /// all occur in `available_words` -- the set of bare identifier strings
    /// present in the spine currently being reparsed.
    pub fn build_dag(&self, available_words: &HashSet<String>) -> PrecedenceDag {
        let notations = self.fixities.iter().filter_map(|(name, fixity)| {
            if !name.is_mixfix() {
                return None;
            }
            let notation = NewNotation::new(name.as_str(), *fixity);
            if notation.name_pieces.iter().all(|piece| available_words.contains(piece)) {
                Some(notation)
            } else {
                None
            }
        });
        PrecedenceDag::build(notations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silt_common::span::Span;

    #[test]
    fn build_dag_excludes_notations_missing_a_piece() {
        let mut table = FixityTable::new();
        table.insert(Name::new("if_then_else_", Span::empty_at(0)), Fixity::default());
        table.insert(Name::new("_+_", Span::empty_at(0)), Fixity::default());

        let available: HashSet<String> = ["if", "then", "else"].iter().map(|s| s.to_string()).collect();
        let dag = table.build_dag(&available);
        assert!(!dag.is_empty());
        assert!(dag.candidates(PrecedenceLevel::Unrelated, true).all(|n| n.name == "if_then_else_"));
    }
}
