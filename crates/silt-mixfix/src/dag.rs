//! Notations, fixity, and the precedence DAG they are grouped into.
//!
//! A [`NewNotation`] is built directly from a declared name: splitting on `_`
//! yields the alternating [`NotationSection`]s (`if_then_else_` -> six
//! sections, three holes). The [`PrecedenceDag`] groups notations by
//! [`PrecedenceLevel`] and is built once per reparse invocation; there is no
//! API to mutate it afterwards (see `DESIGN.md`'s resolution of the
//! `addVertex`-during-iteration open question).

use std::collections::{BTreeMap, HashSet};
use std::ops::Bound;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecedenceLevel {
    /// Below every `Related` level; the sentinel used for fully-bracketed
    /// sub-expressions and notation holes with no competing neighbor.
    Unrelated,
    Related(i64),
}

impl PartialOrd for PrecedenceLevel {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PrecedenceLevel {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use PrecedenceLevel::*;
        match (self, other) {
            (Unrelated, Unrelated) => std::cmp::Ordering::Equal,
            (Unrelated, Related(_)) => std::cmp::Ordering::Less,
            (Related(_), Unrelated) => std::cmp::Ordering::Greater,
            (Related(a), Related(b)) => a.cmp(b),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Non,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fixity {
    pub level: PrecedenceLevel,
    pub assoc: Assoc,
}

impl Default for Fixity {
    /// The default fixity assigned to an ascribed mixfix name with no
    /// explicit `infix`/`infixl`/`infixr` declaration.
    fn default() -> Self {
        Fixity { level: PrecedenceLevel::Related(20), assoc: Assoc::Non }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotationSection {
    Wild,
    Id(String),
}

/// Split a mixfix identifier into its notation sections.
///
/// `"if_then_else_"` -> `[Id(if), Wild, Id(then), Wild, Id(else), Wild]`;
/// a plain identifier with no `_` yields a single `Id` section (no holes).
pub fn sections_from_name(name: &str) -> Vec<NotationSection> {
    let mut sections = Vec::new();
    for (i, part) in name.split('_').enumerate() {
        if i > 0 {
            sections.push(NotationSection::Wild);
        }
        if !part.is_empty() {
            sections.push(NotationSection::Id(part.to_string()));
        }
    }
    sections
}

#[derive(Debug, Clone)]
pub struct NewNotation {
    /// Canonical mixfix name, e.g. `"if_then_else_"` or `"_+_"`.
    pub name: String,
    /// The literal identifier pieces of the name (excludes holes), used by
    /// the scope checker to decide which notations are even candidates for
    /// a given token list before handing it to the reparser.
    pub name_pieces: HashSet<String>,
    pub fixity: Fixity,
    pub sections: Vec<NotationSection>,
}

impl NewNotation {
    pub fn new(name: impl Into<String>, fixity: Fixity) -> Self {
        let name = name.into();
        let sections = sections_from_name(&name);
        let name_pieces = sections
            .iter()
            .filter_map(|s| match s {
                NotationSection::Id(s) => Some(s.clone()),
                NotationSection::Wild => None,
            })
            .collect();
        Self { name, name_pieces, fixity, sections }
    }

    pub fn is_mixfix(&self) -> bool {
        self.sections.iter().any(|s| matches!(s, NotationSection::Wild))
    }

    pub fn starts_with_hole(&self) -> bool {
        matches!(self.sections.first(), Some(NotationSection::Wild))
    }
}

/// Notations keyed by precedence level, built once and never mutated again.
pub struct PrecedenceDag {
    by_level: BTreeMap<PrecedenceLevel, Vec<NewNotation>>,
}

impl PrecedenceDag {
    pub fn build(notations: impl IntoIterator<Item = NewNotation>) -> Self {
        let mut by_level: BTreeMap<PrecedenceLevel, Vec<NewNotation>> = BTreeMap::new();
        for n in notations {
            by_level.entry(n.fixity.level).or_default().push(n);
        }
        Self { by_level }
    }

    pub fn at_level(&self, level: PrecedenceLevel) -> &[NewNotation] {
        self.by_level.get(&level).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Notations at strictly higher levels than `than`, ascending.
    pub fn tighter(&self, than: PrecedenceLevel) -> impl Iterator<Item = &NewNotation> {
        self.by_level.range((Bound::Excluded(than), Bound::Unbounded)).flat_map(|(_, v)| v.iter())
    }

    /// Notations at level `>= min` (or `> min` when `inclusive` is false),
    /// ascending by level then declaration order within a level.
    pub fn candidates(&self, min: PrecedenceLevel, inclusive: bool) -> impl Iterator<Item = &NewNotation> {
        let lower = if inclusive { Bound::Included(min) } else { Bound::Excluded(min) };
        self.by_level.range((lower, Bound::Unbounded)).flat_map(|(_, v)| v.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.by_level.is_empty()
    }
}
