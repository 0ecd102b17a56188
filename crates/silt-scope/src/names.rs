//! Qualified names and the namespaces they live in.
//!
//! Grounded on `snow-typeck/src/env.rs`'s `TypeEnv` key pattern, generalized
//! from a bare `String` key to the richer `QualifiedName`/`NameInfo` shapes
//! the scope checker needs (module paths, constructor vs. definition vs.
//! projection, nested-module snapshots).

use rustc_hash::FxHashMap;

pub use silt_common::name::Name;

/// A name together with its enclosing module path, outer-to-inner.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub name: Name,
    pub module: Vec<Name>,
}

impl QualifiedName {
    pub fn new(name: Name, module: Vec<Name>) -> Self {
        Self { name, module }
    }

    pub fn local(name: Name) -> Self {
        Self { name, module: Vec::new() }
    }

    /// Every segment, outer-to-inner, including the leaf name.
    pub fn full_segments(&self) -> Vec<Name> {
        let mut segments = self.module.clone();
        segments.push(self.name.clone());
        segments
    }

    /// Dot-joined display form, e.g. `"A.B.foo"`.
    pub fn display(&self) -> String {
        self.full_segments().iter().map(Name::as_str).collect::<Vec<_>>().join(".")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plicity {
    Explicit,
    Implicit,
}

/// What a bound name in a namespace refers to.
#[derive(Debug, Clone)]
pub enum NameInfo {
    Definition(Vec<Plicity>),
    Constructor(Vec<Plicity>),
    Projection,
    /// A nested module's namespace snapshot at the moment it was closed.
    Module(LocalNames),
}

pub type LocalNames = FxHashMap<Name, NameInfo>;

/// The set of names declared directly in one module, plus a link to the
/// enclosing module's namespace (`None` at the root).
#[derive(Debug, Clone)]
pub struct NameSpace {
    pub module: QualifiedName,
    pub local_names: LocalNames,
    pub parent: Option<Box<NameSpace>>,
}

impl NameSpace {
    pub fn new(module: QualifiedName, parent: Option<NameSpace>) -> Self {
        Self { module, local_names: LocalNames::default(), parent: parent.map(Box::new) }
    }

    /// Binds `name` to `info` if it is not already present. Returns `false`
    /// on a duplicate, per the data-model invariant that no two declarations
    /// in one namespace share a name; the caller is responsible for emitting
    /// the corresponding diagnostic before calling this (or for deciding to
    /// bind anyway under recovery rules).
    pub fn bind(&mut self, name: Name, info: NameInfo) -> bool {
        if self.local_names.contains_key(&name) {
            false
        } else {
            self.local_names.insert(name, info);
            true
        }
    }

    pub fn rebind(&mut self, name: Name, info: NameInfo) {
        self.local_names.insert(name, info);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silt_common::span::Span;

    fn name(s: &str) -> Name {
        Name::new(s, Span::empty_at(0))
    }

    #[test]
    fn qualified_name_display_joins_segments() {
        let qn = QualifiedName::new(name("foo"), vec![name("A"), name("B")]);
        assert_eq!(qn.display(), "A.B.foo");
    }

    #[test]
    fn namespace_bind_rejects_duplicates() {
        let mut ns = NameSpace::new(QualifiedName::local(name("M")), None);
        assert!(ns.bind(name("x"), NameInfo::Definition(vec![])));
        assert!(!ns.bind(name("x"), NameInfo::Definition(vec![])));
    }
}
