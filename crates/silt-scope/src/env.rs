//! Scope stack: push/pop discipline generalized from
//! `snow-typeck/src/env.rs`'s `TypeEnv{scopes: Vec<FxHashMap<...>>}` pattern.
//!
//! Rather than a stack of bare name-to-scheme maps, each frame here is a full
//! [`Scope`] carrying bound variables, the enclosing namespace, imports,
//! openings, and fixities -- a child scope is created by copying its
//! parent's maps wholesale, matching the data model's "inherits by copy at
//! creation" rule.

use rustc_hash::FxHashMap;
use silt_common::span::Span;

use crate::fixity::FixityTable;
use crate::names::{LocalNames, Name, NameInfo, NameSpace, QualifiedName};

#[derive(Debug, Clone)]
pub struct Scope {
    pub vars: FxHashMap<Name, Span>,
    pub name_space: NameSpace,
    pub opened_names: FxHashMap<Name, Vec<(QualifiedName, NameInfo)>>,
    pub imported_modules: FxHashMap<QualifiedName, LocalNames>,
    pub fixities: FixityTable,
    pub scope_id: u64,
}

impl Scope {
    fn root(module: QualifiedName, scope_id: u64) -> Self {
        Self {
            vars: FxHashMap::default(),
            name_space: NameSpace::new(module, None),
            opened_names: FxHashMap::default(),
            imported_modules: FxHashMap::default(),
            fixities: FixityTable::new(),
            scope_id,
        }
    }

    /// A child scope entering the (fresh) namespace `module`; everything
    /// else is inherited by copy.
    fn child_module(&self, module: QualifiedName, scope_id: u64) -> Self {
        Self {
            vars: self.vars.clone(),
            name_space: NameSpace::new(module, Some(self.name_space.clone())),
            opened_names: self.opened_names.clone(),
            imported_modules: self.imported_modules.clone(),
            fixities: self.fixities.clone(),
            scope_id,
        }
    }

    /// A child scope for a binder block (lambda, forall, let, function
    /// clause body): same namespace, everything else inherited by copy. New
    /// variable bindings only ever affect this frame's `vars`.
    fn child_block(&self, scope_id: u64) -> Self {
        Self {
            vars: self.vars.clone(),
            name_space: self.name_space.clone(),
            opened_names: self.opened_names.clone(),
            imported_modules: self.imported_modules.clone(),
            fixities: self.fixities.clone(),
            scope_id,
        }
    }
}

pub struct ScopeStack {
    stack: Vec<Scope>,
    next_scope_id: u64,
}

impl ScopeStack {
    pub fn new(root_module: QualifiedName) -> Self {
        let mut stack = Self { stack: Vec::new(), next_scope_id: 0 };
        let id = stack.next_id();
        stack.stack.push(Scope::root(root_module, id));
        stack
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_scope_id;
        self.next_scope_id += 1;
        id
    }

    pub fn current(&self) -> &Scope {
        self.stack.last().expect("scope stack is never empty")
    }

    pub fn current_mut(&mut self) -> &mut Scope {
        self.stack.last_mut().expect("scope stack is never empty")
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Enters a fresh module namespace for the duration of `f`, then restores
    /// the parent scope unconditionally. `f` has no way to return early out
    /// of this function without also returning from the enclosing call, so
    /// the pop below always runs on every normal exit path.
    pub fn under_module_scope<T>(&mut self, module: QualifiedName, f: impl FnOnce(&mut Self) -> T) -> T {
        let id = self.next_id();
        let child = self.current().child_module(module, id);
        self.stack.push(child);
        let result = f(self);
        self.stack.pop();
        result
    }

    /// Enters a binder block scope (same namespace, fresh variable overlay)
    /// for the duration of `f`, then restores the parent scope.
    pub fn under_block_scope<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let id = self.next_id();
        let child = self.current().child_block(id);
        self.stack.push(child);
        let result = f(self);
        self.stack.pop();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silt_common::name::Name as RawName;

    fn name(s: &str) -> RawName {
        RawName::new(s, Span::empty_at(0))
    }

    #[test]
    fn under_block_scope_restores_parent_vars_on_exit() {
        let mut stack = ScopeStack::new(QualifiedName::local(name("M")));
        stack.current_mut().vars.insert(name("x"), Span::empty_at(0));
        let depth_before = stack.depth();

        stack.under_block_scope(|s| {
            s.current_mut().vars.insert(name("y"), Span::empty_at(1));
            assert!(s.current().vars.contains_key(&name("y")));
        });

        assert_eq!(stack.depth(), depth_before);
        assert!(!stack.current().vars.contains_key(&name("y")));
        assert!(stack.current().vars.contains_key(&name("x")));
    }

    #[test]
    fn under_module_scope_changes_namespace_module_and_restores_it() {
        let mut stack = ScopeStack::new(QualifiedName::local(name("Outer")));
        stack.under_module_scope(QualifiedName::new(name("Inner"), vec![name("Outer")]), |s| {
            assert_eq!(s.current().name_space.module.display(), "Outer.Inner");
        });
        assert_eq!(stack.current().name_space.module.display(), "Outer");
    }
}
