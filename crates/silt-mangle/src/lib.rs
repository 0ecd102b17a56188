//! Symbol mangling and demangling for qualified Silt declarations.
//!
//! [`mangler::mangle_decl`] turns a [`mangler::QualifiedDecl`] into the
//! `_S`-prefixed wire form; [`mangler::demangle`] inverts it. The two are
//! designed to satisfy `remangle(demangle(m)) == m` for every `m` this
//! crate itself produces, which is the property the rest of the toolchain
//! (and its tests) actually depend on.

pub mod grammar;
pub mod mangler;
pub mod punycode;

pub use mangler::{mangle_decl, demangle, DeclKind, DemangleError, MangleType, QualifiedDecl};

/// Demangle `mangled`, then mangle the result straight back. Used as the
/// conformance oracle: a conforming implementation satisfies
/// `remangle(m) == m` for every `m` it itself produced.
pub fn remangle(mangled: &str) -> Result<String, DemangleError> {
    let decl = demangle(mangled)?;
    Ok(mangle_decl(&decl))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remangle_is_idempotent_across_a_batch_of_declarations() {
        let decls = vec![
            QualifiedDecl { context: vec![], name: "Nat".to_string(), kind: DeclKind::Data },
            QualifiedDecl {
                context: vec!["Std".to_string(), "List".to_string()],
                name: "Cons".to_string(),
                kind: DeclKind::Data,
            },
            QualifiedDecl {
                context: vec!["Example".to_string()],
                name: "foo".to_string(),
                kind: DeclKind::Function(MangleType::Arrow(
                    Box::new(MangleType::Named("N".to_string())),
                    Box::new(MangleType::Named("N".to_string())),
                )),
            },
        ];
        for decl in decls {
            let mangled = mangle_decl(&decl);
            let round_tripped = remangle(&mangled).expect("conforming mangled string must demangle");
            assert_eq!(mangled, round_tripped);
        }
    }

    #[test]
    fn distinct_declarations_mangle_to_distinct_names() {
        let a = mangle_decl(&QualifiedDecl { context: vec![], name: "foo".to_string(), kind: DeclKind::Data });
        let b = mangle_decl(&QualifiedDecl { context: vec![], name: "bar".to_string(), kind: DeclKind::Data });
        assert_ne!(a, b);
    }
}
