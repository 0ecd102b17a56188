//! Scope checker diagnostics: the error-code scheme of §7, built on
//! `silt_common::diagnostics::Diagnostic`.
//!
//! Grounded on `snow-typeck/src/diagnostics.rs`'s ariadne rendering, but
//! reusing `silt_common::diagnostics::render` directly rather than keeping a
//! parallel rendering path -- this crate only supplies the builder functions
//! that assemble a `Diagnostic` with the right code, message, and notes.

use silt_common::diagnostics::{Diagnostic, Severity};
use silt_common::span::Span;

use crate::names::QualifiedName;

pub fn undeclared_identifier(name: &str, at: Span) -> Diagnostic {
    Diagnostic::new("undeclaredIdentifier", Severity::Error, format!("undeclared identifier `{name}`")).at(at)
}

pub fn name_shadows(name: &str, at: Span, original: Span) -> Diagnostic {
    Diagnostic::new("nameShadows", Severity::Error, format!("`{name}` shadows an existing binding"))
        .at(at)
        .with_note(format!("`{name}` originally bound here"), Some(original))
}

pub fn name_reserved(name: &str, at: Span) -> Diagnostic {
    Diagnostic::new("nameReserved", Severity::Error, format!("`{name}` is a reserved name")).at(at)
}

pub fn ambiguous_name(name: &str, at: Span, candidates: &[QualifiedName]) -> Diagnostic {
    let mut diag =
        Diagnostic::new("ambiguousName", Severity::Error, format!("reference to `{name}` is ambiguous")).at(at);
    for candidate in candidates {
        diag = diag.with_note(format!("ambiguousCandidate: `{}`", candidate.display()), Some(candidate.name.origin));
    }
    diag
}

pub fn duplicate_import(module: &str, at: Span) -> Diagnostic {
    Diagnostic::new("duplicateImport", Severity::Warning, format!("module `{module}` is imported more than once"))
        .at(at)
}

pub fn body_before_signature(name: &str, at: Span) -> Diagnostic {
    Diagnostic::new(
        "bodyBeforeSignature",
        Severity::Error,
        format!("clause for `{name}` appears before its type signature"),
    )
    .at(at)
}

pub fn record_missing_constructor(name: &str, at: Span) -> Diagnostic {
    Diagnostic::new(
        "recordMissingConstructor",
        Severity::Error,
        format!("record `{name}` must declare exactly one constructor"),
    )
    .at(at)
}

pub fn incorrect_module_structure(declared: &str, expected_file: &str, at: Span) -> Diagnostic {
    Diagnostic::new(
        "incorrectModuleStructure",
        Severity::Error,
        format!("module `{declared}` must be declared in a file at `{expected_file}`"),
    )
    .at(at)
}

pub fn precedence_not_integral(at: Span) -> Diagnostic {
    Diagnostic::new("precedenceNotIntegral", Severity::Warning, "fixity precedence is not an integer")
        .at(at)
        .with_note("assuming default precedence 20", None)
}

pub fn could_not_read_input(path: &str) -> Diagnostic {
    Diagnostic::new("couldNotReadInput", Severity::Error, format!("could not read input `{path}`"))
}

pub fn reparse_lhs_failed(at: Span, considered: &[String]) -> Diagnostic {
    let mut diag =
        Diagnostic::new("reparseLHSFailed", Severity::Error, "could not reparse expression: no notation matched")
            .at(at);
    for name in considered {
        diag = diag.with_note(format!("considered notation `{name}`"), None);
    }
    diag
}

pub fn reparse_rhs_failed(at: Span, considered: &[String]) -> Diagnostic {
    let mut diag = Diagnostic::new(
        "reparseRHSFailed",
        Severity::Error,
        "could not reparse expression: trailing tokens left unconsumed",
    )
    .at(at);
    for name in considered {
        diag = diag.with_note(format!("considered notation `{name}`"), None);
    }
    diag
}
