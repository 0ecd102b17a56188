//! The diagnostic engine: an ordered diagnostic list, registered consumers,
//! and nested transactional buffering.
//!
//! Every recoverable condition in the front end — lexing, scope checking,
//! reparsing — goes through here rather than returning an error value, so a
//! single pass can report many problems and still hand back a best-effort
//! result to the next stage.

use std::collections::HashMap;
use std::ops::Range;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use serde::Serialize;

use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Error,
    Warning,
    /// Notes may only ever be attached under a parent diagnostic.
    Note,
}

#[derive(Debug, Clone, Serialize)]
pub struct Note {
    pub message: String,
    pub location: Option<Span>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub code: &'static str,
    pub severity: Severity,
    pub message: String,
    pub location: Option<Span>,
    pub highlights: Vec<(Span, String)>,
    pub notes: Vec<Note>,
}

impl Diagnostic {
    pub fn new(code: &'static str, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            location: None,
            highlights: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn at(mut self, location: Span) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_highlight(mut self, span: Span, message: impl Into<String>) -> Self {
        self.highlights.push((span, message.into()));
        self
    }

    pub fn with_note(mut self, message: impl Into<String>, location: Option<Span>) -> Self {
        self.notes.push(Note { message: message.into(), location });
        self
    }
}

/// An opaque handle returned on consumer registration, used to unregister it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConsumerId(u64);

type Consumer = Box<dyn FnMut(&Diagnostic) + Send>;

/// Holds emitted diagnostics in order, fans them out to consumers, and
/// supports nested transactions whose contents are held in a side buffer
/// until explicitly committed or discarded.
pub struct DiagnosticEngine {
    diagnostics: Vec<Diagnostic>,
    consumers: HashMap<ConsumerId, Consumer>,
    next_consumer_id: u64,
    /// Stack of active transaction IDs, innermost last. Diagnostics emitted
    /// while any transaction is active go to that transaction's buffer
    /// instead of `diagnostics`.
    active_transactions: Vec<u64>,
    transaction_buffers: HashMap<u64, Vec<Diagnostic>>,
    next_transaction_id: u64,
}

impl Default for DiagnosticEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticEngine {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
            consumers: HashMap::new(),
            next_consumer_id: 0,
            active_transactions: Vec::new(),
            transaction_buffers: HashMap::new(),
            next_transaction_id: 0,
        }
    }

    /// Appends a diagnostic. If a transaction is active, it is held in that
    /// transaction's side buffer and consumers are *not* notified yet —
    /// notification happens only when (and if) the transaction commits, so a
    /// rolled-back transaction's diagnostics are invisible to consumers.
    pub fn diagnose(&mut self, diagnostic: Diagnostic) {
        match self.active_transactions.last() {
            Some(&txn) => self.transaction_buffers.entry(txn).or_default().push(diagnostic),
            None => {
                for consumer in self.consumers.values_mut() {
                    consumer(&diagnostic);
                }
                self.diagnostics.push(diagnostic);
            }
        }
    }

    pub fn register(&mut self, consumer: Consumer) -> ConsumerId {
        let id = ConsumerId(self.next_consumer_id);
        self.next_consumer_id += 1;
        self.consumers.insert(id, consumer);
        id
    }

    pub fn unregister(&mut self, id: ConsumerId) {
        self.consumers.remove(&id);
    }

    pub fn unregister_all(&mut self) {
        self.consumers.clear();
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Start a nested transaction. Diagnostics emitted by `f` are held in a
    /// side buffer; `f` returns `(commit, result)` — when `commit` is true
    /// the buffer is flushed into the enclosing scope (main list or an outer
    /// transaction) in emission order and fanned out to consumers again is
    /// not needed (consumers already saw them at emission time); otherwise
    /// the buffer is discarded. Transactions nest arbitrarily.
    pub fn transact<T>(&mut self, f: impl FnOnce(&mut Self) -> (bool, T)) -> T {
        let id = self.next_transaction_id;
        self.next_transaction_id += 1;
        self.active_transactions.push(id);
        self.transaction_buffers.insert(id, Vec::new());

        let (commit, result) = f(self);

        self.active_transactions.pop();
        let buffered = self.transaction_buffers.remove(&id).unwrap_or_default();
        if commit {
            match self.active_transactions.last() {
                // Still nested inside an outer transaction: hand the buffer
                // up rather than notifying consumers yet.
                Some(&outer) => {
                    self.transaction_buffers.entry(outer).or_default().extend(buffered);
                }
                None => {
                    for d in &buffered {
                        for consumer in self.consumers.values_mut() {
                            consumer(d);
                        }
                    }
                    self.diagnostics.extend(buffered);
                }
            }
        }
        result
    }
}

fn clamp(range: Range<usize>, source_len: usize) -> Range<usize> {
    let s = range.start.min(source_len);
    let e = range.end.min(source_len).max(s);
    if s == e {
        s..e.saturating_add(1).min(source_len).max(s)
    } else {
        s..e
    }
}

/// Render a diagnostic with `ariadne`, labeling its highlights and attaching
/// its notes. `colors` toggles ANSI output (set once per process per §5).
pub fn render(diagnostic: &Diagnostic, filename: &str, source: &str, colors: bool) -> String {
    let config = Config::default().with_color(colors);
    let source_len = source.len();
    let primary = diagnostic
        .location
        .map(|s| clamp(s.start as usize..s.end as usize, source_len))
        .unwrap_or(0..source_len.min(1));

    let kind = match diagnostic.severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
        Severity::Note => ReportKind::Advice,
    };

    let mut builder = Report::build(kind, (filename, primary.clone()))
        .with_code(diagnostic.code)
        .with_message(&diagnostic.message)
        .with_config(config);

    if diagnostic.highlights.is_empty() {
        builder.add_label(
            Label::new((filename, primary))
                .with_message(&diagnostic.message)
                .with_color(if colors { Color::Red } else { Color::Primary }),
        );
    } else {
        for (span, message) in &diagnostic.highlights {
            let range = clamp(span.start as usize..span.end as usize, source_len);
            builder.add_label(
                Label::new((filename, range))
                    .with_message(message)
                    .with_color(if colors { Color::Red } else { Color::Primary }),
            );
        }
    }

    for note in &diagnostic.notes {
        builder.set_note(&note.message);
    }

    let mut buf = Vec::new();
    builder
        .finish()
        .write((filename, Source::from(source)), &mut buf)
        .expect("ariadne render into an in-memory buffer cannot fail");
    String::from_utf8(buf).expect("ariadne output is always valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnose_appends_in_emission_order() {
        let mut engine = DiagnosticEngine::new();
        engine.diagnose(Diagnostic::new("E0001", Severity::Error, "first"));
        engine.diagnose(Diagnostic::new("E0002", Severity::Warning, "second"));
        let msgs: Vec<_> = engine.diagnostics().iter().map(|d| d.message.as_str()).collect();
        assert_eq!(msgs, vec!["first", "second"]);
    }

    #[test]
    fn has_errors_reflects_severity() {
        let mut engine = DiagnosticEngine::new();
        assert!(!engine.has_errors());
        engine.diagnose(Diagnostic::new("W0001", Severity::Warning, "w"));
        assert!(!engine.has_errors());
        engine.diagnose(Diagnostic::new("E0001", Severity::Error, "e"));
        assert!(engine.has_errors());
    }

    #[test]
    fn transact_commit_flushes_into_main_list() {
        let mut engine = DiagnosticEngine::new();
        engine.transact(|e| {
            e.diagnose(Diagnostic::new("E0001", Severity::Error, "inside"));
            (true, ())
        });
        assert_eq!(engine.diagnostics().len(), 1);
    }

    #[test]
    fn transact_rollback_discards() {
        let mut engine = DiagnosticEngine::new();
        engine.transact(|e| {
            e.diagnose(Diagnostic::new("E0001", Severity::Error, "inside"));
            (false, ())
        });
        assert!(engine.diagnostics().is_empty());
    }

    #[test]
    fn nested_transactions_preserve_order_on_commit() {
        let mut engine = DiagnosticEngine::new();
        engine.transact(|e| {
            e.diagnose(Diagnostic::new("E0001", Severity::Error, "outer-1"));
            e.transact(|e2| {
                e2.diagnose(Diagnostic::new("E0002", Severity::Error, "inner"));
                (true, ())
            });
            e.diagnose(Diagnostic::new("E0003", Severity::Error, "outer-2"));
            (true, ())
        });
        let msgs: Vec<_> = engine.diagnostics().iter().map(|d| d.message.as_str()).collect();
        assert_eq!(msgs, vec!["outer-1", "inner", "outer-2"]);
    }

    #[test]
    fn consumer_is_notified_on_diagnose() {
        let mut engine = DiagnosticEngine::new();
        let seen = std::sync::Arc::new(std::sync::Mutex::new(0));
        let seen2 = seen.clone();
        engine.register(Box::new(move |_d| {
            *seen2.lock().unwrap() += 1;
        }));
        engine.diagnose(Diagnostic::new("E0001", Severity::Error, "x"));
        assert_eq!(*seen.lock().unwrap(), 1);
    }
}
