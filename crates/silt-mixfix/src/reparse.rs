//! Danielsson-Norell mixfix recognizer.
//!
//! Interprets the precedence DAG as a grammar (spec §4.6) and runs a
//! hand-rolled recursive descent over a linearized token list. No
//! memoization, no backtracking once a notation's sections have fully
//! matched -- only candidate notations that fail outright are retried with
//! the next candidate.
//!
//! The recognizer is generic over the payload of a "closed" atom (`A`): the
//! scope checker hands it already-checked sub-expressions, so this crate
//! never needs to know what an `Expr` is.

use std::collections::HashSet;

use silt_common::span::Span;

use crate::dag::{Assoc, NewNotation, NotationSection, PrecedenceDag, PrecedenceLevel};

#[derive(Debug, Clone)]
pub enum MixToken<A> {
    Word(String, Span),
    Atom(A, Span),
}

impl<A> MixToken<A> {
    pub fn span(&self) -> Span {
        match self {
            MixToken::Word(_, s) => *s,
            MixToken::Atom(_, s) => *s,
        }
    }
}

#[derive(Debug, Clone)]
pub enum MixTree<A> {
    Atom(A),
    /// An application of a notation to its hole fillers, in source order.
    Op { notation: String, args: Vec<MixTree<A>> },
}

/// The outcome of a reparse attempt: either the whole token list was
/// consumed, or only a prefix was -- in which case `considered` lists every
/// notation name tried at the point of failure, for the LHS/RHS-failed
/// diagnostic notes.
pub struct ReparseOutcome<A> {
    pub tree: MixTree<A>,
    pub consumed: usize,
    pub total: usize,
    pub considered: Vec<String>,
}

impl<A> ReparseOutcome<A> {
    pub fn is_complete(&self) -> bool {
        self.consumed == self.total
    }
}

pub fn reparse<A: Clone>(tokens: &[MixToken<A>], dag: &PrecedenceDag) -> ReparseOutcome<A> {
    let mut r = Reparser { tokens, dag, considered: Vec::new() };
    match r.parse_expr(0, PrecedenceLevel::Unrelated, true) {
        Some((tree, consumed)) => {
            ReparseOutcome { tree, consumed, total: tokens.len(), considered: r.considered }
        }
        None => {
            // Nothing parses at all: fall back to treating the first token
            // as a degenerate one-element "tree" so callers always get a
            // best-effort partial result per the recoverable-error policy.
            match tokens.first() {
                Some(MixToken::Atom(a, _)) => {
                    ReparseOutcome { tree: MixTree::Atom(a.clone()), consumed: 1, total: tokens.len(), considered: r.considered }
                }
                _ => ReparseOutcome {
                    tree: MixTree::Op { notation: String::new(), args: Vec::new() },
                    consumed: 0,
                    total: tokens.len(),
                    considered: r.considered,
                },
            }
        }
    }
}

struct Reparser<'a, A> {
    tokens: &'a [MixToken<A>],
    dag: &'a PrecedenceDag,
    considered: Vec<String>,
}

impl<'a, A: Clone> Reparser<'a, A> {
    fn word_at(&self, pos: usize) -> Option<&str> {
        match self.tokens.get(pos)? {
            MixToken::Word(s, _) => Some(s.as_str()),
            MixToken::Atom(_, _) => None,
        }
    }

    fn parse_closed(&self, pos: usize) -> Option<(MixTree<A>, usize)> {
        match self.tokens.get(pos)? {
            MixToken::Atom(a, _) => Some((MixTree::Atom(a.clone()), pos + 1)),
            MixToken::Word(_, _) => None,
        }
    }

    /// Parse a Wild hole that is neither the leading nor a special trailing
    /// hole of an infix/postfix-class notation: interior holes (flanked by
    /// identifier parts on both sides) and trailing holes of a prefix-class
    /// notation both recurse fully unconstrained, since the surrounding
    /// keywords (or the end of the notation) already disambiguate them.
    fn parse_hole_unrelated(&mut self, pos: usize) -> Option<(MixTree<A>, usize)> {
        self.parse_expr(pos, PrecedenceLevel::Unrelated, true)
    }

    /// Try matching `notation`'s sections starting at `pos`, where a leading
    /// Wild section (if present) is assumed already satisfied by `lhs` and
    /// is skipped rather than reparsed.
    fn try_notation(
        &mut self,
        pos: usize,
        notation: &NewNotation,
        lhs: Option<MixTree<A>>,
    ) -> Option<(Vec<MixTree<A>>, usize)> {
        let mut cur = pos;
        let mut args = Vec::new();
        let sections = &notation.sections;
        let last_index = sections.len().saturating_sub(1);

        for (i, section) in sections.iter().enumerate() {
            match section {
                NotationSection::Id(name) => {
                    if self.word_at(cur) == Some(name.as_str()) {
                        cur += 1;
                    } else {
                        return None;
                    }
                }
                NotationSection::Wild => {
                    if i == 0 {
                        // Leading hole: already filled by the caller's lhs.
                        args.push(lhs.clone()?);
                        continue;
                    }
                    let is_trailing_of_infix = i == last_index && notation.starts_with_hole();
                    let (tree, next) = if is_trailing_of_infix {
                        match notation.fixity.assoc {
                            Assoc::Right => self.parse_expr(cur, notation.fixity.level, true)?,
                            Assoc::Left | Assoc::Non => self.parse_expr(cur, notation.fixity.level, false)?,
                        }
                    } else {
                        self.parse_hole_unrelated(cur)?
                    };
                    args.push(tree);
                    cur = next;
                }
            }
        }
        Some((args, cur))
    }

    /// Parse a full expression at or above `min_level` (strictly above when
    /// `inclusive` is false): try prefix-class notations (those not
    /// starting with a hole) first, falling back to a closed atom, then
    /// extend the result with any infix/postfix-class continuations.
    fn parse_expr(&mut self, pos: usize, min_level: PrecedenceLevel, inclusive: bool) -> Option<(MixTree<A>, usize)> {
        let prefix_candidates: Vec<NewNotation> = self
            .dag
            .candidates(min_level, inclusive)
            .filter(|n| !n.starts_with_hole())
            .cloned()
            .collect();

        let mut head = None;
        for notation in &prefix_candidates {
            self.considered.push(notation.name.clone());
            if let Some((args, next)) = self.try_notation(pos, notation, None) {
                head = Some((MixTree::Op { notation: notation.name.clone(), args }, next));
                break;
            }
        }

        let (lhs, pos) = match head {
            Some(h) => h,
            None => self.parse_closed(pos)?,
        };

        self.parse_continuations(lhs, pos, min_level, inclusive)
    }

    fn parse_continuations(
        &mut self,
        mut lhs: MixTree<A>,
        mut pos: usize,
        min_level: PrecedenceLevel,
        inclusive: bool,
    ) -> Option<(MixTree<A>, usize)> {
        loop {
            let infix_candidates: Vec<NewNotation> =
                self.dag.candidates(min_level, inclusive).filter(|n| n.starts_with_hole()).cloned().collect();

            let mut matched = None;
            for notation in &infix_candidates {
                self.considered.push(notation.name.clone());
                if let Some((args, next)) = self.try_notation(pos, notation, Some(lhs.clone())) {
                    matched = Some((notation.clone(), args, next));
                    break;
                }
            }

            match matched {
                Some((notation, args, next)) => {
                    let keep_going = notation.fixity.assoc == Assoc::Left;
                    lhs = MixTree::Op { notation: notation.name, args };
                    pos = next;
                    if !keep_going {
                        break;
                    }
                }
                None => break,
            }
        }
        Some((lhs, pos))
    }
}

/// Collects the set of "closed" identifiers (those not acting as a notation
/// piece anywhere in `dag`) that appear in `words` -- used by the scope
/// checker to decide whether a spine needs reparsing at all.
pub fn closed_words<'a>(words: impl IntoIterator<Item = &'a str>, dag: &PrecedenceDag) -> HashSet<String> {
    let pieces: HashSet<&str> = dag
        .candidates(PrecedenceLevel::Unrelated, true)
        .flat_map(|n| n.name_pieces.iter().map(|s| s.as_str()))
        .collect();
    words.into_iter().filter(|w| !pieces.contains(w)).map(|w| w.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dag::{Fixity, PrecedenceDag};

    fn span() -> Span {
        Span::empty_at(0)
    }

    fn word(s: &str) -> MixToken<&'static str> {
        MixToken::Word(s.to_string(), span())
    }

    fn atom(a: &'static str) -> MixToken<&'static str> {
        MixToken::Atom(a, span())
    }

    fn tree_to_sexpr(t: &MixTree<&'static str>) -> String {
        match t {
            MixTree::Atom(a) => a.to_string(),
            MixTree::Op { notation, args } => {
                let mut s = format!("({}", notation);
                for a in args {
                    s.push(' ');
                    s.push_str(&tree_to_sexpr(a));
                }
                s.push(')');
                s
            }
        }
    }

    #[test]
    fn single_atom_parses_alone() {
        let dag = PrecedenceDag::build([]);
        let tokens = vec![atom("n")];
        let out = reparse(&tokens, &dag);
        assert!(out.is_complete());
        assert_eq!(tree_to_sexpr(&out.tree), "n");
    }

    #[test]
    fn simple_left_assoc_chain_folds_left() {
        let dag = PrecedenceDag::build([NewNotation::new(
            "_+_",
            Fixity { level: PrecedenceLevel::Related(3), assoc: Assoc::Left },
        )]);
        // n + n + n
        let tokens = vec![atom("n"), word("+"), atom("n"), word("+"), atom("n")];
        let out = reparse(&tokens, &dag);
        assert!(out.is_complete());
        assert_eq!(tree_to_sexpr(&out.tree), "(_+_ (_+_ n n) n)");
    }

    #[test]
    fn two_left_assoc_ops_at_same_level_chain_together() {
        let dag = PrecedenceDag::build([
            NewNotation::new("_+_", Fixity { level: PrecedenceLevel::Related(3), assoc: Assoc::Left }),
            NewNotation::new("_-_", Fixity { level: PrecedenceLevel::Related(3), assoc: Assoc::Left }),
        ]);
        // n + n - n
        let tokens = vec![atom("n"), word("+"), atom("n"), word("-"), atom("n")];
        let out = reparse(&tokens, &dag);
        assert!(out.is_complete());
        assert_eq!(tree_to_sexpr(&out.tree), "(_-_ (_+_ n n) n)");
    }

    #[test]
    fn tighter_op_binds_before_looser_op() {
        let dag = PrecedenceDag::build([
            NewNotation::new("_+_", Fixity { level: PrecedenceLevel::Related(3), assoc: Assoc::Left }),
            NewNotation::new("_==_", Fixity { level: PrecedenceLevel::Related(2), assoc: Assoc::Non }),
        ]);
        // n + n == n
        let tokens = vec![atom("n"), word("+"), atom("n"), word("=="), atom("n")];
        let out = reparse(&tokens, &dag);
        assert!(out.is_complete());
        assert_eq!(tree_to_sexpr(&out.tree), "(_==_ (_+_ n n) n)");
    }

    #[test]
    fn right_assoc_folds_right() {
        let dag = PrecedenceDag::build([NewNotation::new(
            "_&&_",
            Fixity { level: PrecedenceLevel::Related(1), assoc: Assoc::Right },
        )]);
        let tokens = vec![atom("a"), word("&&"), atom("b"), word("&&"), atom("c")];
        let out = reparse(&tokens, &dag);
        assert!(out.is_complete());
        assert_eq!(tree_to_sexpr(&out.tree), "(_&&_ a (_&&_ b c))");
    }

    #[test]
    fn postfix_notation_applies_after_its_operand() {
        let dag = PrecedenceDag::build([NewNotation::new("_!", Fixity::default())]);
        let tokens = vec![atom("n"), word("!")];
        let out = reparse(&tokens, &dag);
        assert!(out.is_complete());
        assert_eq!(tree_to_sexpr(&out.tree), "(_! n)");
    }

    #[test]
    fn prefix_class_notation_holes_capture_full_sub_expressions() {
        let dag = PrecedenceDag::build([
            NewNotation::new("if_then_else_", Fixity::default()),
            NewNotation::new("_+_", Fixity { level: PrecedenceLevel::Related(3), assoc: Assoc::Left }),
        ]);
        // if n then n + n else n
        let tokens = vec![
            word("if"),
            atom("n"),
            word("then"),
            atom("n"),
            word("+"),
            atom("n"),
            word("else"),
            atom("n"),
        ];
        let out = reparse(&tokens, &dag);
        assert!(out.is_complete());
        assert_eq!(tree_to_sexpr(&out.tree), "(if_then_else_ n (_+_ n n) n)");
    }

    #[test]
    fn scenario_s2_full_expression() {
        let dag = PrecedenceDag::build([
            NewNotation::new("_&&_", Fixity { level: PrecedenceLevel::Related(1), assoc: Assoc::Right }),
            NewNotation::new("_==_", Fixity { level: PrecedenceLevel::Related(2), assoc: Assoc::Non }),
            NewNotation::new("_+_", Fixity { level: PrecedenceLevel::Related(3), assoc: Assoc::Left }),
            NewNotation::new("_-_", Fixity { level: PrecedenceLevel::Related(3), assoc: Assoc::Left }),
            NewNotation::new("if_then_else_", Fixity::default()),
            NewNotation::new("_!", Fixity::default()),
        ]);
        // if b && n + n == n ! then n else n + n - n
        let tokens = vec![
            word("if"),
            atom("b"),
            word("&&"),
            atom("n"),
            word("+"),
            atom("n"),
            word("=="),
            atom("n"),
            word("!"),
            word("then"),
            atom("n"),
            word("else"),
            atom("n"),
            word("+"),
            atom("n"),
            word("-"),
            atom("n"),
        ];
        let out = reparse(&tokens, &dag);
        assert!(out.is_complete(), "consumed {} of {}", out.consumed, out.total);
        assert_eq!(
            tree_to_sexpr(&out.tree),
            "(if_then_else_ (_&&_ b (_==_ (_+_ n n) (_! n))) n (_-_ (_+_ n n) n))"
        );
    }

    #[test]
    fn non_assoc_operator_does_not_chain() {
        let dag = PrecedenceDag::build([NewNotation::new(
            "_==_",
            Fixity { level: PrecedenceLevel::Related(2), assoc: Assoc::Non },
        )]);
        // a == b == c: only "a == b" should parse, leaving "== c" unconsumed.
        let tokens = vec![atom("a"), word("=="), atom("b"), word("=="), atom("c")];
        let out = reparse(&tokens, &dag);
        assert!(!out.is_complete());
        assert_eq!(out.consumed, 3);
    }
}
