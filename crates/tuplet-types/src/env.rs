//! Type environment.
//!
//! A persistent chain of frames, innermost first. Extending never touches the
//! receiver: the new environment holds one fresh frame and shares the rest of
//! the chain through an `Rc`.

use std::rc::Rc;

use tuplet_ast::{SmolStr, Span, TExp};

use crate::{TypeError, TypeResult};

#[derive(Debug)]
struct Frame {
    /// In declaration order; lookups scan from the back.
    bindings: Vec<(SmolStr, TExp)>,
    parent: Option<Rc<Frame>>,
}

/// Type environment (scope chain)
#[derive(Debug, Clone, Default)]
pub struct TypeEnv {
    head: Option<Rc<Frame>>,
}

impl TypeEnv {
    /// The empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// A new environment with one frame holding `bindings` on top of `self`.
    ///
    /// Within the frame a later binding shadows an earlier one of the same
    /// name; both stay in the frame.
    pub fn extend<I, N>(&self, bindings: I) -> TypeEnv
    where
        I: IntoIterator<Item = (N, TExp)>,
        N: Into<SmolStr>,
    {
        let bindings = bindings
            .into_iter()
            .map(|(name, texp)| (name.into(), texp))
            .collect();
        TypeEnv {
            head: Some(Rc::new(Frame {
                bindings,
                parent: self.head.clone(),
            })),
        }
    }

    /// Innermost binding of `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<&TExp> {
        let mut frame = self.head.as_deref();
        while let Some(f) = frame {
            if let Some((_, texp)) = f.bindings.iter().rev().find(|(n, _)| n == name) {
                return Some(texp);
            }
            frame = f.parent.as_deref();
        }
        None
    }

    /// Like [`lookup`](Self::lookup), but a miss is an `UnboundVariable` error at `span`.
    pub fn apply(&self, name: &str, span: Span) -> TypeResult<TExp> {
        self.lookup(name)
            .cloned()
            .ok_or_else(|| TypeError::UnboundVariable {
                name: name.to_string(),
                span,
                similar_names: self.similar_names(name),
            })
    }

    /// Number of frames in the chain.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut frame = self.head.as_deref();
        while let Some(f) = frame {
            depth += 1;
            frame = f.parent.as_deref();
        }
        depth
    }

    /// Every bound name, innermost first. Shadowed names appear more than once.
    pub fn names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut frame = self.head.as_deref();
        while let Some(f) = frame {
            names.extend(f.bindings.iter().rev().map(|(n, _)| n.as_str()));
            frame = f.parent.as_deref();
        }
        names
    }

    /// Bound names within a small edit distance of `name`, closest first.
    fn similar_names(&self, name: &str) -> Vec<String> {
        let limit = (name.chars().count() / 3).max(1);
        let mut candidates: Vec<(usize, &str)> = self
            .names()
            .into_iter()
            .filter(|candidate| *candidate != name)
            .map(|candidate| (strsim::levenshtein(name, candidate), candidate))
            .filter(|(distance, _)| *distance <= limit)
            .collect();
        candidates.sort();
        candidates.dedup_by(|a, b| a.1 == b.1);
        candidates
            .into_iter()
            .take(3)
            .map(|(_, candidate)| candidate.to_string())
            .collect()
    }
}
