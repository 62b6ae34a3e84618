//! Environment for variable bindings in the Tuplet evaluator.
//!
//! Environments are persistent chains of frames: extending one shares the
//! parent instead of copying it, so closures capture their scope cheaply.
//! A frame can still be written after creation, which is how `define`
//! installs globals and how `letrec` fills in its procedures once their
//! closures exist.

use std::cell::RefCell;
use std::rc::Rc;

use smol_str::SmolStr;

use crate::Value;

/// A slot is `None` between the creation of a letrec frame and the
/// evaluation of its binding.
type Slot = Option<Value>;

#[derive(Debug)]
struct Frame {
    bindings: RefCell<Vec<(SmolStr, Slot)>>,
    parent: Option<Rc<Frame>>,
}

/// A chain of frames, innermost first.
#[derive(Debug, Clone)]
pub struct Environment {
    head: Rc<Frame>,
}

impl Environment {
    /// Create an environment with a single empty frame.
    pub fn new() -> Self {
        Environment {
            head: Rc::new(Frame {
                bindings: RefCell::new(Vec::new()),
                parent: None,
            }),
        }
    }

    /// A new environment whose innermost frame holds `bindings`. Later
    /// bindings of the same name shadow earlier ones.
    pub fn extend<I, N>(&self, bindings: I) -> Self
    where
        I: IntoIterator<Item = (N, Value)>,
        N: Into<SmolStr>,
    {
        self.push_frame(
            bindings
                .into_iter()
                .map(|(name, value)| (name.into(), Some(value)))
                .collect(),
        )
    }

    /// A new frame binding `names` to nothing yet; see [`Environment::assign`].
    pub fn extend_pending<I, N>(&self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<SmolStr>,
    {
        self.push_frame(names.into_iter().map(|name| (name.into(), None)).collect())
    }

    fn push_frame(&self, bindings: Vec<(SmolStr, Slot)>) -> Self {
        Environment {
            head: Rc::new(Frame {
                bindings: RefCell::new(bindings),
                parent: Some(self.head.clone()),
            }),
        }
    }

    /// Bind `name` in the innermost frame, replacing an existing binding
    /// of the same name there.
    pub fn define(&self, name: impl Into<SmolStr>, value: Value) {
        let name = name.into();
        let mut bindings = self.head.bindings.borrow_mut();
        match bindings.iter_mut().rev().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = Some(value),
            None => bindings.push((name, Some(value))),
        }
    }

    /// Fill the innermost-frame binding of `name`. Returns false if the
    /// innermost frame has no such name.
    pub fn assign(&self, name: &str, value: Value) -> bool {
        let mut bindings = self.head.bindings.borrow_mut();
        match bindings.iter_mut().rev().find(|(n, _)| n == name) {
            Some((_, slot)) => {
                *slot = Some(value);
                true
            }
            None => false,
        }
    }

    /// Look `name` up through the chain. `None` when unbound; `Some(None)`
    /// when bound by a letrec whose value is not computed yet.
    pub fn lookup(&self, name: &str) -> Option<Slot> {
        let mut frame = Some(&self.head);
        while let Some(current) = frame {
            let bindings = current.bindings.borrow();
            if let Some((_, slot)) = bindings.iter().rev().find(|(n, _)| n == name) {
                return Some(slot.clone());
            }
            frame = current.parent.as_ref();
        }
        None
    }

    /// Get the value of a variable, if bound and assigned.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.lookup(name).flatten()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Number of frames in the chain.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut frame = Some(&self.head);
        while let Some(current) = frame {
            depth += 1;
            frame = current.parent.as_ref();
        }
        depth
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
