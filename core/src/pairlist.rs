/*
 * Copyright (c) 2026 Mohamad Al-Zawahreh (dba Sovereign Systems).
 *
 * Call-argument lists for the host evaluator.
 *
 * A pairlist is a singly linked chain of nodes, each holding a value, an
 * optional tag (the argument name) and the rest of the chain, terminated by
 * `Nil`. This is the association-list shape the host evaluator consumes for
 * call arguments and call expressions.
 *
 * LICENSE: DUAL-LICENSED (AGPLv3 or COMMERCIAL).
 */

use crate::runtime::{IntoValue, Value, ValueHandle};
use serde::Serialize;
use std::fmt;
use std::rc::Rc;

/// One cell of a pairlist.
#[derive(Debug, PartialEq, Serialize)]
pub struct Node {
    pub car: ValueHandle,
    pub tag: Option<String>,
    pub cdr: Pairlist,
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tag {
            Some(name) => write!(f, "{} = {}", name, self.car),
            None => write!(f, "{}", self.car),
        }
    }
}

/// Immutable linked argument list. Cloning shares structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub enum Pairlist {
    #[default]
    Nil,
    Cons(Rc<Node>),
}

impl Pairlist {
    pub fn is_nil(&self) -> bool {
        matches!(self, Pairlist::Nil)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.is_nil()
    }

    pub fn head(&self) -> Option<&Node> {
        match self {
            Pairlist::Nil => None,
            Pairlist::Cons(node) => Some(node),
        }
    }

    /// Walks the chain head to tail.
    pub fn iter(&self) -> Iter<'_> {
        Iter { next: self }
    }

    /// Tags in order, `None` for positional entries.
    pub fn tags(&self) -> Vec<Option<&str>> {
        self.iter().map(|node| node.tag.as_deref()).collect()
    }
}

impl fmt::Display for Pairlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", node)?;
        }
        Ok(())
    }
}

pub struct Iter<'a> {
    next: &'a Pairlist,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next {
            Pairlist::Nil => None,
            Pairlist::Cons(node) => {
                self.next = &node.cdr;
                Some(node)
            }
        }
    }
}

impl<'a> IntoIterator for &'a Pairlist {
    type Item = &'a Node;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// A call argument: a host value plus an optional name.
#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    pub value: ValueHandle,
    pub name: Option<String>,
}

impl Arg {
    pub fn positional(value: impl IntoValue) -> Self {
        Self {
            value: value.into_value(),
            name: None,
        }
    }

    /// Names are taken as given; callers pass identifier-like strings.
    pub fn named(name: impl Into<String>, value: impl IntoValue) -> Self {
        Self {
            value: value.into_value(),
            name: Some(name.into()),
        }
    }
}

/// Shorthand for [`Arg::named`].
pub fn named(name: impl Into<String>, value: impl IntoValue) -> Arg {
    Arg::named(name, value)
}

/// Prepends one argument to `tail`.
///
/// Positional arguments become a plain cons cell; named ones carry their
/// name as the node's tag.
pub fn grow(head: Arg, tail: Pairlist) -> Pairlist {
    let Arg { value, name } = head;
    let node = match name {
        None => Node {
            car: value,
            tag: None,
            cdr: tail,
        },
        Some(name) => Node {
            car: value,
            tag: Some(name),
            cdr: tail,
        },
    };
    Pairlist::Cons(Rc::new(node))
}

/// Builds a pairlist whose head is the first argument.
///
/// Folds from the last argument back to the first, prepending one node per
/// step, so left-to-right order is preserved.
pub fn pairlist<I>(args: I) -> Pairlist
where
    I: IntoIterator<Item = Arg>,
    I::IntoIter: DoubleEndedIterator,
{
    args.into_iter()
        .rev()
        .fold(Pairlist::Nil, |tail, arg| grow(arg, tail))
}

/// Builds the call expression `fun(args...)`.
pub fn language(fun: &str, args: Pairlist) -> ValueHandle {
    let call = grow(Arg::positional(Value::symbol(fun)), args);
    ValueHandle::new(Value::Language(call))
}
