/*
 * Copyright (c) 2026 Mohamad Al-Zawahreh (dba Sovereign Systems).
 *
 * This file is part of the Ark Sovereign Compiler.
 *
 * LICENSE: DUAL-LICENSED (AGPLv3 or COMMERCIAL).
 *
 * 1. OPEN SOURCE: You may use this file under the terms of the GNU Affero
 * General Public License v3.0. If you link to this code, your ENTIRE
 * application must be open-sourced under AGPLv3.
 *
 * 2. COMMERCIAL: For proprietary use, you must obtain a Commercial License
 * from Sovereign Systems.
 *
 * PATENT NOTICE: Protected by US Patent App #63/935,467.
 * NO IMPLIED LICENSE to rights of Mohamad Al-Zawahreh or Sovereign Systems.
 */

use crate::pairlist::Pairlist;
use serde::Serialize;
use std::fmt;
use std::rc::Rc;

/// Payload of a host-owned value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    Null,
    Logical(Vec<bool>),
    /// 32-bit, as the host stores integers.
    Integer(Vec<i32>),
    Double(Vec<f64>),
    Str(Vec<String>),
    /// Generic vector of arbitrary values.
    List(Vec<ValueHandle>),
    Symbol(String),
    Pairlist(Pairlist),
    /// A call expression: function at the head, arguments after it.
    Language(Pairlist),
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(vec![s.into()])
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Value::Symbol(name.into())
    }

    /// Length as the host reports it.
    pub fn len(&self) -> usize {
        match self {
            Value::Null => 0,
            Value::Logical(v) => v.len(),
            Value::Integer(v) => v.len(),
            Value::Double(v) => v.len(),
            Value::Str(v) => v.len(),
            Value::List(v) => v.len(),
            Value::Symbol(_) => 1,
            Value::Pairlist(p) | Value::Language(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A value plus its attribute list (`class`, `names`, `dim`, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Object {
    pub value: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<(String, ValueHandle)>,
}

impl Object {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            attributes: Vec::new(),
        }
    }

    /// Sets an attribute, replacing any previous value under the same name.
    pub fn with_attribute(mut self, name: &str, value: impl IntoValue) -> Self {
        let value = value.into_value();
        match self.attributes.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name.to_string(), value)),
        }
        self
    }

    pub fn into_handle(self) -> ValueHandle {
        ValueHandle(Rc::new(self))
    }
}

/// Shared reference to a host-owned value.
///
/// Cloning shares the value; the boundary layer never frees it directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValueHandle(Rc<Object>);

impl ValueHandle {
    pub fn new(value: Value) -> Self {
        Object::new(value).into_handle()
    }

    pub fn null() -> Self {
        Self::new(Value::Null)
    }

    pub fn value(&self) -> &Value {
        &self.0.value
    }

    pub fn is_null(&self) -> bool {
        matches!(self.value(), Value::Null)
    }

    pub fn len(&self) -> usize {
        self.value().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn attribute(&self, name: &str) -> Option<&ValueHandle> {
        self.0
            .attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Strings stored under a character attribute such as `class` or `names`.
    pub fn string_attribute(&self, name: &str) -> Vec<&str> {
        match self.attribute(name).map(ValueHandle::value) {
            Some(Value::Str(items)) => items.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    pub fn class(&self) -> Vec<&str> {
        self.string_attribute("class")
    }

    pub fn names(&self) -> Vec<&str> {
        self.string_attribute("names")
    }

    pub fn inherits(&self, class: &str) -> bool {
        self.class().contains(&class)
    }

    /// Whether both handles refer to the same host object.
    pub fn ptr_eq(&self, other: &ValueHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Element `index` as a standalone value, following host subsetting
    /// (`x[[i]]`). A symbol is its own single element; a call yields its
    /// function and then its arguments.
    pub fn element(&self, index: usize) -> Option<ValueHandle> {
        let value = match self.value() {
            Value::Null => return None,
            Value::Logical(v) => Value::Logical(vec![*v.get(index)?]),
            Value::Integer(v) => Value::Integer(vec![*v.get(index)?]),
            Value::Double(v) => Value::Double(vec![*v.get(index)?]),
            Value::Str(v) => Value::Str(vec![v.get(index)?.clone()]),
            Value::List(v) => return v.get(index).cloned(),
            Value::Pairlist(p) => return p.iter().nth(index).map(|node| node.car.clone()),
            Value::Language(p) => return p.iter().nth(index).map(|node| node.car.clone()),
            Value::Symbol(_) => return (index == 0).then(|| self.clone()),
        };
        Some(ValueHandle::new(value))
    }
}

impl fmt::Display for ValueHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

fn write_vector<T>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    item: impl Fn(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    if items.len() == 1 {
        return item(f, &items[0]);
    }
    write!(f, "c(")?;
    for (i, v) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        item(f, v)?;
    }
    write!(f, ")")
}

/// Deparses a value into host source syntax.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Logical(v) if v.is_empty() => write!(f, "logical(0)"),
            Value::Integer(v) if v.is_empty() => write!(f, "integer(0)"),
            Value::Double(v) if v.is_empty() => write!(f, "numeric(0)"),
            Value::Str(v) if v.is_empty() => write!(f, "character(0)"),
            Value::Logical(v) => {
                write_vector(f, v, |f, b| write!(f, "{}", if *b { "TRUE" } else { "FALSE" }))
            }
            Value::Integer(v) => write_vector(f, v, |f, i| write!(f, "{}L", i)),
            Value::Double(v) => write_vector(f, v, |f, d| write!(f, "{}", d)),
            Value::Str(v) => write_vector(f, v, |f, s| write!(f, "{:?}", s)),
            Value::List(items) => {
                write!(f, "list(")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, ")")
            }
            Value::Symbol(name) => write!(f, "{}", name),
            Value::Pairlist(p) => write!(f, "pairlist({})", p),
            Value::Language(p) => {
                let mut nodes = p.iter();
                match nodes.next() {
                    Some(head) => write!(f, "{}", head.car)?,
                    None => return write!(f, "NULL"),
                }
                write!(f, "(")?;
                for (i, node) in nodes.enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", node)?;
                }
                write!(f, ")")
            }
        }
    }
}

// =============================================================================
// Conversion into host values ("wrap")
// =============================================================================

/// Conversion of a native value into a host value.
pub trait IntoValue {
    fn into_value(self) -> ValueHandle;
}

impl IntoValue for ValueHandle {
    fn into_value(self) -> ValueHandle {
        self
    }
}

impl IntoValue for &ValueHandle {
    fn into_value(self) -> ValueHandle {
        self.clone()
    }
}

impl IntoValue for Value {
    fn into_value(self) -> ValueHandle {
        ValueHandle::new(self)
    }
}

impl IntoValue for Object {
    fn into_value(self) -> ValueHandle {
        self.into_handle()
    }
}

impl IntoValue for Pairlist {
    fn into_value(self) -> ValueHandle {
        ValueHandle::new(Value::Pairlist(self))
    }
}

impl IntoValue for bool {
    fn into_value(self) -> ValueHandle {
        ValueHandle::new(Value::Logical(vec![self]))
    }
}

impl IntoValue for i32 {
    fn into_value(self) -> ValueHandle {
        ValueHandle::new(Value::Integer(vec![self]))
    }
}

/// The host has no 64-bit integers; wider values become doubles.
impl IntoValue for i64 {
    fn into_value(self) -> ValueHandle {
        ValueHandle::new(Value::Double(vec![self as f64]))
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> ValueHandle {
        ValueHandle::new(Value::Double(vec![self]))
    }
}

impl IntoValue for &str {
    fn into_value(self) -> ValueHandle {
        ValueHandle::new(Value::string(self))
    }
}

impl IntoValue for String {
    fn into_value(self) -> ValueHandle {
        ValueHandle::new(Value::Str(vec![self]))
    }
}

impl IntoValue for Vec<bool> {
    fn into_value(self) -> ValueHandle {
        ValueHandle::new(Value::Logical(self))
    }
}

impl IntoValue for Vec<i32> {
    fn into_value(self) -> ValueHandle {
        ValueHandle::new(Value::Integer(self))
    }
}

impl IntoValue for Vec<i64> {
    fn into_value(self) -> ValueHandle {
        ValueHandle::new(Value::Double(self.into_iter().map(|i| i as f64).collect()))
    }
}

impl IntoValue for Vec<f64> {
    fn into_value(self) -> ValueHandle {
        ValueHandle::new(Value::Double(self))
    }
}

impl IntoValue for Vec<String> {
    fn into_value(self) -> ValueHandle {
        ValueHandle::new(Value::Str(self))
    }
}

impl IntoValue for Vec<&str> {
    fn into_value(self) -> ValueHandle {
        ValueHandle::new(Value::Str(self.into_iter().map(String::from).collect()))
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> ValueHandle {
        match self {
            Some(v) => v.into_value(),
            None => ValueHandle::null(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pairlist::{language, named, pairlist, Arg};

    #[test]
    fn test_host_length() {
        assert_eq!(Value::Null.len(), 0);
        assert_eq!(Value::Integer(vec![1, 2, 3]).len(), 3);
        assert_eq!(Value::symbol("x").len(), 1);
        let p = pairlist(vec![Arg::positional(1), Arg::positional(2)]);
        assert_eq!(Value::Pairlist(p).len(), 2);
    }

    #[test]
    fn test_attributes_replace_in_place() {
        let v = Object::new(Value::string("x"))
            .with_attribute("class", "a")
            .with_attribute("names", "n")
            .with_attribute("class", vec!["b", "c"])
            .into_handle();
        assert_eq!(v.class(), vec!["b", "c"]);
        assert_eq!(v.names(), vec!["n"]);
        assert!(v.inherits("c"));
        assert!(!v.inherits("a"));
    }

    #[test]
    fn test_element_access() {
        let v = vec![1.5, 2.5].into_value();
        assert_eq!(v.element(1), Some(2.5_f64.into_value()));
        assert_eq!(v.element(2), None);
        assert_eq!(ValueHandle::null().element(0), None);

        let sym = Value::symbol("f").into_value();
        assert!(sym.element(0).is_some_and(|e| e.ptr_eq(&sym)));
    }

    #[test]
    fn test_call_elements_follow_host_length() {
        let call = language("f", pairlist(vec![Arg::positional(1), named("y", 2)]));
        assert_eq!(call.len(), 3);
        let items: Vec<String> = (0..call.len())
            .filter_map(|i| call.element(i))
            .map(|v| v.to_string())
            .collect();
        assert_eq!(items, vec!["f", "1L", "2L"]);
        assert_eq!(call.element(3), None);
    }

    #[test]
    fn test_wide_integers_become_doubles() {
        assert_eq!(7_i32.into_value().value(), &Value::Integer(vec![7]));
        assert_eq!(7_i64.into_value().value(), &Value::Double(vec![7.0]));
        assert_eq!(
            vec![1_i64, 2].into_value().value(),
            &Value::Double(vec![1.0, 2.0])
        );
    }

    #[test]
    fn test_deparse_call() {
        let call = language("f", pairlist(vec![named("x", 1), Arg::positional("a")]));
        assert_eq!(call.to_string(), "f(x = 1L, \"a\")");
        assert_eq!(vec![true, false].into_value().to_string(), "c(TRUE, FALSE)");
        assert_eq!(Value::Double(vec![]).to_string(), "numeric(0)");
    }
}
