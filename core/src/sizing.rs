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

use crate::runtime::{IntoValue, Value, ValueHandle};

/// A native value object that knows its own length.
pub trait SizedExpr {
    fn size(&self) -> usize;

    /// Element `index`, `index < size()`.
    fn get(&self, index: usize) -> ValueHandle;
}

impl<T: IntoValue + Clone> SizedExpr for Vec<T> {
    fn size(&self) -> usize {
        self.len()
    }

    fn get(&self, index: usize) -> ValueHandle {
        self[index].clone().into_value()
    }
}

/// A primitive scalar operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Logical(bool),
    Integer(i32),
    Double(f64),
    Str(String),
}

impl IntoValue for Scalar {
    fn into_value(self) -> ValueHandle {
        match self {
            Scalar::Logical(b) => b.into_value(),
            Scalar::Integer(i) => i.into_value(),
            Scalar::Double(d) => d.into_value(),
            Scalar::Str(s) => s.into_value(),
        }
    }
}

/// One operand of a concatenation.
pub enum Operand<'a> {
    Scalar(Scalar),
    /// A host-native sequence; its length is whatever the host reports.
    Sequence(ValueHandle),
    Object(&'a dyn SizedExpr),
}

impl<'a> Operand<'a> {
    pub fn object(expr: &'a dyn SizedExpr) -> Self {
        Operand::Object(expr)
    }

    /// Elements this operand adds to the concatenation.
    pub fn contribution(&self) -> usize {
        match self {
            Operand::Scalar(_) => 1,
            Operand::Sequence(handle) => handle.len(),
            Operand::Object(expr) => expr.size(),
        }
    }
}

impl From<bool> for Operand<'_> {
    fn from(b: bool) -> Self {
        Operand::Scalar(Scalar::Logical(b))
    }
}

impl From<i32> for Operand<'_> {
    fn from(i: i32) -> Self {
        Operand::Scalar(Scalar::Integer(i))
    }
}

impl From<f64> for Operand<'_> {
    fn from(d: f64) -> Self {
        Operand::Scalar(Scalar::Double(d))
    }
}

impl From<&str> for Operand<'_> {
    fn from(s: &str) -> Self {
        Operand::Scalar(Scalar::Str(s.to_string()))
    }
}

impl From<ValueHandle> for Operand<'_> {
    fn from(handle: ValueHandle) -> Self {
        Operand::Sequence(handle)
    }
}

/// Total length of the concatenation of `operands`. Only length metadata is
/// consulted; no element is evaluated.
pub fn concat_size(operands: &[Operand<'_>]) -> usize {
    operands.iter().map(Operand::contribution).sum()
}

/// Concatenates `operands` into one generic host list, in order.
pub fn concat(operands: &[Operand<'_>]) -> ValueHandle {
    let total = concat_size(operands);
    let mut out = Vec::with_capacity(total);
    for op in operands {
        match op {
            Operand::Scalar(s) => out.push(s.clone().into_value()),
            Operand::Sequence(handle) => {
                out.extend((0..handle.len()).filter_map(|i| handle.element(i)));
            }
            Operand::Object(expr) => out.extend((0..expr.size()).map(|i| expr.get(i))),
        }
    }
    debug_assert_eq!(out.len(), total);
    ValueHandle::new(Value::List(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::UpperTri;
    use crate::pairlist::{language, named, pairlist, Arg};
    use crate::runtime::Object;

    #[test]
    fn test_empty() {
        assert_eq!(concat_size(&[]), 0);
        assert!(concat(&[]).is_empty());
    }

    #[test]
    fn test_sum_of_contributions() {
        let mask = UpperTri::new(2, 3, false);
        let native = vec![1.0, 2.0, 3.0, 4.0];
        let ops = [
            Operand::from(1),
            Operand::from(true),
            Operand::from("s"),
            Operand::from(vec![10_i32, 20, 30].into_value()),
            Operand::from(ValueHandle::null()),
            Operand::object(&mask),
            Operand::object(&native),
        ];
        let expected: usize = ops.iter().map(Operand::contribution).sum();
        assert_eq!(expected, 1 + 1 + 1 + 3 + 0 + 6 + 4);
        assert_eq!(concat_size(&ops), expected);
    }

    #[test]
    fn test_sum_not_max() {
        let a = vec![1_i32; 5].into_value();
        let b = vec![2_i32; 2].into_value();
        assert_eq!(concat_size(&[a.into(), b.into()]), 7);
    }

    #[test]
    fn test_sequence_uses_host_length() {
        let args = pairlist(vec![named("a", 1), Arg::positional(2)]);
        let sym = Value::symbol("x").into_value();
        let ops = [Operand::from(args.into_value()), Operand::from(sym)];
        assert_eq!(concat_size(&ops), 3);
    }

    #[test]
    fn test_concat_preserves_order() {
        let native = vec![7_i32, 8];
        let ops = [
            Operand::from(1),
            Operand::from(vec![2.5, 3.5].into_value()),
            Operand::object(&native),
            Operand::from("end"),
        ];
        let out = concat(&ops);
        assert_eq!(out.len(), concat_size(&ops));
        let rendered: Vec<String> = (0..out.len())
            .filter_map(|i| out.element(i))
            .map(|v| v.to_string())
            .collect();
        assert_eq!(rendered, vec!["1L", "2.5", "3.5", "7L", "8L", "\"end\""]);
    }

    #[test]
    fn test_call_operand_concatenates_every_node() {
        let call = language("f", pairlist(vec![Arg::positional(1), Arg::positional(2)]));
        let ops = [Operand::from(call)];
        let out = concat(&ops);
        assert_eq!(concat_size(&ops), 3);
        assert_eq!(out.len(), 3);
        let rendered: Vec<String> = (0..out.len())
            .filter_map(|i| out.element(i))
            .map(|v| v.to_string())
            .collect();
        assert_eq!(rendered, vec!["f", "1L", "2L"]);
    }

    #[test]
    fn test_concat_length_matches_size_for_every_sequence_kind() {
        let sequences = vec![
            ValueHandle::null(),
            Value::Logical(vec![true, false]).into_value(),
            Value::Integer(vec![1, 2, 3]).into_value(),
            Value::Double(vec![0.5]).into_value(),
            Value::Str(vec!["a".into(), "b".into()]).into_value(),
            Value::List(vec![1_i32.into_value(), "x".into_value()]).into_value(),
            Value::symbol("x").into_value(),
            pairlist(vec![named("a", 1), Arg::positional(2)]).into_value(),
            language("g", pairlist(vec![named("x", 1), Arg::positional("y")])),
            language("h", pairlist(Vec::new())),
            Object::new(Value::Integer(vec![4, 5]))
                .with_attribute("names", vec!["p", "q"])
                .into_handle(),
        ];
        for seq in sequences {
            let ops = [Operand::from(seq.clone())];
            assert_eq!(concat(&ops).len(), concat_size(&ops), "{}", seq);
        }
    }
}
