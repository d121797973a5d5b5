/*
 * Copyright (c) 2026 Mohamad Al-Zawahreh (dba Sovereign Systems).
 *
 * Lazy matrix-shaped expressions.
 *
 * An expression knows its dimensions and can evaluate any single cell on
 * demand; nothing is allocated until `materialize` is called. Consumers are
 * generic over `MatrixExpr`, so dispatch is resolved per concrete kind at
 * compile time.
 *
 * LICENSE: DUAL-LICENSED (AGPLv3 or COMMERCIAL).
 */

use crate::runtime::{IntoValue, Object, Value, ValueHandle};
use crate::sizing::SizedExpr;

/// Dimensions plus point evaluation.
pub trait MatrixExpr {
    type Elem: Copy + IntoValue;

    fn nrow(&self) -> usize;
    fn ncol(&self) -> usize;

    fn size(&self) -> usize {
        self.nrow() * self.ncol()
    }

    /// Cell at row `i`, column `j`.
    fn eval(&self, i: usize, j: usize) -> Self::Elem;

    /// Cell at a column-major linear index.
    fn eval_linear(&self, index: usize) -> Self::Elem {
        let nr = self.nrow();
        self.eval(index % nr, index / nr)
    }
}

// =============================================================================
// UpperTri: triangular mask
// =============================================================================

/// Boolean mask true strictly below the diagonal (`i > j`), or on and below
/// it when the diagonal is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpperTri {
    nr: usize,
    nc: usize,
    keep_diag: bool,
}

impl UpperTri {
    pub fn new(nr: usize, nc: usize, keep_diag: bool) -> Self {
        Self { nr, nc, keep_diag }
    }

    pub fn keep_diag(&self) -> bool {
        self.keep_diag
    }
}

impl MatrixExpr for UpperTri {
    type Elem = bool;

    fn nrow(&self) -> usize {
        self.nr
    }

    fn ncol(&self) -> usize {
        self.nc
    }

    fn eval(&self, i: usize, j: usize) -> bool {
        if self.keep_diag {
            i >= j
        } else {
            i > j
        }
    }
}

/// Triangle mask shaped like `m`.
pub fn upper_tri<E: MatrixExpr>(m: &E, diag: bool) -> UpperTri {
    UpperTri::new(m.nrow(), m.ncol(), diag)
}

// =============================================================================
// LogicalMatrix: materialized storage
// =============================================================================

/// Dense boolean matrix, column-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalMatrix {
    nrow: usize,
    ncol: usize,
    data: Vec<bool>,
}

impl LogicalMatrix {
    /// Returns `None` when `data` does not hold exactly `nrow * ncol` cells.
    pub fn new(nrow: usize, ncol: usize, data: Vec<bool>) -> Option<Self> {
        (data.len() == nrow * ncol).then_some(Self { nrow, ncol, data })
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.data
    }

    /// Host logical vector with a `dim` attribute.
    pub fn into_host(self) -> ValueHandle {
        let dim: Vec<i32> = [self.nrow, self.ncol]
            .iter()
            .map(|&n| i32::try_from(n).unwrap_or(i32::MAX))
            .collect();
        Object::new(Value::Logical(self.data))
            .with_attribute("dim", dim)
            .into_handle()
    }
}

impl MatrixExpr for LogicalMatrix {
    type Elem = bool;

    fn nrow(&self) -> usize {
        self.nrow
    }

    fn ncol(&self) -> usize {
        self.ncol
    }

    fn eval(&self, i: usize, j: usize) -> bool {
        self.data[i + j * self.nrow]
    }
}

/// Evaluates every cell of a boolean expression into dense storage.
pub fn materialize<E: MatrixExpr<Elem = bool>>(expr: &E) -> LogicalMatrix {
    let (nrow, ncol) = (expr.nrow(), expr.ncol());
    let mut data = Vec::with_capacity(expr.size());
    for j in 0..ncol {
        for i in 0..nrow {
            data.push(expr.eval(i, j));
        }
    }
    LogicalMatrix { nrow, ncol, data }
}

impl SizedExpr for UpperTri {
    fn size(&self) -> usize {
        MatrixExpr::size(self)
    }

    fn get(&self, index: usize) -> ValueHandle {
        self.eval_linear(index).into_value()
    }
}

impl SizedExpr for LogicalMatrix {
    fn size(&self) -> usize {
        MatrixExpr::size(self)
    }

    fn get(&self, index: usize) -> ValueHandle {
        self.eval_linear(index).into_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_is_product() {
        for (nr, nc) in [(0, 0), (0, 5), (3, 0), (1, 1), (3, 4), (7, 2)] {
            assert_eq!(MatrixExpr::size(&UpperTri::new(nr, nc, false)), nr * nc);
            assert_eq!(MatrixExpr::size(&UpperTri::new(nr, nc, true)), nr * nc);
        }
    }

    #[test]
    fn test_diagonal() {
        let keep = UpperTri::new(5, 5, true);
        let drop = UpperTri::new(5, 5, false);
        for i in 0..5 {
            assert!(keep.eval(i, i));
            assert!(!drop.eval(i, i));
        }
    }

    #[test]
    fn test_off_diagonal() {
        let m = UpperTri::new(3, 3, false);
        assert!(m.eval(2, 0));
        assert!(m.eval(1, 0));
        assert!(!m.eval(0, 1));
        assert!(!m.eval(0, 2));
    }

    #[test]
    fn test_shape_from_existing_matrix() {
        let base = LogicalMatrix::new(2, 3, vec![false; 6]).unwrap();
        let mask = upper_tri(&base, true);
        assert_eq!((mask.nrow(), mask.ncol()), (2, 3));
        assert!(mask.keep_diag());
    }

    #[test]
    fn test_materialize_column_major() {
        let m = materialize(&UpperTri::new(3, 2, false));
        // column 0: rows 0..3, then column 1
        assert_eq!(m.as_slice(), &[false, true, true, false, false, true]);
        assert!(m.eval(2, 1));
        assert!(m.eval_linear(5));
    }

    #[test]
    fn test_materialized_host_value() {
        let value = materialize(&UpperTri::new(2, 2, true)).into_host();
        assert_eq!(value.value(), &Value::Logical(vec![true, true, false, true]));
        assert_eq!(
            value.attribute("dim").map(|d| d.value().clone()),
            Some(Value::Integer(vec![2, 2]))
        );
    }

    #[test]
    fn test_dense_rejects_wrong_length() {
        assert!(LogicalMatrix::new(2, 2, vec![true; 3]).is_none());
    }
}
