use nalgebra::{DMatrix, DVector};

/// Compressed sparse row matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    nrows: usize,
    ncols: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<f64>,
}

impl CsrMatrix {
    /// Build from per-row `(column, value)` lists.
    ///
    /// Duplicate columns within a row are summed and exact zeros dropped.
    pub fn from_rows(ncols: usize, rows: Vec<Vec<(usize, f64)>>) -> Self {
        let nrows = rows.len();
        let mut row_ptr = Vec::with_capacity(nrows + 1);
        let mut col_idx = Vec::new();
        let mut values = Vec::new();
        row_ptr.push(0);

        for mut row in rows {
            row.sort_by_key(|&(c, _)| c);
            let mut iter = row.into_iter().peekable();
            while let Some((col, mut value)) = iter.next() {
                debug_assert!(col < ncols);
                while let Some(&(next, v)) = iter.peek() {
                    if next != col {
                        break;
                    }
                    value += v;
                    iter.next();
                }
                if value != 0.0 {
                    col_idx.push(col);
                    values.push(value);
                }
            }
            row_ptr.push(col_idx.len());
        }

        Self {
            nrows,
            ncols,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Build from a dense matrix, keeping non-zero entries.
    pub fn from_dense(m: &DMatrix<f64>) -> Self {
        let rows = (0..m.nrows())
            .map(|i| (0..m.ncols()).map(|j| (j, m[(i, j)])).collect())
            .collect();
        Self::from_rows(m.ncols(), rows)
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Number of stored non-zero entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Iterate the stored `(column, value)` pairs of row `i`.
    pub fn row(&self, i: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = self.row_ptr[i]..self.row_ptr[i + 1];
        self.col_idx[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// Entry `(i, j)`, zero when not stored.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.row(i).find(|&(c, _)| c == j).map_or(0.0, |(_, v)| v)
    }

    /// Matrix-vector product `A x`.
    pub fn mul_vec(&self, x: &DVector<f64>) -> DVector<f64> {
        let mut out = DVector::zeros(self.nrows);
        self.mul_vec_into(x, &mut out);
        out
    }

    /// Matrix-vector product written into `out`.
    pub fn mul_vec_into(&self, x: &DVector<f64>, out: &mut DVector<f64>) {
        for i in 0..self.nrows {
            let mut acc = 0.0;
            for k in self.row_ptr[i]..self.row_ptr[i + 1] {
                acc += self.values[k] * x[self.col_idx[k]];
            }
            out[i] = acc;
        }
    }

    pub fn to_dense(&self) -> DMatrix<f64> {
        let mut m = DMatrix::zeros(self.nrows, self.ncols);
        for i in 0..self.nrows {
            for (j, v) in self.row(i) {
                m[(i, j)] = v;
            }
        }
        m
    }

    /// Whether `A == Aᵀ` up to an absolute tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        if self.nrows != self.ncols {
            return false;
        }
        (0..self.nrows).all(|i| self.row(i).all(|(j, v)| (v - self.get(j, i)).abs() <= tol))
    }
}
