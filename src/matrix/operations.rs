//! Операции над матрицами
//!
//! Вся арифметика 32-битная с переполнением по модулю 2^32.

use super::types::Matrix;
use crate::error::{MatrixError, Result};
use std::ops::Range;
use tracing::{debug, warn};

fn check_inner_dimensions(a: &Matrix, b: &Matrix) -> Result<()> {
    if a.cols() != b.rows() {
        return Err(MatrixError::DimensionMismatch {
            left_rows: a.rows(),
            left_cols: a.cols(),
            right_rows: b.rows(),
            right_cols: b.cols(),
        });
    }
    Ok(())
}

/// Последовательное умножение тройным циклом
pub fn cpu_matrix_multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    check_inner_dimensions(a, b)?;

    let mut c = Matrix::zeros(a.rows(), b.cols());
    for i in 0..a.rows() {
        for j in 0..b.cols() {
            let mut sum = 0i32;
            for k in 0..a.cols() {
                sum = sum.wrapping_add(a.get(i, k).wrapping_mul(b.get(k, j)));
            }
            c.set(i, j, sum);
        }
    }
    Ok(c)
}

/// Накопление произведения строк `rows` в `out`, остальные строки не трогаются.
///
/// Размерности не проверяются: вызывающий гарантирует квадратные операнды
/// одного размера и `out` того же размера.
pub fn multiply_rows_into(a: &Matrix, b: &Matrix, rows: Range<usize>, out: &mut Matrix) {
    for i in rows {
        let out_row = out.row_mut(i);
        for k in 0..a.cols() {
            let a_ik = a.get(i, k);
            for (acc, &b_kj) in out_row.iter_mut().zip(b.row(k)) {
                *acc = acc.wrapping_add(a_ik.wrapping_mul(b_kj));
            }
        }
    }
}

/// Транспонирование
pub fn transpose(m: &Matrix) -> Matrix {
    let mut t = Matrix::zeros(m.cols(), m.rows());
    for i in 0..m.rows() {
        for j in 0..m.cols() {
            t.set(j, i, m.get(i, j));
        }
    }
    t
}

/// Итог сравнения двух матриц поэлементно
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Comparison {
    pub diff_count: usize,
    pub max_diff: u32,
}

impl Comparison {
    pub fn matches(&self) -> bool {
        self.diff_count == 0
    }
}

/// Сравнивает результат с эталоном; матрицы разной формы не совпадают целиком
pub fn compare_results(actual: &Matrix, expected: &Matrix) -> Comparison {
    if actual.rows() != expected.rows() || actual.cols() != expected.cols() {
        warn!(
            actual_rows = actual.rows(),
            actual_cols = actual.cols(),
            expected_rows = expected.rows(),
            expected_cols = expected.cols(),
            "размеры матриц различаются"
        );
        return Comparison {
            diff_count: expected.rows() * expected.cols(),
            max_diff: u32::MAX,
        };
    }

    let mut comparison = Comparison::default();
    for (&x, &y) in actual.as_slice().iter().zip(expected.as_slice()) {
        if x != y {
            comparison.diff_count += 1;
            comparison.max_diff = comparison.max_diff.max(x.abs_diff(y));
        }
    }

    if comparison.matches() {
        debug!("результаты полностью совпадают");
    } else {
        warn!(
            diff_count = comparison.diff_count,
            max_diff = comparison.max_diff,
            "обнаружены расхождения"
        );
    }
    comparison
}
