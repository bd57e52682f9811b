//! Многопоточное умножение на пуле потоков rayon
//!
//! Каждая строка результата считается независимо, общее состояние только
//! для чтения, поэтому блокировки не нужны.

use super::operations::transpose;
use super::types::Matrix;
use crate::error::{MatrixError, Result};
use rayon::prelude::*;

/// Умножение на пуле из `threads` потоков, B предварительно транспонируется
pub fn parallel_matrix_multiply(a: &Matrix, b: &Matrix, threads: usize) -> Result<Matrix> {
    if a.cols() != b.rows() {
        return Err(MatrixError::DimensionMismatch {
            left_rows: a.rows(),
            left_cols: a.cols(),
            right_rows: b.rows(),
            right_cols: b.cols(),
        });
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .build()
        .map_err(|e| MatrixError::Config(format!("failed to build thread pool: {}", e)))?;

    let bt = transpose(b);
    let mut c = Matrix::zeros(a.rows(), b.cols());
    let width = b.cols().max(1);

    pool.install(|| {
        c.as_mut_slice()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(i, out_row)| {
                let a_row = a.row(i);
                for (j, cell) in out_row.iter_mut().enumerate() {
                    *cell = a_row
                        .iter()
                        .zip(bt.row(j))
                        .fold(0i32, |sum, (&x, &y)| sum.wrapping_add(x.wrapping_mul(y)));
                }
            });
    });

    Ok(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{cpu_matrix_multiply, generate_matrix};

    #[test]
    fn matches_sequential_for_any_thread_count() {
        let a = generate_matrix(23, 17, 1, -1000, 1000).unwrap();
        let b = generate_matrix(17, 11, 2, -1000, 1000).unwrap();
        let expected = cpu_matrix_multiply(&a, &b).unwrap();
        for threads in [1, 2, 4, 8] {
            assert_eq!(parallel_matrix_multiply(&a, &b, threads).unwrap(), expected);
        }
    }

    #[test]
    fn wraps_like_sequential() {
        let a = Matrix::from_vec(2, 2, vec![i32::MAX, i32::MIN, 7, -3]).unwrap();
        let b = Matrix::from_vec(2, 2, vec![3, i32::MAX, -5, 9]).unwrap();
        assert_eq!(
            parallel_matrix_multiply(&a, &b, 2).unwrap(),
            cpu_matrix_multiply(&a, &b).unwrap()
        );
    }

    #[test]
    fn rejects_mismatched_dimensions() {
        let a = Matrix::zeros(3, 2);
        assert!(parallel_matrix_multiply(&a, &a, 2).is_err());
    }
}
