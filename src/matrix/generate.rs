//! Генерация операндов

use super::types::{Matrix, MatrixType};
use crate::error::{MatrixError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Uniform;
use tracing::debug;

/// Смещение зерна второго операнда относительно первого
pub const SECOND_OPERAND_SEED_OFFSET: u64 = 1000;

/// Генерирует матрицу rows x cols с равномерно распределёнными значениями из [min, max]
pub fn generate_matrix(rows: usize, cols: usize, seed: u64, min: i32, max: i32) -> Result<Matrix> {
    if rows == 0 || cols == 0 {
        return Err(MatrixError::InvalidSize { rows, cols });
    }
    if min > max {
        return Err(MatrixError::Config(format!(
            "value range is empty: [{}, {}]",
            min, max
        )));
    }

    debug!(rows, cols, seed, "генерация матрицы");
    let mut rng = StdRng::seed_from_u64(seed);
    let distribution = Uniform::new_inclusive(min, max);
    let data = (0..rows * cols).map(|_| rng.sample(distribution)).collect();
    Matrix::from_vec(rows, cols, data)
}

/// Квадратная матрица size x size
pub fn generate_square(size: usize, seed: u64, min: i32, max: i32) -> Result<Matrix> {
    generate_matrix(size, size, seed, min, max)
}

/// Инициализирует пару квадратных операндов заданного типа и размера
pub fn initialize_matrices(
    matrix_type: MatrixType,
    size: usize,
    min: i32,
    max: i32,
) -> Result<(Matrix, Matrix)> {
    if size == 0 {
        return Err(MatrixError::InvalidSize {
            rows: size,
            cols: size,
        });
    }
    let filled = |value: i32| Matrix::from_vec(size, size, vec![value; size * size]);
    match matrix_type {
        MatrixType::OnesAndTwos => Ok((filled(1)?, filled(2)?)),
        MatrixType::ThreesAndFours => Ok((filled(3)?, filled(4)?)),
        MatrixType::Random { seed } => Ok((
            generate_square(size, seed, min, max)?,
            generate_square(size, seed.wrapping_add(SECOND_OPERAND_SEED_OFFSET), min, max)?,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_gives_same_matrix() {
        let a = generate_square(12, 7, -1000, 1000).unwrap();
        let b = generate_square(12, 7, -1000, 1000).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn values_stay_in_range() {
        let m = generate_matrix(9, 4, 3, 0, 99).unwrap();
        assert_eq!((m.rows(), m.cols()), (9, 4));
        assert!(m.as_slice().iter().all(|v| (0..=99).contains(v)));
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(matches!(
            generate_square(0, 1, 0, 10),
            Err(MatrixError::InvalidSize { .. })
        ));
    }

    #[test]
    fn constant_operands() {
        let (a, b) = initialize_matrices(MatrixType::ThreesAndFours, 3, 0, 0).unwrap();
        assert!(a.as_slice().iter().all(|&v| v == 3));
        assert!(b.as_slice().iter().all(|&v| v == 4));
    }

    #[test]
    fn random_operands_differ() {
        let (a, b) = initialize_matrices(MatrixType::Random { seed: 42 }, 8, -1000, 1000).unwrap();
        assert_ne!(a, b);
    }
}
