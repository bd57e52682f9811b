//! Распределённое умножение: локальный блок строк и редукция на корень

use super::partition::{partition, RowBlock};
use super::reduce::combine_partials;
use crate::comm::{Communicator, ROOT_RANK};
use crate::error::Result;
use crate::matrix::{multiply_rows_into, Matrix};
use tracing::{debug, info};

/// Частичный результат: полная N x N матрица, заполнены только строки `block`
pub fn multiply_block(a: &Matrix, b: &Matrix, block: RowBlock) -> Matrix {
    let mut partial = Matrix::zeros(a.rows(), b.cols());
    multiply_rows_into(a, b, block.range(), &mut partial);
    partial
}

/// Умножает квадратные операнды одного размера, имеющиеся целиком на каждом ранге.
///
/// Возвращает `Some(результат)` на корне и `None` на остальных рангах.
/// Операнды должны быть проверены заранее.
pub fn multiply_distributed<C: Communicator>(
    comm: &C,
    a: &Matrix,
    b: &Matrix,
    rank: usize,
    process_count: usize,
) -> Result<Option<Matrix>> {
    debug_assert!(a.is_square() && b.is_square() && a.rows() == b.rows());

    let n = a.rows();
    if rank == ROOT_RANK {
        info!("Умножение матриц размера {}x{}", n, n);
    }

    let block = partition(n, process_count, rank)?;
    debug!(rank, start = block.start, end = block.end, "локальный блок");

    let partial = multiply_block(a, b, block);
    combine_partials(comm, partial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::run_local;
    use crate::matrix::{cpu_matrix_multiply, generate_square};

    fn distributed(a: &Matrix, b: &Matrix, processes: usize) -> Option<Matrix> {
        run_local(processes, |comm| {
            let rank = comm.rank();
            multiply_distributed(&comm, a, b, rank, processes).unwrap()
        })
        .unwrap()
        .remove(0)
    }

    #[test]
    fn matches_sequential_product() {
        for n in [1, 2, 5, 16, 17] {
            let a = generate_square(n, n as u64, -1000, 1000).unwrap();
            let b = generate_square(n, n as u64 + 1000, -1000, 1000).unwrap();
            let expected = cpu_matrix_multiply(&a, &b).unwrap();
            for p in 1..=4 {
                assert_eq!(distributed(&a, &b, p), Some(expected.clone()), "n={} p={}", n, p);
            }
        }
    }

    #[test]
    fn two_by_two_example() {
        let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        let b = Matrix::from_rows(vec![vec![5, 6], vec![7, 8]]).unwrap();
        let expected = Matrix::from_rows(vec![vec![19, 22], vec![43, 50]]).unwrap();
        assert_eq!(distributed(&a, &b, 1), Some(expected.clone()));
        assert_eq!(distributed(&a, &b, 2), Some(expected));
    }

    #[test]
    fn non_root_ranks_get_nothing() {
        let a = generate_square(6, 3, 0, 99).unwrap();
        let results = run_local(3, |comm| {
            let rank = comm.rank();
            multiply_distributed(&comm, &a, &a, rank, 3).unwrap()
        })
        .unwrap();
        assert!(results[0].is_some());
        assert!(results[1..].iter().all(Option::is_none));
    }

    #[test]
    fn partial_is_zero_outside_block() {
        let a = generate_square(5, 9, 1, 9).unwrap();
        let partial = multiply_block(&a, &a, RowBlock { start: 2, end: 4 });
        for i in [0, 1, 4] {
            assert!(partial.row(i).iter().all(|&v| v == 0));
        }
        assert!(partial.row(2).iter().all(|&v| v != 0));
    }
}
