//! Сборка частичных результатов на корне одной коллективной редукцией

use crate::comm::{Communicator, ROOT_RANK};
use crate::error::Result;
use crate::matrix::Matrix;

/// Поэлементно суммирует частичные результаты всех рангов.
///
/// Блоки строк не пересекаются, поэтому сумма совпадает с объединением блоков.
/// Полная матрица возвращается только на корне.
pub fn combine_partials<C: Communicator>(comm: &C, partial: Matrix) -> Result<Option<Matrix>> {
    let (rows, cols) = (partial.rows(), partial.cols());
    comm.reduce_sum(ROOT_RANK, partial.as_slice())?
        .map(|flat| Matrix::from_vec(rows, cols, flat))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::run_local;

    #[test]
    fn disjoint_rows_are_merged() {
        let results = run_local(3, |comm| {
            let mut partial = Matrix::zeros(3, 2);
            let r = comm.rank();
            partial.row_mut(r).copy_from_slice(&[r as i32 + 1, -(r as i32) - 1]);
            combine_partials(&comm, partial).unwrap()
        })
        .unwrap();

        let expected = Matrix::from_rows(vec![vec![1, -1], vec![2, -2], vec![3, -3]]).unwrap();
        assert_eq!(results[0].as_ref(), Some(&expected));
        assert!(results[1].is_none() && results[2].is_none());
    }
}
