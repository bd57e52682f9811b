//! Рассылка операндов всем рангам
//!
//! Корень отправляет каждому рангу размер, затем все строки A и все строки B.
//! Каждый ранг получает полные копии обоих операндов, а не только свой блок.

use crate::comm::{Communicator, Tag, ROOT_RANK};
use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;
use tracing::debug;

/// Возвращает на каждом ранге полные копии операндов.
///
/// На корне `operands` обязан быть `Some`, на остальных рангах игнорируется.
pub fn distribute_operands<C: Communicator>(
    comm: &C,
    rank: usize,
    process_count: usize,
    operands: Option<(Matrix, Matrix)>,
) -> Result<(Matrix, Matrix)> {
    if rank == ROOT_RANK {
        let (a, b) = operands
            .ok_or_else(|| MatrixError::Comm("root rank has no operands to distribute".into()))?;
        send_operands(comm, process_count, &a, &b)?;
        Ok((a, b))
    } else {
        receive_operands(comm)
    }
}

fn send_operands<C: Communicator>(comm: &C, process_count: usize, a: &Matrix, b: &Matrix) -> Result<()> {
    let size = a.rows() as i32;
    for dest in 1..process_count {
        comm.send(dest, Tag::Size, &[size])?;
    }

    for dest in 1..process_count {
        for row in a.iter_rows() {
            comm.send(dest, Tag::RowA, row)?;
        }
        for row in b.iter_rows() {
            comm.send(dest, Tag::RowB, row)?;
        }
        debug!(dest, size, "операнды отправлены");
    }
    Ok(())
}

fn receive_operands<C: Communicator>(comm: &C) -> Result<(Matrix, Matrix)> {
    let mut size = [0i32; 1];
    comm.receive_into(ROOT_RANK, Tag::Size, &mut size)?;
    let n = usize::try_from(size[0])
        .map_err(|_| MatrixError::Comm(format!("received negative matrix size {}", size[0])))?;

    let mut a = Matrix::zeros(n, n);
    let mut b = Matrix::zeros(n, n);
    for i in 0..n {
        comm.receive_into(ROOT_RANK, Tag::RowA, a.row_mut(i))?;
    }
    for i in 0..n {
        comm.receive_into(ROOT_RANK, Tag::RowB, b.row_mut(i))?;
    }
    debug!(rank = comm.rank(), size = n, "операнды получены");
    Ok((a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::run_local;
    use crate::matrix::generate_square;

    #[test]
    fn every_rank_gets_identical_copies() {
        let a = generate_square(7, 1, -1000, 1000).unwrap();
        let b = generate_square(7, 2, -1000, 1000).unwrap();

        let copies = run_local(4, |comm| {
            let rank = comm.rank();
            let operands = (rank == ROOT_RANK).then(|| (a.clone(), b.clone()));
            distribute_operands(&comm, rank, 4, operands).unwrap()
        })
        .unwrap();

        for (ra, rb) in copies {
            assert_eq!(ra, a);
            assert_eq!(rb, b);
        }
    }

    #[test]
    fn root_without_operands_fails() {
        let results = run_local(1, |comm| distribute_operands(&comm, 0, 1, None)).unwrap();
        assert!(results[0].is_err());
    }
}
