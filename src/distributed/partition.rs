//! Разбиение строк левого операнда между процессами

use crate::error::{MatrixError, Result};
use std::ops::Range;

/// Непрерывный блок строк [start, end), закреплённый за одним рангом
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBlock {
    pub start: usize,
    pub end: usize,
}

impl RowBlock {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Блок строк ранга `rank` из `process_count`.
///
/// Все блоки по `total_rows / process_count` строк, последний забирает остаток.
/// При `process_count > total_rows` младшие ранги получают пустые блоки.
pub fn partition(total_rows: usize, process_count: usize, rank: usize) -> Result<RowBlock> {
    if process_count == 0 || rank >= process_count {
        return Err(MatrixError::InvalidPartition {
            rank,
            process_count,
        });
    }

    let rows_per = total_rows / process_count;
    let start = rank * rows_per;
    let end = if rank == process_count - 1 {
        total_rows
    } else {
        start + rows_per
    };
    Ok(RowBlock { start, end })
}
