//! Ошибки библиотеки

use std::path::PathBuf;
use thiserror::Error;

/// Результат операций библиотеки
pub type Result<T> = std::result::Result<T, MatrixError>;

/// Ошибки генерации, умножения, ввода-вывода и обмена сообщениями
#[derive(Debug, Error)]
pub enum MatrixError {
    /// Внутренние размерности не совпадают
    #[error("matrix dimensions do not match for multiplication: {left_rows}x{left_cols} * {right_rows}x{right_cols}")]
    DimensionMismatch {
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },

    #[error("buffer holds {found} values, expected {expected}")]
    BufferLength { expected: usize, found: usize },

    #[error("row {row} has {found} values, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("size of the matrix must be positive, got {rows}x{cols}")]
    InvalidSize { rows: usize, cols: usize },

    #[error("invalid partition: rank {rank} of {process_count} processes")]
    InvalidPartition { rank: usize, process_count: usize },

    #[error("failed to access {path}: {source}", path = .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed matrix file {path} at line {line}: {reason}", path = .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// Сбой транспорта сообщений, фатален для всей группы процессов
    #[error("communication failure: {0}")]
    Comm(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl MatrixError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MatrixError::Io {
            path: path.into(),
            source,
        }
    }
}
