//! Целочисленное умножение матриц: последовательно, на потоках и обменом сообщениями

pub mod bench;
pub mod comm;
pub mod config;
pub mod distributed;
pub mod error;
pub mod layout;
pub mod matrix;
pub mod report;
pub mod utils;

// Реэкспорт основных типов для удобства
pub use comm::{Communicator, LocalComm, Tag, ROOT_RANK};
pub use config::BenchConfig;
pub use distributed::{multiply_distributed, partition, RowBlock};
pub use error::{MatrixError, Result};
pub use matrix::{Matrix, MatrixType};
pub use report::SizeTiming;
