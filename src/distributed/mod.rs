//! Распределённое умножение матриц обменом сообщениями
//!
//! Этапы для каждого размера: рассылка операндов, умножение своего блока
//! строк, редукция частичных результатов на корень.

pub mod distribute;
pub mod multiply;
pub mod partition;
pub mod pipeline;
pub mod reduce;

pub use distribute::distribute_operands;
pub use multiply::{multiply_block, multiply_distributed};
pub use partition::{partition, RowBlock};
pub use pipeline::{run_distributed, Stage};
pub use reduce::combine_partials;
