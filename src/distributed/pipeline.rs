//! Прогон распределённого бенчмарка по списку размеров

use super::distribute::distribute_operands;
use super::multiply::multiply_block;
use super::partition::partition;
use super::reduce::combine_partials;
use crate::comm::{Communicator, ROOT_RANK};
use crate::config::BenchConfig;
use crate::error::{MatrixError, Result};
use crate::layout::Layout;
use crate::matrix::{generate::SECOND_OPERAND_SEED_OFFSET, generate_square, write_to_file, Matrix};
use crate::report::{write_stats, SizeTiming};
use std::fs;
use std::time::Instant;
use tracing::{debug, info};

/// Этап обработки одного размера; переходы только вперёд
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Generated,
    Distributed,
    LocallyMultiplied,
    Reduced,
    Persisted,
}

impl Stage {
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Generated => Some(Stage::Distributed),
            Stage::Distributed => Some(Stage::LocallyMultiplied),
            Stage::LocallyMultiplied => Some(Stage::Reduced),
            Stage::Reduced => Some(Stage::Persisted),
            Stage::Persisted => None,
        }
    }
}

/// Текущее состояние одного размера
struct SizeRun {
    size: usize,
    stage: Stage,
}

impl SizeRun {
    fn start(size: usize) -> Self {
        Self {
            size,
            stage: Stage::Generated,
        }
    }

    fn advance(&mut self, to: Stage) {
        debug_assert_eq!(self.stage.next(), Some(to), "stage skipped for size {}", self.size);
        debug!(size = self.size, from = ?self.stage, to = ?to, "смена этапа");
        self.stage = to;
    }
}

fn operand_seed(config: &BenchConfig, size: usize) -> u64 {
    config.seed.wrapping_add(size as u64)
}

/// Локальный блок и редукция с отметкой каждого этапа
fn multiply_and_reduce<C: Communicator>(
    comm: &C,
    run: &mut SizeRun,
    a: &Matrix,
    b: &Matrix,
    rank: usize,
    process_count: usize,
) -> Result<Option<Matrix>> {
    let block = partition(a.rows(), process_count, rank)?;
    let partial = multiply_block(a, b, block);
    run.advance(Stage::LocallyMultiplied);

    let result = combine_partials(comm, partial)?;
    run.advance(Stage::Reduced);
    Ok(result)
}

/// Корень генерирует и сохраняет операнды для всех размеров
fn generate_all(config: &BenchConfig, layout: &Layout) -> Result<Vec<(Matrix, Matrix)>> {
    fs::create_dir_all(layout.root()).map_err(|e| MatrixError::io(layout.root(), e))?;

    config
        .sizes
        .distributed
        .iter()
        .map(|&size| {
            info!("Генерация матриц размера {}x{}", size, size);
            let seed = operand_seed(config, size);
            let a = generate_square(size, seed, config.min_value, config.max_value)?;
            let b = generate_square(
                size,
                seed.wrapping_add(SECOND_OPERAND_SEED_OFFSET),
                config.min_value,
                config.max_value,
            )?;
            write_to_file(&a, layout.distributed_operand(1, size))?;
            write_to_file(&b, layout.distributed_operand(2, size))?;
            Ok((a, b))
        })
        .collect()
}

/// Выполняет распределённый бенчмарк на ранге `comm`.
///
/// Все ранги должны получить одинаковый `config`. Замеры возвращаются только
/// на корне, остальные ранги получают пустой вектор. Любая ошибка обмена
/// прерывает прогон.
pub fn run_distributed<C: Communicator>(comm: &C, config: &BenchConfig) -> Result<Vec<SizeTiming>> {
    let rank = comm.rank();
    let process_count = comm.size();
    let layout = Layout::new(&config.output_dir);

    // Операнды держатся в памяти корня; файлы пишутся для последующей проверки
    let mut operands = if rank == ROOT_RANK {
        generate_all(config, &layout)?.into_iter().map(Some).collect()
    } else {
        vec![None; config.sizes.distributed.len()]
    };
    comm.barrier()?;

    let mut timings = Vec::new();
    for (index, &size) in config.sizes.distributed.iter().enumerate() {
        let mut run = SizeRun::start(size);

        let (a, b) = distribute_operands(comm, rank, process_count, operands[index].take())?;
        run.advance(Stage::Distributed);

        let start = Instant::now();
        let result = multiply_and_reduce(comm, &mut run, &a, &b, rank, process_count)?;
        let elapsed = start.elapsed();

        if let Some(result) = result {
            write_to_file(&result, layout.distributed_result(size))?;
            let timing = SizeTiming { size, elapsed };
            info!(
                "Умножение для размера {}x{} завершено за {:.3} мс",
                size,
                size,
                timing.millis()
            );
            timings.push(timing);
        }
        run.advance(Stage::Persisted);
    }

    if rank == ROOT_RANK {
        write_stats(layout.stats(), &timings)?;
        info!(path = %layout.stats().display(), "статистика сохранена");
    }
    Ok(timings)
}
