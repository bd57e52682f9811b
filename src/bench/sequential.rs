//! Последовательный бенчмарк: один поток, тройной цикл

use crate::config::BenchConfig;
use crate::error::{MatrixError, Result};
use crate::layout::Layout;
use crate::matrix::{
    cpu_matrix_multiply, generate::SECOND_OPERAND_SEED_OFFSET, generate_square, write_to_file,
};
use crate::report::{write_sequential_report, SizeTiming};
use crate::utils::measure_time;
use indicatif::ProgressBar;
use std::fs;
use tracing::{error, info};

use super::progress_bar;

fn run_size(config: &BenchConfig, layout: &Layout, size: usize) -> Result<SizeTiming> {
    let seed = config.seed.wrapping_add(size as u64);
    let a = generate_square(size, seed, config.min_value, config.max_value)?;
    let b = generate_square(
        size,
        seed.wrapping_add(SECOND_OPERAND_SEED_OFFSET),
        config.min_value,
        config.max_value,
    )?;

    write_to_file(&a, layout.sequential_operand("A", size))?;
    write_to_file(&b, layout.sequential_operand("B", size))?;

    let (c, elapsed) = measure_time(|| cpu_matrix_multiply(&a, &b));
    write_to_file(&c?, layout.sequential_result(size))?;

    Ok(SizeTiming { size, elapsed })
}

/// Прогоняет все размеры; ошибка одного размера логируется и не прерывает прогон
pub fn run_sequential(config: &BenchConfig) -> Result<Vec<SizeTiming>> {
    let layout = Layout::new(&config.output_dir);
    fs::create_dir_all(layout.root()).map_err(|e| MatrixError::io(layout.root(), e))?;

    let sizes = &config.sizes.sequential;
    let pb: ProgressBar = progress_bar(sizes.len() as u64);
    let mut timings = Vec::with_capacity(sizes.len());

    for &size in sizes {
        pb.set_message(format!("{}x{}", size, size));
        match run_size(config, &layout, size) {
            Ok(timing) => {
                info!("Размер {}x{}: {} мс", size, size, timing.elapsed.as_millis());
                timings.push(timing);
            }
            Err(e) => error!(size, "ошибка: {}", e),
        }
        pb.inc(1);
    }
    pb.finish_with_message("Обработка завершена");

    let rows: Vec<(usize, u128)> = timings
        .iter()
        .map(|t| (t.size, t.elapsed.as_millis()))
        .collect();
    write_sequential_report(layout.sequential_report(), &rows)?;
    Ok(timings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SizeLists;
    use crate::matrix::read_from_file;

    #[test]
    fn writes_operands_results_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let config = BenchConfig {
            output_dir: dir.path().to_path_buf(),
            sizes: SizeLists::uniform(vec![3, 8]),
            ..BenchConfig::default()
        };

        let timings = run_sequential(&config).unwrap();
        assert_eq!(timings.iter().map(|t| t.size).collect::<Vec<_>>(), vec![3, 8]);

        let layout = Layout::new(dir.path());
        let a = read_from_file(layout.sequential_operand("A", 8)).unwrap();
        let b = read_from_file(layout.sequential_operand("B", 8)).unwrap();
        let c = read_from_file(layout.sequential_result(8)).unwrap();
        assert_eq!(cpu_matrix_multiply(&a, &b).unwrap(), c);

        let report = fs::read_to_string(layout.sequential_report()).unwrap();
        assert_eq!(report.lines().count(), 3);
    }
}
