//! Многопоточный бенчмарк: несколько повторов на размер для каждого числа потоков

use crate::config::BenchConfig;
use crate::error::{MatrixError, Result};
use crate::layout::Layout;
use crate::matrix::{
    generate::SECOND_OPERAND_SEED_OFFSET, generate_square, parallel_matrix_multiply, write_to_file, Matrix,
};
use crate::report::{summary_table, write_summary, write_thread_report, ThreadReportRow};
use crate::utils::measure_time;
use std::collections::BTreeMap;
use std::fs;
use tracing::{error, info, warn};

use super::progress_bar;

/// Средние времена по парам (потоки, размер)
pub type Averages = BTreeMap<(usize, usize), f64>;

fn persist_trial(
    layout: &Layout,
    threads: usize,
    size: usize,
    trial: usize,
    a: &Matrix,
    b: &Matrix,
    c: &Matrix,
) -> Result<()> {
    let dir = layout.threaded_size_dir(threads, size);
    fs::create_dir_all(&dir).map_err(|e| MatrixError::io(&dir, e))?;
    write_to_file(a, layout.threaded_matrix(threads, size, "A", trial))?;
    write_to_file(b, layout.threaded_matrix(threads, size, "B", trial))?;
    write_to_file(c, layout.threaded_matrix(threads, size, "C", trial))
}

/// Все повторы одного размера; возвращает время каждого удачного повтора в мс
fn run_size(config: &BenchConfig, layout: &Layout, threads: usize, size: usize) -> Result<Vec<u128>> {
    let operands = (1..=config.trials)
        .map(|trial| {
            let seed = config.seed.wrapping_add(trial as u64);
            Ok((
                generate_square(size, seed, config.min_value, config.max_value)?,
                generate_square(
                    size,
                    seed.wrapping_add(SECOND_OPERAND_SEED_OFFSET),
                    config.min_value,
                    config.max_value,
                )?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut times = Vec::with_capacity(config.trials);
    for (trial, (a, b)) in (1..).zip(&operands) {
        let (c, elapsed) = measure_time(|| parallel_matrix_multiply(a, b, threads));
        let outcome = c.and_then(|c| persist_trial(layout, threads, size, trial, a, b, &c));
        match outcome {
            Ok(()) => times.push(elapsed.as_millis()),
            Err(e) => error!(trial, size, threads, "ошибка в повторе: {}", e),
        }
    }
    Ok(times)
}

fn summarize(size: usize, times: &[u128], trials: usize, base: Option<f64>) -> Option<ThreadReportRow> {
    let min_ms = *times.iter().min()?;
    let max_ms = *times.iter().max()?;
    // Среднее считается по числу повторов, как и в исходных отчётах
    let avg_ms = times.iter().sum::<u128>() as f64 / trials as f64;
    let speedup = match base {
        Some(base) if avg_ms > 0.0 => base / avg_ms,
        _ => 1.0,
    };
    Some(ThreadReportRow {
        size,
        avg_ms,
        min_ms,
        max_ms,
        speedup,
    })
}

/// Прогон для всех чисел потоков с отчётом на каждое и сводной таблицей
pub fn run_threaded(config: &BenchConfig) -> Result<Averages> {
    let layout = Layout::new(&config.output_dir);
    let sizes = &config.sizes.threaded;
    let mut averages = Averages::new();
    let base_threads = config.thread_counts.first().copied();

    for &threads in &config.thread_counts {
        info!("Тестирование на {} потоках...", threads);
        let pb = progress_bar(sizes.len() as u64);
        let mut rows = Vec::with_capacity(sizes.len());

        for &size in sizes {
            pb.set_message(format!("{} потоков, {}x{}", threads, size, size));
            let times = match run_size(config, &layout, threads, size) {
                Ok(times) => times,
                Err(e) => {
                    error!(size, threads, "ошибка: {}", e);
                    Vec::new()
                }
            };

            // Ускорение относительно первого числа потоков в списке
            let base = base_threads
                .filter(|&t| t != threads)
                .and_then(|t| averages.get(&(t, size)).copied());
            match summarize(size, &times, config.trials, base) {
                Some(row) => {
                    averages.insert((threads, size), row.avg_ms);
                    rows.push(row);
                }
                None => warn!(size, threads, "нет удачных повторов"),
            }
            pb.inc(1);
        }
        pb.finish_with_message(format!("{} потоков: готово", threads));

        write_thread_report(layout.thread_report(threads), &rows)?;
    }

    let table = summary_table(sizes, &config.thread_counts, &averages);
    write_summary(layout.summary_report(), &table)?;
    table.printstd();
    info!(
        "Все тесты завершены, результаты в {}",
        layout.root().display()
    );
    Ok(averages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SizeLists;
    use crate::matrix::{cpu_matrix_multiply, read_from_file};

    #[test]
    fn summary_of_trials() {
        let row = summarize(100, &[10, 20, 30], 3, Some(40.0)).unwrap();
        assert_eq!(row.avg_ms, 20.0);
        assert_eq!((row.min_ms, row.max_ms), (10, 30));
        assert_eq!(row.speedup, 2.0);
        assert!(summarize(100, &[], 3, None).is_none());
    }

    #[test]
    fn writes_every_trial_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let config = BenchConfig {
            output_dir: dir.path().to_path_buf(),
            sizes: SizeLists::uniform(vec![4, 9]),
            thread_counts: vec![1, 2],
            trials: 2,
            ..BenchConfig::default()
        };

        let averages = run_threaded(&config).unwrap();
        assert_eq!(averages.len(), 4);

        let layout = Layout::new(dir.path());
        for threads in [1, 2] {
            for trial in 1..=2 {
                let a = read_from_file(layout.threaded_matrix(threads, 9, "A", trial)).unwrap();
                let b = read_from_file(layout.threaded_matrix(threads, 9, "B", trial)).unwrap();
                let c = read_from_file(layout.threaded_matrix(threads, 9, "C", trial)).unwrap();
                assert_eq!(cpu_matrix_multiply(&a, &b).unwrap(), c);
            }
            assert!(layout.thread_report(threads).exists());
        }
        assert!(layout.summary_report().exists());
    }

    #[test]
    fn verifier_accepts_every_threaded_trial() {
        use crate::bench::verify::{verify, VerifyMode, VerifyStatus};

        let dir = tempfile::tempdir().unwrap();
        let config = BenchConfig {
            output_dir: dir.path().to_path_buf(),
            sizes: SizeLists::uniform(vec![5, 8]),
            thread_counts: vec![1, 3],
            trials: 2,
            ..BenchConfig::default()
        };
        run_threaded(&config).unwrap();

        let outcomes = verify(&config, VerifyMode::Threaded).unwrap();
        assert_eq!(outcomes.len(), 2 * 2 * 2);
        assert!(outcomes.iter().all(|o| o.is_ok()));

        let layout = Layout::new(dir.path());
        let path = layout.threaded_matrix(3, 8, "C", 2);
        let mut c = read_from_file(&path).unwrap();
        let v = c.get(0, 0);
        c.set(0, 0, v.wrapping_sub(4));
        write_to_file(&c, &path).unwrap();

        let outcomes = verify(&config, VerifyMode::Threaded).unwrap();
        let failed: Vec<_> = outcomes.iter().filter(|o| !o.is_ok()).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].label, "3 threads size 8 trial 2");
        assert!(matches!(failed[0].status, VerifyStatus::Mismatch(_)));
    }
}
