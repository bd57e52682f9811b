//! Запись замеров времени и сводных отчётов

use crate::error::{MatrixError, Result};
use crate::utils::duration_ms;
use prettytable::{format, row, Cell, Row, Table};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

/// Замер одного размера
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeTiming {
    pub size: usize,
    pub elapsed: Duration,
}

impl SizeTiming {
    pub fn millis(&self) -> f64 {
        duration_ms(self.elapsed)
    }
}

/// Строка отчёта для одного числа потоков
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreadReportRow {
    pub size: usize,
    pub avg_ms: f64,
    pub min_ms: u128,
    pub max_ms: u128,
    pub speedup: f64,
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| MatrixError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| MatrixError::io(path, e))?;
    Ok(BufWriter::new(file))
}

fn write_lines<I>(path: &Path, lines: I) -> Result<()>
where
    I: IntoIterator<Item = String>,
{
    let mut out = create(path)?;
    for line in lines {
        writeln!(out, "{}", line).map_err(|e| MatrixError::io(path, e))?;
    }
    out.flush().map_err(|e| MatrixError::io(path, e))
}

/// Файл статистики распределённого режима: `<size>: <ms> ms`
pub fn write_stats(path: impl AsRef<Path>, timings: &[SizeTiming]) -> Result<()> {
    write_lines(
        path.as_ref(),
        timings
            .iter()
            .map(|t| format!("{}: {:.3} ms", t.size, t.millis())),
    )
}

/// Читает файл статистики; строки без двоеточия пропускаются
pub fn read_stats(path: impl AsRef<Path>) -> Result<Vec<(usize, f64)>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| MatrixError::io(path, e))?;

    let mut stats = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| MatrixError::io(path, e))?;
        let Some((size, time)) = line.split_once(':') else {
            continue;
        };
        let parse_error = |reason: String| MatrixError::Parse {
            path: path.to_path_buf(),
            line: index + 1,
            reason,
        };
        let size = size
            .trim()
            .parse::<usize>()
            .map_err(|e| parse_error(e.to_string()))?;
        let time = time
            .trim()
            .trim_end_matches("ms")
            .trim()
            .parse::<f64>()
            .map_err(|e| parse_error(e.to_string()))?;
        stats.push((size, time));
    }
    Ok(stats)
}

/// Отчёт последовательного режима
pub fn write_sequential_report(path: impl AsRef<Path>, rows: &[(usize, u128)]) -> Result<()> {
    let header = std::iter::once("Matrix Size | Execution Time (ms)".to_string());
    let body = rows
        .iter()
        .map(|(size, ms)| format!("{:>6} | {:>6}", size, ms));
    write_lines(path.as_ref(), header.chain(body))
}

/// Отчёт для одного числа потоков
pub fn write_thread_report(path: impl AsRef<Path>, rows: &[ThreadReportRow]) -> Result<()> {
    let header = [
        "Matrix Size | Average Time (ms) | Min Time | Max Time | Speedup".to_string(),
        "-".repeat(64),
    ];
    let body = rows.iter().map(|r| {
        format!(
            "{:>10} | {:>12.2} | {:>8} | {:>8} | {:>7.2}",
            r.size, r.avg_ms, r.min_ms, r.max_ms, r.speedup
        )
    });
    write_lines(path.as_ref(), header.into_iter().chain(body))
}

/// Сводная таблица средних времён: строки — размеры, столбцы — числа потоков.
///
/// `averages` индексируется парой (потоки, размер). Последний столбец —
/// ускорение последнего числа потоков относительно первого.
pub fn summary_table(
    sizes: &[usize],
    thread_counts: &[usize],
    averages: &BTreeMap<(usize, usize), f64>,
) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);

    let mut title = vec![Cell::new("Matrix Size")];
    title.extend(thread_counts.iter().map(|t| Cell::new(&format!("{} threads", t))));
    if let (Some(first), Some(last)) = (thread_counts.first(), thread_counts.last()) {
        title.push(Cell::new(&format!("Speedup ({} vs {})", last, first)));
    }
    table.set_titles(Row::new(title));

    for &size in sizes {
        let times: Vec<Option<f64>> = thread_counts
            .iter()
            .map(|&t| averages.get(&(t, size)).copied())
            .collect();

        let mut cells = vec![Cell::new(&size.to_string())];
        cells.extend(times.iter().map(|time| match time {
            Some(ms) => Cell::new(&format!("{:.2}", ms)),
            None => Cell::new("-"),
        }));
        let speedup = match (times.first(), times.last()) {
            (Some(Some(base)), Some(Some(last))) if *last > 0.0 => format!("{:.2}", base / last),
            _ => "-".to_string(),
        };
        cells.push(Cell::new(&speedup));
        table.add_row(Row::new(cells));
    }
    table
}

/// Сохраняет сводную таблицу в файл
pub fn write_summary(path: impl AsRef<Path>, table: &Table) -> Result<()> {
    let path = path.as_ref();
    let mut out = create(path)?;
    writeln!(out, "Performance Comparison (Average Time in ms)").map_err(|e| MatrixError::io(path, e))?;
    table.print(&mut out).map_err(|e| MatrixError::io(path, e))?;
    out.flush().map_err(|e| MatrixError::io(path, e))
}

/// Таблица замеров распределённого режима для вывода в консоль
pub fn timings_table(timings: &[SizeTiming], processes: usize) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(row!["Размер", "Процессов", "Время (мс)"]);
    for t in timings {
        table.add_row(row![t.size, processes, format!("{:.3}", t.millis())]);
    }
    table
}
