//! Проверка сохранённых результатов независимым умножением через ndarray

use crate::config::BenchConfig;
use crate::error::{MatrixError, Result};
use crate::layout::Layout;
use crate::matrix::{compare_results, read_from_file, Comparison, Matrix};
use ndarray::Array2;
use std::fmt;
use std::fs;
use std::num::Wrapping;
use std::path::PathBuf;
use tracing::{info, warn};

/// Какие файлы проверять
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum VerifyMode {
    Sequential,
    Threaded,
    Distributed,
}

/// Эталонное произведение через ndarray; суммы берутся по модулю 2^32, как в ядрах
pub fn reference_product(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    if a.cols() != b.rows() {
        return Err(MatrixError::DimensionMismatch {
            left_rows: a.rows(),
            left_cols: a.cols(),
            right_rows: b.rows(),
            right_cols: b.cols(),
        });
    }
    let wrapping = |m: &Matrix| -> Array2<Wrapping<i32>> { m.to_array().mapv(Wrapping) };
    let product = wrapping(a).dot(&wrapping(b));
    Ok(Matrix::from_array(&product.mapv(|v| v.0)))
}

#[derive(Debug, Clone, PartialEq)]
pub enum VerifyStatus {
    Ok,
    Mismatch(Comparison),
    Error(String),
}

/// Итог проверки одного набора файлов
#[derive(Debug, Clone, PartialEq)]
pub struct VerifyOutcome {
    pub label: String,
    pub status: VerifyStatus,
}

impl VerifyOutcome {
    pub fn is_ok(&self) -> bool {
        self.status == VerifyStatus::Ok
    }
}

impl fmt::Display for VerifyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            VerifyStatus::Ok => write!(f, "[OK] {}", self.label),
            VerifyStatus::Mismatch(cmp) => write!(
                f,
                "[FAIL] {} - mismatch detected\n        Mismatched elements: {}\n        Max difference: {}",
                self.label, cmp.diff_count, cmp.max_diff
            ),
            VerifyStatus::Error(e) => write!(f, "[ERROR] {} - {}", self.label, e),
        }
    }
}

fn check_files(a: PathBuf, b: PathBuf, c: PathBuf) -> Result<Comparison> {
    let a = read_from_file(a)?;
    let b = read_from_file(b)?;
    let c = read_from_file(c)?;
    let expected = reference_product(&a, &b)?;
    Ok(compare_results(&c, &expected))
}

fn outcome(label: String, files: (PathBuf, PathBuf, PathBuf)) -> VerifyOutcome {
    let status = match check_files(files.0, files.1, files.2) {
        Ok(cmp) if cmp.matches() => VerifyStatus::Ok,
        Ok(cmp) => VerifyStatus::Mismatch(cmp),
        Err(e) => VerifyStatus::Error(e.to_string()),
    };
    VerifyOutcome { label, status }
}

/// Проверяет все результаты режима `mode` и пишет отчёт проверки
pub fn verify(config: &BenchConfig, mode: VerifyMode) -> Result<Vec<VerifyOutcome>> {
    let layout = Layout::new(&config.output_dir);
    let mut outcomes = Vec::new();

    match mode {
        VerifyMode::Distributed => {
            for &size in &config.sizes.distributed {
                outcomes.push(outcome(
                    format!("size {}", size),
                    (
                        layout.distributed_operand(1, size),
                        layout.distributed_operand(2, size),
                        layout.distributed_result(size),
                    ),
                ));
            }
        }
        VerifyMode::Sequential => {
            for &size in &config.sizes.sequential {
                outcomes.push(outcome(
                    format!("size {}", size),
                    (
                        layout.sequential_operand("A", size),
                        layout.sequential_operand("B", size),
                        layout.sequential_result(size),
                    ),
                ));
            }
        }
        VerifyMode::Threaded => {
            for &threads in &config.thread_counts {
                for &size in &config.sizes.threaded {
                    for trial in 1..=config.trials {
                        outcomes.push(outcome(
                            format!("{} threads size {} trial {}", threads, size, trial),
                            (
                                layout.threaded_matrix(threads, size, "A", trial),
                                layout.threaded_matrix(threads, size, "B", trial),
                                layout.threaded_matrix(threads, size, "C", trial),
                            ),
                        ));
                    }
                }
            }
        }
    }

    for o in &outcomes {
        if o.is_ok() {
            info!("Проверка {} успешна: результаты совпадают", o.label);
        } else {
            warn!("Проверка {} не пройдена", o.label);
        }
    }

    fs::create_dir_all(layout.root()).map_err(|e| MatrixError::io(layout.root(), e))?;
    let path = layout.verification_report();
    let text: Vec<String> = outcomes.iter().map(ToString::to_string).collect();
    fs::write(&path, text.join("\n")).map_err(|e| MatrixError::io(&path, e))?;
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{cpu_matrix_multiply, generate_square, write_to_file};

    #[test]
    fn reference_agrees_with_wrapping_kernel() {
        let a = Matrix::from_rows(vec![vec![i32::MAX, 3], vec![-7, i32::MIN]]).unwrap();
        let b = Matrix::from_rows(vec![vec![5, i32::MAX], vec![11, -2]]).unwrap();
        assert_eq!(
            reference_product(&a, &b).unwrap(),
            cpu_matrix_multiply(&a, &b).unwrap()
        );
    }

    #[test]
    fn reference_wraps_on_extreme_values() {
        let a = Matrix::from_rows(vec![vec![i32::MIN, i32::MIN]]).unwrap();
        let b = Matrix::from_rows(vec![vec![i32::MIN], vec![i32::MIN]]).unwrap();
        let expected = cpu_matrix_multiply(&a, &b).unwrap();
        assert_eq!(expected.get(0, 0), 0);
        assert_eq!(reference_product(&a, &b).unwrap(), expected);

        let a = generate_square(12, 3, i32::MIN, i32::MAX).unwrap();
        let b = generate_square(12, 4, i32::MIN, i32::MAX).unwrap();
        assert_eq!(
            reference_product(&a, &b).unwrap(),
            cpu_matrix_multiply(&a, &b).unwrap()
        );
    }

    #[test]
    fn detects_corrupted_result() {
        let dir = tempfile::tempdir().unwrap();
        let config = BenchConfig {
            output_dir: dir.path().to_path_buf(),
            sizes: crate::config::SizeLists::uniform(vec![6, 7]),
            ..BenchConfig::default()
        };
        let layout = Layout::new(dir.path());

        for size in [6, 7] {
            let a = generate_square(size, 1, -1000, 1000).unwrap();
            let b = generate_square(size, 2, -1000, 1000).unwrap();
            let mut c = cpu_matrix_multiply(&a, &b).unwrap();
            if size == 7 {
                let v = c.get(3, 3);
                c.set(3, 3, v + 5);
            }
            write_to_file(&a, layout.distributed_operand(1, size)).unwrap();
            write_to_file(&b, layout.distributed_operand(2, size)).unwrap();
            write_to_file(&c, layout.distributed_result(size)).unwrap();
        }

        let outcomes = verify(&config, VerifyMode::Distributed).unwrap();
        assert!(outcomes[0].is_ok());
        assert_eq!(
            outcomes[1].status,
            VerifyStatus::Mismatch(Comparison { diff_count: 1, max_diff: 5 })
        );
        let report = fs::read_to_string(layout.verification_report()).unwrap();
        assert!(report.starts_with("[OK] size 6"));
        assert!(report.contains("[FAIL] size 7"));
    }

    #[test]
    fn missing_files_are_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = BenchConfig {
            output_dir: dir.path().to_path_buf(),
            sizes: crate::config::SizeLists::uniform(vec![3]),
            ..BenchConfig::default()
        };
        let outcomes = verify(&config, VerifyMode::Sequential).unwrap();
        assert!(matches!(outcomes[0].status, VerifyStatus::Error(_)));
    }
}
