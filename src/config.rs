//! Настройки бенчмарков

use crate::error::{MatrixError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Списки размеров для каждого режима
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SizeLists {
    pub sequential: Vec<usize>,
    pub threaded: Vec<usize>,
    pub distributed: Vec<usize>,
}

impl Default for SizeLists {
    fn default() -> Self {
        Self {
            sequential: vec![10, 50, 100, 500, 1000, 1500, 2000, 2500],
            threaded: vec![100, 500, 1000],
            distributed: (1..=10).map(|i| i * 100).collect(),
        }
    }
}

impl SizeLists {
    /// Один и тот же список для всех режимов
    pub fn uniform(sizes: Vec<usize>) -> Self {
        Self {
            sequential: sizes.clone(),
            threaded: sizes.clone(),
            distributed: sizes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Каталог для матриц и отчётов
    pub output_dir: PathBuf,
    pub seed: u64,
    pub min_value: i32,
    pub max_value: i32,
    /// Повторов на размер в многопоточном режиме
    pub trials: usize,
    pub thread_counts: Vec<usize>,
    pub sizes: SizeLists,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            seed: 42,
            min_value: -1000,
            max_value: 1000,
            trials: 5,
            thread_counts: vec![1, 2, 4, 8],
            sizes: SizeLists::default(),
        }
    }
}

impl BenchConfig {
    /// Загружает настройки из JSON, отсутствующие поля берутся по умолчанию
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| MatrixError::io(path, e))?;
        let config: BenchConfig = serde_json::from_str(&text)
            .map_err(|e| MatrixError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let lists = [
            ("sequential", &self.sizes.sequential),
            ("threaded", &self.sizes.threaded),
            ("distributed", &self.sizes.distributed),
        ];
        for (name, sizes) in lists {
            if sizes.is_empty() {
                return Err(MatrixError::Config(format!("{} size list is empty", name)));
            }
            if sizes.contains(&0) {
                return Err(MatrixError::Config(format!("{} size list contains 0", name)));
            }
        }
        if self.thread_counts.is_empty() || self.thread_counts.contains(&0) {
            return Err(MatrixError::Config(
                "thread counts must be a non-empty list of positive numbers".into(),
            ));
        }
        if self.trials == 0 {
            return Err(MatrixError::Config("trials must be positive".into()));
        }
        if self.min_value > self.max_value {
            return Err(MatrixError::Config(format!(
                "min_value {} is greater than max_value {}",
                self.min_value, self.max_value
            )));
        }
        Ok(())
    }
}
