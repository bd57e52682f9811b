//! Распределённый бенчмарк поверх MPI
//!
//! Запуск: `mpirun -n 4 mpi_multiply --config bench.json`

use anyhow::{Context, Result};
use clap::Parser;
use parallel_matrix::{
    comm::MpiComm, distributed::run_distributed, report::timings_table, utils::init_tracing,
    BenchConfig, Communicator, ROOT_RANK,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(version, about = "Умножение матриц обменом сообщениями MPI")]
struct Args {
    /// JSON-файл настроек, одинаковый для всех рангов
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    output: Option<PathBuf>,
    /// Размеры матриц через запятую
    #[arg(long, value_delimiter = ',')]
    sizes: Option<Vec<usize>>,
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    /// Настройки из файла с переопределениями из командной строки
    fn into_config(self) -> Result<BenchConfig> {
        let mut config = match &self.config {
            Some(path) => BenchConfig::load(path)
                .with_context(|| format!("Не удалось загрузить настройки из {}", path.display()))?,
            None => BenchConfig::default(),
        };
        if let Some(output) = self.output {
            config.output_dir = output;
        }
        if let Some(sizes) = self.sizes {
            config.sizes.distributed = sizes;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        config.validate().context("Некорректные настройки")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    init_tracing();
    let config = Args::parse().into_config()?;

    let comm = MpiComm::init()?;
    if comm.rank() == ROOT_RANK {
        info!("Процессов: {}", comm.size());
    }

    let timings = run_distributed(&comm, &config)?;
    if comm.rank() == ROOT_RANK {
        timings_table(&timings, comm.size()).printstd();
    }
    Ok(())
}
