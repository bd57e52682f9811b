//! Запуск бенчмарков умножения матриц

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use parallel_matrix::{
    bench::{self, VerifyMode},
    comm::run_local,
    distributed::run_distributed,
    matrix::{compare_results, cpu_matrix_multiply, initialize_matrices, parallel_matrix_multiply},
    multiply_distributed,
    report::timings_table,
    utils::{duration_ms, init_tracing, measure_time},
    BenchConfig, Communicator, MatrixType,
};
use prettytable::{row, Table};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// JSON-файл настроек
    #[arg(long, env = "MATRIX_BENCH_CONFIG")]
    config: Option<PathBuf>,
    /// Каталог для матриц и отчётов
    #[arg(long)]
    output: Option<PathBuf>,
    /// Размеры матриц для всех режимов, через запятую
    #[arg(long, value_delimiter = ',')]
    sizes: Option<Vec<usize>>,
    #[arg(long)]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Один поток, тройной цикл
    Sequential,
    /// Пул потоков для каждого числа потоков из списка
    Threaded {
        #[arg(long, value_delimiter = ',')]
        threads: Option<Vec<usize>>,
        #[arg(long)]
        trials: Option<usize>,
    },
    /// Обмен сообщениями между рангами-потоками внутри одного процесса
    Distributed {
        #[arg(long, default_value_t = 4)]
        processes: usize,
    },
    /// Проверка сохранённых результатов
    Verify {
        #[arg(value_enum)]
        mode: VerifyMode,
    },
    /// Сравнение всех трёх вариантов на одном размере
    Compare {
        #[arg(long, default_value_t = 256)]
        size: usize,
        #[arg(long, default_value_t = 4)]
        workers: usize,
        #[arg(long, value_enum, default_value_t = Fill::Random)]
        fill: Fill,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Fill {
    OnesAndTwos,
    ThreesAndFours,
    Random,
}

fn load_config(cli: &Cli) -> Result<BenchConfig> {
    let mut config = match &cli.config {
        Some(path) => BenchConfig::load(path)
            .with_context(|| format!("Не удалось загрузить настройки из {}", path.display()))?,
        None => BenchConfig::default(),
    };
    if let Some(output) = &cli.output {
        config.output_dir = output.clone();
    }
    if let Some(sizes) = &cli.sizes {
        config.sizes = parallel_matrix::config::SizeLists::uniform(sizes.clone());
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Command::Threaded { threads, trials } = &cli.command {
        if let Some(threads) = threads {
            config.thread_counts = threads.clone();
        }
        if let Some(trials) = trials {
            config.trials = *trials;
        }
    }
    config.validate().context("Некорректные настройки")?;
    Ok(config)
}

fn compare(config: &BenchConfig, size: usize, workers: usize, fill: Fill) -> Result<()> {
    let matrix_type = match fill {
        Fill::OnesAndTwos => MatrixType::OnesAndTwos,
        Fill::ThreesAndFours => MatrixType::ThreesAndFours,
        Fill::Random => MatrixType::Random { seed: config.seed },
    };
    info!("Размер матриц: {}x{}, исполнителей: {}", size, size, workers);
    let (a, b) = initialize_matrices(matrix_type, size, config.min_value, config.max_value)?;

    let (cpu, cpu_time) = measure_time(|| cpu_matrix_multiply(&a, &b));
    let cpu = cpu?;
    let (threaded, threaded_time) = measure_time(|| parallel_matrix_multiply(&a, &b, workers));
    let threaded = threaded?;
    let (distributed, distributed_time) = measure_time(|| {
        run_local(workers, |comm| {
            let rank = comm.rank();
            multiply_distributed(&comm, &a, &b, rank, workers)
        })
    });
    let distributed = distributed?
        .into_iter()
        .next()
        .context("Пустая группа процессов")??
        .context("Корень не получил результат")?;

    let mut table = Table::new();
    table.add_row(row!["Вариант", "Время (мс)", "Совпадает с последовательным"]);
    table.add_row(row!["последовательный", format!("{:.3}", duration_ms(cpu_time)), "-"]);
    table.add_row(row![
        "потоки",
        format!("{:.3}", duration_ms(threaded_time)),
        compare_results(&threaded, &cpu).matches()
    ]);
    table.add_row(row![
        "сообщения",
        format!("{:.3}", duration_ms(distributed_time)),
        compare_results(&distributed, &cpu).matches()
    ]);
    table.printstd();
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Command::Sequential => {
            let timings = bench::run_sequential(&config)?;
            info!("Обработано размеров: {}", timings.len());
        }
        Command::Threaded { .. } => {
            bench::run_threaded(&config)?;
        }
        Command::Distributed { processes } => {
            let mut per_rank = run_local(processes, |comm| run_distributed(&comm, &config))?;
            if per_rank.is_empty() {
                anyhow::bail!("Пустая группа процессов");
            }
            // Ошибки любого ранга прерывают прогон
            for result in per_rank.iter() {
                if let Err(e) = result {
                    anyhow::bail!("Распределённый прогон прерван: {}", e);
                }
            }
            let timings = per_rank.swap_remove(0)?;
            timings_table(&timings, processes).printstd();
        }
        Command::Verify { mode } => {
            let outcomes = bench::verify(&config, mode)?;
            let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
            println!("Проверено: {}, ошибок: {}", outcomes.len(), failed);
            if failed > 0 {
                anyhow::bail!("Проверка не пройдена для {} наборов", failed);
            }
        }
        Command::Compare {
            size,
            workers,
            fill,
        } => compare(&config, size, workers, fill)?,
    }
    Ok(())
}
