//! Бенчмарки общей памяти и проверка результатов
//!
//! Распределённый прогон находится в `distributed::pipeline`.

pub mod sequential;
pub mod threaded;
pub mod verify;

pub use sequential::run_sequential;
pub use threaded::{run_threaded, Averages};
pub use verify::{reference_product, verify, VerifyMode, VerifyOutcome, VerifyStatus};

use indicatif::{ProgressBar, ProgressStyle};

/// Прогресс-бар по списку размеров
pub(crate) fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}
