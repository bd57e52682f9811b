//! Имена файлов матриц и отчётов в выходном каталоге

use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // Распределённый режим

    /// `index` равен 1 для A и 2 для B
    pub fn distributed_operand(&self, index: usize, size: usize) -> PathBuf {
        self.root.join(format!("{}_{}.txt", index, size))
    }

    pub fn distributed_result(&self, size: usize) -> PathBuf {
        self.root.join(format!("result_{}.txt", size))
    }

    pub fn stats(&self) -> PathBuf {
        self.root.join("stats.txt")
    }

    // Последовательный режим

    /// `name` — "A" или "B"
    pub fn sequential_operand(&self, name: &str, size: usize) -> PathBuf {
        self.root.join(format!("matrix{}{}.txt", name, size))
    }

    pub fn sequential_result(&self, size: usize) -> PathBuf {
        self.root.join(format!("result_matrix{}.txt", size))
    }

    pub fn sequential_report(&self) -> PathBuf {
        self.root.join("report.txt")
    }

    // Многопоточный режим

    pub fn threaded_size_dir(&self, threads: usize, size: usize) -> PathBuf {
        self.root
            .join(format!("results_{}_threads", threads))
            .join(format!("size_{}", size))
    }

    /// `name` — "A", "B" или "C"
    pub fn threaded_matrix(&self, threads: usize, size: usize, name: &str, trial: usize) -> PathBuf {
        self.threaded_size_dir(threads, size)
            .join(format!("{}_{}.txt", name, trial))
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.root.join("reports")
    }

    pub fn thread_report(&self, threads: usize) -> PathBuf {
        self.reports_dir()
            .join(format!("report_{}_threads.txt", threads))
    }

    pub fn summary_report(&self) -> PathBuf {
        self.reports_dir().join("summary_report.txt")
    }

    pub fn verification_report(&self) -> PathBuf {
        self.root.join("verification_report.txt")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_follow_each_mode() {
        let layout = Layout::new("out");
        assert_eq!(layout.distributed_operand(2, 300), Path::new("out/2_300.txt"));
        assert_eq!(layout.sequential_operand("B", 50), Path::new("out/matrixB50.txt"));
        assert_eq!(
            layout.threaded_matrix(4, 100, "C", 3),
            Path::new("out/results_4_threads/size_100/C_3.txt")
        );
        assert_eq!(layout.thread_report(8), Path::new("out/reports/report_8_threads.txt"));
    }
}
