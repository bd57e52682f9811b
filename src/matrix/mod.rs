//! Модуль для работы с матрицами
//!
//! Предоставляет:
//! - Типы матриц
//! - Генерацию операндов
//! - Последовательные и многопоточные операции
//! - Текстовый формат хранения

mod types;
pub mod generate;
pub mod io;
pub mod operations;
pub mod parallel;

pub use generate::{generate_matrix, generate_square, initialize_matrices};
pub use io::{read_from_file, write_to_file};
pub use operations::{compare_results, cpu_matrix_multiply, multiply_rows_into, transpose, Comparison};
pub use parallel::parallel_matrix_multiply;
pub use types::{Matrix, MatrixType};
