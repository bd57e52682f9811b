//! Текстовый формат матриц: строка файла на строку матрицы, значения через пробел

use super::types::Matrix;
use crate::error::{MatrixError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Записывает матрицу в файл, каждое значение завершается пробелом
pub fn write_to_file(matrix: &Matrix, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| MatrixError::io(path, e))?;
    let mut out = BufWriter::new(file);

    for row in matrix.iter_rows() {
        for value in row {
            write!(out, "{} ", value).map_err(|e| MatrixError::io(path, e))?;
        }
        writeln!(out).map_err(|e| MatrixError::io(path, e))?;
    }
    out.flush().map_err(|e| MatrixError::io(path, e))
}

/// Читает матрицу из файла, пустые строки пропускаются
pub fn read_from_file(path: impl AsRef<Path>) -> Result<Matrix> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| MatrixError::io(path, e))?;
    let reader = BufReader::new(file);

    let mut rows: Vec<Vec<i32>> = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| MatrixError::io(path, e))?;
        let row = line
            .split_whitespace()
            .map(|token| {
                token.parse::<i32>().map_err(|e| MatrixError::Parse {
                    path: path.to_path_buf(),
                    line: index + 1,
                    reason: format!("{:?}: {}", token, e),
                })
            })
            .collect::<Result<Vec<i32>>>()?;

        if row.is_empty() {
            continue;
        }
        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(MatrixError::Parse {
                    path: path.to_path_buf(),
                    line: index + 1,
                    reason: format!("expected {} values, found {}", first.len(), row.len()),
                });
            }
        }
        rows.push(row);
    }

    Matrix::from_rows(rows)
}
