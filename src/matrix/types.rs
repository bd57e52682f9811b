//! Типы матриц и связанные структуры

use crate::error::{MatrixError, Result};
use ndarray::Array2;

/// Способ заполнения операндов
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatrixType {
    /// Матрицы заполненные 1 и 2
    OnesAndTwos,
    /// Матрицы заполненные 3 и 4
    ThreesAndFours,
    /// Случайно заполненные матрицы с заданным зерном
    Random { seed: u64 },
}

/// Плотная целочисленная матрица, хранимая построчно в одном буфере
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<i32>,
}

impl Matrix {
    /// Нулевая матрица rows x cols
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    /// Матрица из плоского буфера; длина буфера должна быть rows * cols
    pub fn from_vec(rows: usize, cols: usize, data: Vec<i32>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(MatrixError::BufferLength {
                expected: rows * cols,
                found: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Матрица из вектора строк; все строки обязаны иметь одинаковую длину
    pub fn from_rows(rows: Vec<Vec<i32>>) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != n_cols {
                return Err(MatrixError::RaggedRows {
                    row: index,
                    expected: n_cols,
                    found: row.len(),
                });
            }
            data.extend(row);
        }
        Ok(Self {
            rows: n_rows,
            cols: n_cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> i32 {
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: i32) {
        self.data[row * self.cols + col] = value;
    }

    pub fn row(&self, row: usize) -> &[i32] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [i32] {
        &mut self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[i32]> {
        // chunks_exact(0) паникует, у пустой по ширине матрицы строк нет
        self.data.chunks_exact(self.cols.max(1)).take(self.rows)
    }

    /// Плоский построчный буфер
    pub fn as_slice(&self) -> &[i32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [i32] {
        &mut self.data
    }

    /// Копия в ndarray для независимой проверки
    pub fn to_array(&self) -> Array2<i32> {
        Array2::from_shape_fn((self.rows, self.cols), |(i, j)| self.get(i, j))
    }

    pub fn from_array(array: &Array2<i32>) -> Self {
        let (rows, cols) = array.dim();
        Self {
            rows,
            cols,
            data: array.iter().copied().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_contiguous_slices() {
        let m = Matrix::from_vec(2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(m.row(1), &[4, 5, 6]);
        assert_eq!(m.iter_rows().count(), 2);
        assert_eq!(m.get(0, 2), 3);
    }

    #[test]
    fn rejects_wrong_buffer_length() {
        assert!(matches!(
            Matrix::from_vec(2, 2, vec![1, 2, 3]),
            Err(MatrixError::BufferLength { expected: 4, found: 3 })
        ));
    }

    #[test]
    fn rejects_ragged_rows() {
        assert!(matches!(
            Matrix::from_rows(vec![vec![1, 2], vec![3]]),
            Err(MatrixError::RaggedRows { row: 1, .. })
        ));
    }

    #[test]
    fn ndarray_conversion_keeps_layout() {
        let m = Matrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        let array = m.to_array();
        assert_eq!(array[[1, 0]], 4);
        assert_eq!(Matrix::from_array(&array), m);
    }
}
