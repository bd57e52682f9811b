//! Обмен сообщениями между процессами
//!
//! Содержит интерфейс транспорта и его реализации:
//! - `local` — процессы как потоки ОС с каналом на каждую пару (источник, тег)
//! - `mpi_comm` — мир MPI (feature `mpi`)

pub mod local;
#[cfg(feature = "mpi")]
pub mod mpi_comm;

use crate::error::Result;

pub use local::{run_local, LocalComm};
#[cfg(feature = "mpi")]
pub use mpi_comm::MpiComm;

/// Ранг, на котором собираются операнды и результат
pub const ROOT_RANK: usize = 0;

/// Логический канал сообщения
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Tag {
    Size = 0,
    RowA = 1,
    RowB = 2,
    Reduce = 3,
    Barrier = 4,
}

impl Tag {
    pub const ALL: [Tag; 5] = [Tag::Size, Tag::RowA, Tag::RowB, Tag::Reduce, Tag::Barrier];
}

/// Блокирующий транспорт сообщений группы процессов.
///
/// Сообщения между парой рангов с одним тегом доставляются в порядке отправки.
/// Таймаутов нет: приём ждёт, пока не придёт сообщение от `source` с тегом `tag`.
pub trait Communicator {
    fn rank(&self) -> usize;

    fn size(&self) -> usize;

    fn send(&self, dest: usize, tag: Tag, data: &[i32]) -> Result<()>;

    /// Принимает сообщение ровно длины `buf.len()`
    fn receive_into(&self, source: usize, tag: Tag, buf: &mut [i32]) -> Result<()>;

    /// Коллективная поэлементная сумма буферов всех рангов.
    /// Результат получает только `root`, остальные получают `None`.
    fn reduce_sum(&self, root: usize, local: &[i32]) -> Result<Option<Vec<i32>>>;

    fn barrier(&self) -> Result<()>;
}

/// Поэлементное сложение с переполнением по модулю 2^32
pub fn accumulate_wrapping(acc: &mut [i32], other: &[i32]) {
    for (a, &b) in acc.iter_mut().zip(other) {
        *a = a.wrapping_add(b);
    }
}
