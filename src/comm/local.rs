//! Транспорт внутри одного процесса: каждый ранг — отдельный поток ОС
//!
//! Ранги не разделяют изменяемого состояния, всё общение идёт через каналы
//! tokio, по одному на тройку (отправитель, получатель, тег).

use super::{accumulate_wrapping, Communicator, Tag};
use crate::error::{MatrixError, Result};
use std::collections::HashMap;
use std::sync::Mutex;
use std::thread;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error};

type Message = Vec<i32>;

/// Конечная точка ранга во внутрипроцессной группе
pub struct LocalComm {
    rank: usize,
    size: usize,
    senders: HashMap<(usize, Tag), UnboundedSender<Message>>,
    receivers: HashMap<(usize, Tag), Mutex<UnboundedReceiver<Message>>>,
}

impl LocalComm {
    /// Создаёт связанную группу из `size` конечных точек, индекс в векторе равен рангу
    pub fn group(size: usize) -> Result<Vec<LocalComm>> {
        if size == 0 {
            return Err(MatrixError::Comm("process group must not be empty".into()));
        }

        let mut comms: Vec<LocalComm> = (0..size)
            .map(|rank| LocalComm {
                rank,
                size,
                senders: HashMap::new(),
                receivers: HashMap::new(),
            })
            .collect();

        for source in 0..size {
            for dest in 0..size {
                for tag in Tag::ALL {
                    let (tx, rx) = unbounded_channel();
                    comms[source].senders.insert((dest, tag), tx);
                    comms[dest].receivers.insert((source, tag), Mutex::new(rx));
                }
            }
        }

        Ok(comms)
    }

    fn check_peer(&self, peer: usize) -> Result<()> {
        if peer >= self.size {
            return Err(MatrixError::Comm(format!(
                "rank {} is outside the group of {} processes",
                peer, self.size
            )));
        }
        Ok(())
    }
}

impl Communicator for LocalComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn send(&self, dest: usize, tag: Tag, data: &[i32]) -> Result<()> {
        self.check_peer(dest)?;
        let sender = self
            .senders
            .get(&(dest, tag))
            .ok_or_else(|| MatrixError::Comm(format!("no channel to rank {} for {:?}", dest, tag)))?;
        sender.send(data.to_vec()).map_err(|_| {
            MatrixError::Comm(format!(
                "rank {} hung up before receiving {:?} from rank {}",
                dest, tag, self.rank
            ))
        })
    }

    fn receive_into(&self, source: usize, tag: Tag, buf: &mut [i32]) -> Result<()> {
        self.check_peer(source)?;
        let receiver = self.receivers.get(&(source, tag)).ok_or_else(|| {
            MatrixError::Comm(format!("no channel from rank {} for {:?}", source, tag))
        })?;
        let message = receiver
            .lock()
            .map_err(|_| MatrixError::Comm("receiver lock poisoned".into()))?
            .blocking_recv()
            .ok_or_else(|| {
                MatrixError::Comm(format!(
                    "rank {} hung up before sending {:?} to rank {}",
                    source, tag, self.rank
                ))
            })?;

        if message.len() != buf.len() {
            return Err(MatrixError::Comm(format!(
                "{:?} from rank {}: expected {} values, received {}",
                tag,
                source,
                buf.len(),
                message.len()
            )));
        }
        buf.copy_from_slice(&message);
        Ok(())
    }

    fn reduce_sum(&self, root: usize, local: &[i32]) -> Result<Option<Vec<i32>>> {
        self.check_peer(root)?;
        if self.rank != root {
            self.send(root, Tag::Reduce, local)?;
            return Ok(None);
        }

        let mut total = local.to_vec();
        let mut incoming = vec![0i32; local.len()];
        for source in (0..self.size).filter(|&r| r != root) {
            self.receive_into(source, Tag::Reduce, &mut incoming)?;
            accumulate_wrapping(&mut total, &incoming);
        }
        Ok(Some(total))
    }

    /// Все ранги отмечаются у корня, корень отпускает их после последней отметки.
    /// Если ранг завершился раньше, барьер возвращает ошибку вместо зависания.
    fn barrier(&self) -> Result<()> {
        let root = super::ROOT_RANK;
        if self.rank != root {
            self.send(root, Tag::Barrier, &[])?;
            return self.receive_into(root, Tag::Barrier, &mut []);
        }
        for peer in (0..self.size).filter(|&r| r != root) {
            self.receive_into(peer, Tag::Barrier, &mut [])?;
        }
        for peer in (0..self.size).filter(|&r| r != root) {
            self.send(peer, Tag::Barrier, &[])?;
        }
        Ok(())
    }
}

/// Запускает `f` на каждом ранге группы из `size` потоков и возвращает результаты по рангам
pub fn run_local<T, F>(size: usize, f: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(LocalComm) -> T + Sync,
{
    let comms = LocalComm::group(size)?;
    debug!(processes = size, "запуск внутрипроцессной группы");

    thread::scope(|scope| {
        let handles: Vec<_> = comms
            .into_iter()
            .map(|comm| {
                let f = &f;
                scope.spawn(move || f(comm))
            })
            .collect();

        handles
            .into_iter()
            .enumerate()
            .map(|(rank, handle)| {
                handle.join().map_err(|_| {
                    error!(rank, "ранг аварийно завершился");
                    MatrixError::Comm(format!("rank {} panicked", rank))
                })
            })
            .collect()
    })
}
