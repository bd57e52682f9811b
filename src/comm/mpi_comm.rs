//! Транспорт поверх MPI (feature `mpi`)
//!
//! Ошибки MPI по умолчанию фатальны для всей группы, поэтому методы
//! возвращают ошибку только при неверных аргументах.

use super::{Communicator, Tag};
use crate::error::{MatrixError, Result};
use mpi::collective::SystemOperation;
use mpi::environment::Universe;
use mpi::topology::SimpleCommunicator;
use mpi::traits::{Communicator as _, CommunicatorCollectives, Destination, Root, Source};

pub struct MpiComm {
    world: SimpleCommunicator,
    rank: usize,
    size: usize,
    // Финализирует MPI при удалении, поэтому объявлен последним
    _universe: Universe,
}

impl MpiComm {
    /// Инициализирует MPI и возвращает коммуникатор мира
    pub fn init() -> Result<Self> {
        let universe = mpi::initialize()
            .ok_or_else(|| MatrixError::Comm("MPI has already been initialized".into()))?;
        let world = universe.world();
        let rank = world.rank() as usize;
        let size = world.size() as usize;
        Ok(Self {
            world,
            rank,
            size,
            _universe: universe,
        })
    }

    fn check_peer(&self, peer: usize) -> Result<i32> {
        if peer >= self.size {
            return Err(MatrixError::Comm(format!(
                "rank {} is outside the world of {} processes",
                peer, self.size
            )));
        }
        Ok(peer as i32)
    }
}

impl Communicator for MpiComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn send(&self, dest: usize, tag: Tag, data: &[i32]) -> Result<()> {
        let dest = self.check_peer(dest)?;
        self.world
            .process_at_rank(dest)
            .send_with_tag(data, tag as i32);
        Ok(())
    }

    fn receive_into(&self, source: usize, tag: Tag, buf: &mut [i32]) -> Result<()> {
        let source = self.check_peer(source)?;
        self.world
            .process_at_rank(source)
            .receive_into_with_tag(buf, tag as i32);
        Ok(())
    }

    fn reduce_sum(&self, root: usize, local: &[i32]) -> Result<Option<Vec<i32>>> {
        let root_process = self.world.process_at_rank(self.check_peer(root)?);
        if self.rank == root {
            let mut global = vec![0i32; local.len()];
            root_process.reduce_into_root(local, &mut global[..], SystemOperation::sum());
            Ok(Some(global))
        } else {
            root_process.reduce_into(local, SystemOperation::sum());
            Ok(None)
        }
    }

    fn barrier(&self) -> Result<()> {
        self.world.barrier();
        Ok(())
    }
}
