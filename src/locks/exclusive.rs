// 仅排他锁的锁管理器
//
// 读写不做区分，每个请求都按排他锁入队：
// 队列为空时立即授予，否则排在队尾等待；队首释放后下一个请求获得授予。

use super::config::LockManagerConfig;
use super::error::LockResult;
use super::ready::ReadySink;
use super::request::{LockMode, LockRequest};
use super::stats::LockStats;
use super::table::LockTable;
use super::LockManager;
use std::fmt::Debug;
use std::hash::Hash;

/// 仅排他锁的锁管理器
#[derive(Debug)]
pub struct ExclusiveLockManager<K, T, S> {
    table: LockTable<K, T, S>,
}

impl<K, T, S> ExclusiveLockManager<K, T, S>
where
    K: Eq + Hash + Clone + Debug,
    T: Copy + Eq + Hash + Debug,
    S: ReadySink<T>,
{
    /// 创建锁管理器，就绪事务追加到 ready
    pub fn new(ready: S) -> Self {
        Self {
            table: LockTable::new(ready),
        }
    }

    pub fn with_config(config: &LockManagerConfig, ready: S) -> Self {
        Self {
            table: LockTable::with_config(config, ready),
        }
    }

    pub fn table(&self) -> &LockTable<K, T, S> {
        &self.table
    }

    pub fn ready(&self) -> &S {
        self.table.ready()
    }

    pub fn ready_mut(&mut self) -> &mut S {
        self.table.ready_mut()
    }

    pub fn into_ready(self) -> S {
        self.table.into_ready()
    }
}

impl<K, T, S> LockManager<K, T> for ExclusiveLockManager<K, T, S>
where
    K: Eq + Hash + Clone + Debug,
    T: Copy + Eq + Hash + Debug,
    S: ReadySink<T>,
{
    fn write_lock(&mut self, txn: T, key: K) -> bool {
        self.table.count_request(LockMode::Exclusive);
        self.table.enqueue(key, LockRequest::exclusive(txn))
    }

    fn read_lock(&mut self, txn: T, key: K) -> bool {
        // 读锁同样是排他的
        self.table.count_request(LockMode::Shared);
        self.table.enqueue(key, LockRequest::exclusive(txn))
    }

    fn release(&mut self, txn: T, key: &K) -> LockResult<()> {
        self.table.release(txn, key)
    }

    fn status(&self, key: &K, owners: &mut Vec<T>) -> LockResult<LockMode> {
        self.table.status(key, owners)
    }

    fn wait_count(&self, txn: T) -> usize {
        self.table.wait_count(txn)
    }

    fn stats(&self) -> &LockStats {
        self.table.stats()
    }

    fn stalled(&self) -> Vec<T> {
        self.table.stalled()
    }

    fn verify(&self) -> LockResult<()> {
        self.table.verify()
    }
}
