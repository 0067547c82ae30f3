// 锁管理模块
//
// 确定性两阶段锁的锁管理器：
// - 每个键一个 FIFO 等待队列，队首一段是持有者
// - 等待计数账本记录每个事务还缺几个锁
// - 等待计数归零的事务追加到就绪通道，由调度器执行
//
// 提供两种实现：仅排他锁（ExclusiveLockManager）和共享/排他锁（SharedLockManager）

pub mod config;
pub mod error;
pub mod exclusive;
pub mod ledger;
pub mod queue;
pub mod ready;
pub mod request;
pub mod shared;
pub mod stall;
pub mod stats;
pub mod table;

pub use config::{LockManagerConfig, LockingMode};
pub use error::{LockError, LockResult};
pub use exclusive::ExclusiveLockManager;
pub use ledger::WaitLedger;
pub use queue::WaitQueue;
pub use ready::ReadySink;
pub use request::{LockMode, LockRequest};
pub use shared::SharedLockManager;
pub use stall::StallDetector;
pub use stats::LockStats;
pub use table::LockTable;

use std::fmt::Debug;
use std::hash::Hash;

/// 锁管理器
///
/// 调度器在执行事务前为它访问的每个键调用一次 `read_lock`/`write_lock`，
/// 返回 false 的事务要推迟到出现在就绪通道后再执行；
/// 事务结束后对每个键调用一次 `release`。
///
/// 所有操作同步完成，不会阻塞调用方，也不做内部同步。
pub trait LockManager<K, T> {
    /// 申请写锁，返回是否立即授予
    fn write_lock(&mut self, txn: T, key: K) -> bool;

    /// 申请读锁，返回是否立即授予
    fn read_lock(&mut self, txn: T, key: K) -> bool;

    /// 释放事务在键上的请求（已授予或仍在等待），并级联授予后续请求
    fn release(&mut self, txn: T, key: &K) -> LockResult<()>;

    /// 键的锁状态，当前持有者追加到 owners
    fn status(&self, key: &K, owners: &mut Vec<T>) -> LockResult<LockMode>;

    /// 事务尚未被授予的请求数
    fn wait_count(&self, txn: T) -> usize;

    fn stats(&self) -> &LockStats;

    /// 等待过久的事务（需要开启停滞检测）
    fn stalled(&self) -> Vec<T>;

    /// 检查等待计数账本与队列是否一致
    fn verify(&self) -> LockResult<()>;
}

/// 按配置创建锁管理器
pub fn build_lock_manager<'a, K, T, S>(
    config: &LockManagerConfig,
    ready: S,
) -> Box<dyn LockManager<K, T> + 'a>
where
    K: Eq + Hash + Clone + Debug + 'a,
    T: Copy + Eq + Hash + Debug + 'a,
    S: ReadySink<T> + 'a,
{
    match config.mode {
        LockingMode::ExclusiveOnly => Box::new(ExclusiveLockManager::with_config(config, ready)),
        LockingMode::SharedExclusive => Box::new(SharedLockManager::with_config(config, ready)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    #[test]
    fn test_build_by_mode() {
        let mut ready = VecDeque::new();
        {
            let config = LockManagerConfig::new().with_mode(LockingMode::ExclusiveOnly);
            let mut lm: Box<dyn LockManager<&str, u64> + '_> =
                build_lock_manager(&config, &mut ready);
            assert!(lm.read_lock(1u64, "k"));
            assert!(!lm.read_lock(2u64, "k"));
        }
        {
            let config = LockManagerConfig::new();
            let mut lm: Box<dyn LockManager<&str, u64> + '_> =
                build_lock_manager(&config, &mut ready);
            assert!(lm.read_lock(1u64, "k"));
            assert!(lm.read_lock(2u64, "k"));
        }
        assert!(ready.is_empty());
    }
}
