// 锁表
//
// 键 -> 等待队列的映射，加上等待计数账本和就绪通道。
// 两种锁管理器都在这里完成入队、释放级联和状态查询，区别只在于读请求使用的模式。
//
// 锁管理器不做死锁检测：确定性调度器按全局统一顺序一次性申请事务的全部锁，
// 从构造上排除了循环等待。违反这一前提的调用方会让事务永远停在账本里，
// 只有开启停滞检测时才会看到告警。

use super::config::LockManagerConfig;
use super::error::{LockError, LockResult};
use super::ledger::WaitLedger;
use super::queue::WaitQueue;
use super::ready::ReadySink;
use super::request::{LockMode, LockRequest};
use super::stall::StallDetector;
use super::stats::LockStats;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// 锁表
#[derive(Debug)]
pub struct LockTable<K, T, S> {
    /// 键 -> 等待队列，首次引用时创建，清空后保留
    queues: HashMap<K, WaitQueue<T>>,
    /// 等待计数
    ledger: WaitLedger<T>,
    /// 就绪通道
    ready: S,
    stats: LockStats,
    stall: Option<StallDetector<T>>,
}

impl<K, T, S> LockTable<K, T, S>
where
    K: Eq + Hash + Clone + Debug,
    T: Copy + Eq + Hash + Debug,
    S: ReadySink<T>,
{
    pub fn new(ready: S) -> Self {
        Self::with_config(&LockManagerConfig::default(), ready)
    }

    pub fn with_config(config: &LockManagerConfig, ready: S) -> Self {
        Self {
            queues: HashMap::with_capacity(config.initial_capacity),
            ledger: WaitLedger::new(),
            ready,
            stats: LockStats::new(),
            stall: config.stall_bound.map(StallDetector::new),
        }
    }

    /// 记录一次请求（按调用方请求的模式计数，而不是实际入队的模式）
    pub(crate) fn count_request(&mut self, requested: LockMode) {
        match requested {
            LockMode::Shared => self.stats.read_requests += 1,
            _ => self.stats.write_requests += 1,
        }
    }

    /// 请求追加到键的队尾，返回是否立即授予
    pub fn enqueue(&mut self, key: K, request: LockRequest<T>) -> bool {
        self.tick();
        let txn = request.txn();

        let queue = self.queues.entry(key.clone()).or_default();
        let index = queue.push(request);
        let granted = queue.is_granted(index);

        log::trace!(
            "{} lock on {:?} for {:?}: {}",
            request.mode(),
            key,
            txn,
            if granted { "granted" } else { "queued" }
        );

        if granted {
            self.stats.immediate_grants += 1;
        } else {
            self.stats.queued_requests += 1;
            if self.ledger.add_wait(txn) {
                if let Some(stall) = self.stall.as_mut() {
                    stall.on_wait_start(txn);
                }
            }
        }
        granted
    }

    /// 移除事务在键上的请求，并把锁移交给新进入授予前缀的请求
    ///
    /// 释放前后各算一次授予前缀，释放后位于前缀内、释放前不在前缀内的请求就是新授予的。
    /// 被释放的请求在队首时，这与逐个情形判断完全一致：
    /// - 排他锁：下一个排他锁，或下一段连续共享锁获得授予
    /// - 共享锁：只有它是唯一持有者且后面是排他锁时才移交
    /// 撤回一个夹在共享持有者与共享等待者之间的排他等待者时，后面的共享等待者并入前缀。
    pub fn release(&mut self, txn: T, key: &K) -> LockResult<()> {
        self.tick();

        let Some(queue) = self.queues.get_mut(key) else {
            self.stats.protocol_violations += 1;
            log::error!("release of {:?} by {:?}: key was never locked", key, txn);
            return Err(LockError::UnknownKey {
                key: format!("{:?}", key),
            });
        };

        let Some(index) = queue.position(txn) else {
            self.stats.protocol_violations += 1;
            log::error!("release of {:?} by {:?}: no request from this transaction", key, txn);
            return Err(LockError::NotRequested {
                txn: format!("{:?}", txn),
                key: format!("{:?}", key),
            });
        };

        let granted_before = queue.granted_len();
        queue.remove(index);
        let granted_after = queue.granted_len();

        // 释放后下标 j 的请求在释放前位于 j 或 j + 1
        let handoff: Vec<T> = (0..granted_after)
            .filter(|&j| {
                let before = if j >= index { j + 1 } else { j };
                before >= granted_before
            })
            .filter_map(|j| queue.get(j).map(|req| req.txn()))
            .collect();

        self.stats.releases += 1;

        // 释放的是还在等待的请求：撤回它的等待计数，但不算就绪
        if index >= granted_before && self.ledger.withdraw(txn) {
            if let Some(stall) = self.stall.as_mut() {
                stall.on_wait_end(txn);
            }
        }

        if !handoff.is_empty() {
            log::debug!(
                "release of {:?} by {:?} hands the lock to {} waiter(s)",
                key,
                txn,
                handoff.len()
            );
        }
        for next in handoff {
            self.stats.cascade_grants += 1;
            if self.ledger.grant(next) {
                self.mark_ready(next);
            }
        }
        Ok(())
    }

    /// 查询键的锁状态，持有者追加到 owners
    pub fn status(&self, key: &K, owners: &mut Vec<T>) -> LockResult<LockMode> {
        let Some(queue) = self.queues.get(key) else {
            log::error!("status of {:?}: key was never locked", key);
            return Err(LockError::UnknownKey {
                key: format!("{:?}", key),
            });
        };

        owners.extend(queue.holders().map(|req| req.txn()));
        Ok(queue.mode())
    }

    fn mark_ready(&mut self, txn: T) {
        if let Some(stall) = self.stall.as_mut() {
            stall.on_wait_end(txn);
        }
        log::debug!("transaction {:?} is ready", txn);
        self.stats.ready_pushes += 1;
        self.ready.push_ready(txn);
    }

    fn tick(&mut self) {
        if let Some(stall) = self.stall.as_mut() {
            stall.tick();
        }
    }

    /// 对照所有队列重新计算每个事务的等待数，与账本比较
    pub fn verify(&self) -> LockResult<()> {
        let mut expected: HashMap<T, usize> = HashMap::new();
        for queue in self.queues.values() {
            for req in queue.iter().skip(queue.granted_len()) {
                *expected.entry(req.txn()).or_insert(0) += 1;
            }
        }

        for (&txn, &count) in &expected {
            let actual = self.ledger.count(txn);
            if actual != count {
                return Err(LockError::LedgerMismatch {
                    txn: format!("{:?}", txn),
                    expected: count,
                    actual,
                });
            }
        }
        for (txn, actual) in self.ledger.iter() {
            if !expected.contains_key(&txn) {
                return Err(LockError::LedgerMismatch {
                    txn: format!("{:?}", txn),
                    expected: 0,
                    actual,
                });
            }
        }
        Ok(())
    }

    // ========== 查询 ==========

    /// 事务尚未被授予的请求数
    pub fn wait_count(&self, txn: T) -> usize {
        self.ledger.count(txn)
    }

    pub fn is_waiting(&self, txn: T) -> bool {
        self.ledger.contains(txn)
    }

    /// 有等待的事务数
    pub fn waiting_count(&self) -> usize {
        self.ledger.len()
    }

    /// 键的队列长度，键从未被引用时为 None
    pub fn queue_len(&self, key: &K) -> Option<usize> {
        self.queues.get(key).map(|q| q.len())
    }

    /// 键的完整队列（持有者在前，等待者在后）
    pub fn requests(&self, key: &K) -> Option<Vec<LockRequest<T>>> {
        self.queues.get(key).map(|q| q.iter().copied().collect())
    }

    /// 键的授予前缀长度
    pub fn granted_len(&self, key: &K) -> Option<usize> {
        self.queues.get(key).map(|q| q.granted_len())
    }

    /// 被引用过的键数（包括已清空的队列）
    pub fn key_count(&self) -> usize {
        self.queues.len()
    }

    pub fn stats(&self) -> &LockStats {
        &self.stats
    }

    /// 停滞的事务，未开启检测时为空
    pub fn stalled(&self) -> Vec<T> {
        self.stall
            .as_ref()
            .map(|stall| stall.stalled())
            .unwrap_or_default()
    }

    pub fn ready(&self) -> &S {
        &self.ready
    }

    pub fn ready_mut(&mut self) -> &mut S {
        &mut self.ready
    }

    pub fn into_ready(self) -> S {
        self.ready
    }
}
