// 停滞检测
//
// 仅用于测试和诊断：用逻辑时钟（锁操作次数）衡量事务等待了多久，
// 超过阈值的事务被报告出来。确定性调度器保证不会死锁，这里不做死锁检测，
// 也不会影响任何授予决定。

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// 停滞检测器
#[derive(Debug, Clone)]
pub struct StallDetector<T> {
    /// 事务开始等待的逻辑时刻
    waiting_since: HashMap<T, u64>,
    /// 已经报告过的事务
    reported: HashSet<T>,
    /// 阈值（操作次数）
    bound: u64,
    /// 当前逻辑时刻
    now: u64,
}

impl<T: Copy + Eq + Hash + std::fmt::Debug> StallDetector<T> {
    pub fn new(bound: u64) -> Self {
        Self {
            waiting_since: HashMap::new(),
            reported: HashSet::new(),
            bound,
            now: 0,
        }
    }

    /// 推进逻辑时钟，并对刚越过阈值的事务发出警告
    pub fn tick(&mut self) {
        self.now += 1;
        for (&txn, &since) in &self.waiting_since {
            if self.now - since >= self.bound && self.reported.insert(txn) {
                log::warn!(
                    "transaction {:?} has been waiting for {} lock operations",
                    txn,
                    self.now - since
                );
            }
        }
    }

    /// 事务开始等待
    pub fn on_wait_start(&mut self, txn: T) {
        self.waiting_since.entry(txn).or_insert(self.now);
    }

    /// 事务不再等待（被授予或撤回）
    pub fn on_wait_end(&mut self, txn: T) {
        self.waiting_since.remove(&txn);
        self.reported.remove(&txn);
    }

    /// 等待时长达到阈值的事务，按开始等待的先后排序
    pub fn stalled(&self) -> Vec<T> {
        let mut stalled: Vec<(u64, T)> = self
            .waiting_since
            .iter()
            .filter(|(_, &since)| self.now - since >= self.bound)
            .map(|(&txn, &since)| (since, txn))
            .collect();
        stalled.sort_by_key(|&(since, _)| since);
        stalled.into_iter().map(|(_, txn)| txn).collect()
    }

    /// 事务已等待的操作次数
    pub fn wait_duration(&self, txn: T) -> Option<u64> {
        self.waiting_since.get(&txn).map(|&since| self.now - since)
    }

    pub fn bound(&self) -> u64 {
        self.bound
    }

    /// 当前逻辑时刻
    pub fn now(&self) -> u64 {
        self.now
    }
}
