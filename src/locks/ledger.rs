// 等待计数账本
//
// 记录每个事务还有多少个锁请求没有被授予。
// 只为计数大于零的事务保存条目，计数归零时条目立即删除。

use std::collections::HashMap;
use std::hash::Hash;

/// 等待计数账本
#[derive(Debug, Clone)]
pub struct WaitLedger<T> {
    waits: HashMap<T, usize>,
}

impl<T> Default for WaitLedger<T> {
    fn default() -> Self {
        Self {
            waits: HashMap::new(),
        }
    }
}

impl<T: Copy + Eq + Hash> WaitLedger<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一个未授予的请求，返回是否为该事务的第一个等待
    pub fn add_wait(&mut self, txn: T) -> bool {
        let count = self.waits.entry(txn).or_insert(0);
        *count += 1;
        *count == 1
    }

    /// 一个等待中的请求被授予，返回事务是否已无任何等待
    ///
    /// 对没有条目的事务调用是协议错误，按已无等待处理
    pub fn grant(&mut self, txn: T) -> bool {
        self.decrement(txn)
    }

    /// 撤回一个等待中的请求（事务释放了尚未授予的锁），返回条目是否被删除
    pub fn withdraw(&mut self, txn: T) -> bool {
        self.decrement(txn)
    }

    fn decrement(&mut self, txn: T) -> bool {
        let Some(count) = self.waits.get_mut(&txn) else {
            return true;
        };
        if *count > 1 {
            *count -= 1;
            return false;
        }
        self.waits.remove(&txn);
        true
    }

    /// 事务的等待计数，无条目时为 0
    pub fn count(&self, txn: T) -> usize {
        self.waits.get(&txn).copied().unwrap_or(0)
    }

    pub fn contains(&self, txn: T) -> bool {
        self.waits.contains_key(&txn)
    }

    /// 有等待的事务数
    pub fn len(&self) -> usize {
        self.waits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (T, usize)> + '_ {
        self.waits.iter().map(|(&txn, &count)| (txn, count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_grant() {
        let mut ledger = WaitLedger::new();
        assert!(ledger.add_wait(1u64));
        assert!(!ledger.add_wait(1u64));
        assert_eq!(ledger.count(1), 2);

        assert!(!ledger.grant(1));
        assert_eq!(ledger.count(1), 1);
        assert!(ledger.grant(1));
        assert!(!ledger.contains(1));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_withdraw_removes_at_zero() {
        let mut ledger = WaitLedger::new();
        ledger.add_wait(3u64);
        assert!(ledger.withdraw(3));
        assert_eq!(ledger.count(3), 0);
        assert_eq!(ledger.len(), 0);
    }
}
