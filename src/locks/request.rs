// 锁请求定义
//
// 锁模式和单个锁请求，两种锁管理器共用

use serde::{Deserialize, Serialize};
use std::fmt;

/// 锁模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LockMode {
    /// 未加锁（只出现在状态查询结果中，不会出现在请求里）
    Unlocked,
    /// 共享锁（读锁）
    Shared,
    /// 排他锁（写锁）
    Exclusive,
}

impl LockMode {
    /// 两个模式能否同时持有同一个键
    pub fn is_compatible_with(self, other: LockMode) -> bool {
        matches!((self, other), (LockMode::Shared, LockMode::Shared))
            || self == LockMode::Unlocked
            || other == LockMode::Unlocked
    }
}

impl fmt::Display for LockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockMode::Unlocked => write!(f, "UNLOCKED"),
            LockMode::Shared => write!(f, "SHARED"),
            LockMode::Exclusive => write!(f, "EXCLUSIVE"),
        }
    }
}

/// 锁请求
///
/// 创建后不再修改；`Release` 时整体移出等待队列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockRequest<T> {
    mode: LockMode,
    txn: T,
}

impl<T: Copy> LockRequest<T> {
    /// 共享锁请求
    pub fn shared(txn: T) -> Self {
        Self { mode: LockMode::Shared, txn }
    }

    /// 排他锁请求
    pub fn exclusive(txn: T) -> Self {
        Self { mode: LockMode::Exclusive, txn }
    }

    pub fn mode(&self) -> LockMode {
        self.mode
    }

    /// 发出请求的事务
    pub fn txn(&self) -> T {
        self.txn
    }

    pub fn is_exclusive(&self) -> bool {
        self.mode == LockMode::Exclusive
    }
}
