//! 锁管理器配置

use super::error::{LockError, LockResult};
use serde::{Deserialize, Serialize};

/// 加锁模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LockingMode {
    /// 所有锁都按排他锁处理
    ExclusiveOnly,
    /// 读锁共享，写锁排他
    #[default]
    SharedExclusive,
}

/// 锁管理器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockManagerConfig {
    /// 加锁模式
    pub mode: LockingMode,
    /// 锁表预分配容量
    pub initial_capacity: usize,
    /// 停滞检测阈值（锁操作次数），None 表示关闭
    pub stall_bound: Option<u64>,
}

impl Default for LockManagerConfig {
    fn default() -> Self {
        Self {
            mode: LockingMode::default(),
            initial_capacity: 0,
            stall_bound: None,
        }
    }
}

impl LockManagerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 JSON 读取配置，缺省字段取默认值
    pub fn from_json(json: &str) -> LockResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| LockError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> LockResult<()> {
        if self.stall_bound == Some(0) {
            return Err(LockError::InvalidConfig(
                "stall_bound must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_mode(mut self, mode: LockingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// 开启停滞检测
    pub fn with_stall_bound(mut self, ops: u64) -> Self {
        self.stall_bound = Some(ops);
        self
    }

    pub fn no_stall_detection(mut self) -> Self {
        self.stall_bound = None;
        self
    }
}
