//! 锁管理器统计信息

use serde::Serialize;

/// 锁操作计数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LockStats {
    /// 读锁请求数
    pub read_requests: u64,
    /// 写锁请求数
    pub write_requests: u64,
    /// 请求时立即授予的数量
    pub immediate_grants: u64,
    /// 进入等待的请求数
    pub queued_requests: u64,
    /// 成功的释放次数
    pub releases: u64,
    /// 释放时级联授予的请求数
    pub cascade_grants: u64,
    /// 追加到就绪通道的次数
    pub ready_pushes: u64,
    /// 协议错误次数
    pub protocol_violations: u64,
}

impl LockStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// 总请求数
    pub fn total_requests(&self) -> u64 {
        self.read_requests + self.write_requests
    }

    /// 立即授予比例
    pub fn immediate_grant_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            0.0
        } else {
            self.immediate_grants as f64 / total as f64
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_rate() {
        let mut stats = LockStats::new();
        assert_eq!(stats.immediate_grant_rate(), 0.0);

        stats.read_requests = 3;
        stats.write_requests = 1;
        stats.immediate_grants = 2;
        assert_eq!(stats.total_requests(), 4);
        assert_eq!(stats.immediate_grant_rate(), 0.5);

        stats.reset();
        assert_eq!(stats, LockStats::default());
    }

    #[test]
    fn test_stats_serialize() {
        let stats = LockStats {
            releases: 2,
            ..Default::default()
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"releases\":2"));
    }
}
