use thiserror::Error;

/// 锁管理器错误
///
/// 除配置错误外都是调用方违反加锁协议，调度器应当作致命错误处理
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LockError {
    #[error("key {key} was never locked")]
    UnknownKey { key: String },

    #[error("transaction {txn} holds no request on key {key}")]
    NotRequested { txn: String, key: String },

    #[error("wait ledger mismatch for transaction {txn}: queues say {expected}, ledger says {actual}")]
    LedgerMismatch {
        txn: String,
        expected: usize,
        actual: usize,
    },

    #[error("invalid lock manager config: {0}")]
    InvalidConfig(String),
}

pub type LockResult<T> = std::result::Result<T, LockError>;
