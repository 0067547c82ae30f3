pub mod locks;
pub mod concurrent;

pub use crate::concurrent::ConcurrentLockManager;
pub use crate::locks::{
    build_lock_manager, ExclusiveLockManager, LockError, LockManager, LockManagerConfig,
    LockMode, LockResult, LockingMode, ReadySink, SharedLockManager,
};
