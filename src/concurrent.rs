use crate::locks::{LockManager, LockMode, LockResult};
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};

/// 多线程共享的锁管理器包装器
///
/// 锁管理器本身不做同步。多个调度线程驱动同一个实例时，
/// 每次调用都在一把全局互斥锁内完成，入队扫描与释放级联不会交错。
pub struct ConcurrentLockManager<M, K, T> {
    inner: Arc<Mutex<M>>,
    _marker: PhantomData<fn(K, T)>,
}

impl<M, K, T> ConcurrentLockManager<M, K, T>
where
    M: LockManager<K, T>,
{
    pub fn new(manager: M) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
            _marker: PhantomData,
        }
    }

    pub fn clone_handle(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _marker: PhantomData,
        }
    }

    fn guard(&self) -> MutexGuard<'_, M> {
        // 每次调用结束时状态都是一致的，中毒后继续使用
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn write_lock(&self, txn: T, key: K) -> bool {
        self.guard().write_lock(txn, key)
    }

    pub fn read_lock(&self, txn: T, key: K) -> bool {
        self.guard().read_lock(txn, key)
    }

    pub fn release(&self, txn: T, key: &K) -> LockResult<()> {
        self.guard().release(txn, key)
    }

    pub fn status(&self, key: &K, owners: &mut Vec<T>) -> LockResult<LockMode> {
        self.guard().status(key, owners)
    }

    /// 在持锁状态下执行一组操作，例如一次性申请事务的全部锁
    pub fn with<R>(&self, f: impl FnOnce(&mut M) -> R) -> R {
        f(&mut self.guard())
    }
}

impl<M, K, T> Clone for ConcurrentLockManager<M, K, T>
where
    M: LockManager<K, T>,
{
    fn clone(&self) -> Self {
        self.clone_handle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locks::SharedLockManager;
    use std::collections::VecDeque;
    use std::thread;

    #[test]
    fn test_concurrent_shared_readers() {
        let ready: Arc<Mutex<VecDeque<u64>>> = Arc::new(Mutex::new(VecDeque::new()));
        let lm: ConcurrentLockManager<_, &str, u64> =
            ConcurrentLockManager::new(SharedLockManager::new(Arc::clone(&ready)));

        let handles: Vec<_> = (0..4u64)
            .map(|txn| {
                let lm = lm.clone_handle();
                thread::spawn(move || lm.read_lock(txn, "k"))
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }

        let mut owners = Vec::new();
        assert_eq!(lm.status(&"k", &mut owners).unwrap(), LockMode::Shared);
        owners.sort();
        assert_eq!(owners, vec![0, 1, 2, 3]);
        assert!(ready.lock().unwrap().is_empty());
    }
}
