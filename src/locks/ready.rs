// 就绪通道
//
// 锁管理器只向通道追加事务，由外部调度器消费。
// 调度器与锁管理器在不同线程或任务中运行时，使用 Arc<Mutex<_>> 或 mpsc 发送端。

use std::collections::VecDeque;
use std::sync::{mpsc, Arc, Mutex};

/// 就绪事务的接收端（锁管理器是生产者）
pub trait ReadySink<T> {
    /// 追加一个等待计数刚归零的事务
    fn push_ready(&mut self, txn: T);
}

impl<T> ReadySink<T> for VecDeque<T> {
    fn push_ready(&mut self, txn: T) {
        self.push_back(txn);
    }
}

impl<T> ReadySink<T> for Vec<T> {
    fn push_ready(&mut self, txn: T) {
        self.push(txn);
    }
}

/// 借用调用方持有的序列
impl<T, S: ReadySink<T> + ?Sized> ReadySink<T> for &mut S {
    fn push_ready(&mut self, txn: T) {
        (**self).push_ready(txn);
    }
}

impl<T> ReadySink<T> for Arc<Mutex<VecDeque<T>>> {
    fn push_ready(&mut self, txn: T) {
        // 持锁期间只做 push，中毒时内容仍然有效
        let mut ready = self.lock().unwrap_or_else(|e| e.into_inner());
        ready.push_back(txn);
    }
}

impl<T> ReadySink<T> for mpsc::Sender<T> {
    fn push_ready(&mut self, txn: T) {
        if self.send(txn).is_err() {
            log::warn!("ready channel receiver dropped, readiness notification lost");
        }
    }
}

impl<T> ReadySink<T> for tokio::sync::mpsc::UnboundedSender<T> {
    fn push_ready(&mut self, txn: T) {
        if self.send(txn).is_err() {
            log::warn!("ready channel receiver dropped, readiness notification lost");
        }
    }
}
