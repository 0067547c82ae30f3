// 单个键的等待队列
//
// 队列按到达顺序排列。队首的一段是当前持有者（授予前缀）：
// - 队首是排他锁时，前缀只有这一项
// - 否则前缀是从队首开始的连续共享锁，遇到第一个排他锁或队尾为止
// 前缀之后的都是等待者

use super::request::{LockMode, LockRequest};
use std::collections::VecDeque;

/// 等待队列
#[derive(Debug, Clone)]
pub struct WaitQueue<T> {
    requests: VecDeque<LockRequest<T>>,
}

impl<T> Default for WaitQueue<T> {
    fn default() -> Self {
        Self {
            requests: VecDeque::new(),
        }
    }
}

impl<T: Copy + Eq> WaitQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// 队尾追加请求，返回它的下标
    pub fn push(&mut self, request: LockRequest<T>) -> usize {
        self.requests.push_back(request);
        self.requests.len() - 1
    }

    /// 授予前缀的长度
    pub fn granted_len(&self) -> usize {
        match self.requests.front() {
            None => 0,
            Some(head) if head.is_exclusive() => 1,
            Some(_) => self
                .requests
                .iter()
                .take_while(|req| req.mode() == LockMode::Shared)
                .count(),
        }
    }

    /// 下标处的请求是否已被授予
    pub fn is_granted(&self, index: usize) -> bool {
        index < self.granted_len()
    }

    /// 查找事务在队列中的第一个请求
    pub fn position(&self, txn: T) -> Option<usize> {
        self.requests.iter().position(|req| req.txn() == txn)
    }

    pub fn get(&self, index: usize) -> Option<&LockRequest<T>> {
        self.requests.get(index)
    }

    pub fn remove(&mut self, index: usize) -> Option<LockRequest<T>> {
        self.requests.remove(index)
    }

    /// 当前持有者
    pub fn holders(&self) -> impl Iterator<Item = &LockRequest<T>> + '_ {
        self.requests.iter().take(self.granted_len())
    }

    /// 当前锁状态：空队列为未加锁，否则由队首模式决定
    pub fn mode(&self) -> LockMode {
        self.requests
            .front()
            .map(|head| head.mode())
            .unwrap_or(LockMode::Unlocked)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LockRequest<T>> + '_ {
        self.requests.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue(shape: &[LockMode]) -> WaitQueue<u64> {
        let mut q = WaitQueue::new();
        for (i, mode) in shape.iter().enumerate() {
            let req = match mode {
                LockMode::Exclusive => LockRequest::exclusive(i as u64),
                _ => LockRequest::shared(i as u64),
            };
            q.push(req);
        }
        q
    }

    use LockMode::{Exclusive as X, Shared as S};

    #[test]
    fn test_granted_len_empty() {
        let q: WaitQueue<u64> = WaitQueue::new();
        assert_eq!(q.granted_len(), 0);
        assert_eq!(q.mode(), LockMode::Unlocked);
    }

    #[test]
    fn test_granted_len_exclusive_head() {
        assert_eq!(queue(&[X]).granted_len(), 1);
        assert_eq!(queue(&[X, S, S]).granted_len(), 1);
        assert_eq!(queue(&[X, X]).granted_len(), 1);
    }

    #[test]
    fn test_granted_len_shared_run() {
        assert_eq!(queue(&[S]).granted_len(), 1);
        assert_eq!(queue(&[S, S, S]).granted_len(), 3);
        assert_eq!(queue(&[S, S, X, S]).granted_len(), 2);
    }

    #[test]
    fn test_position_and_remove() {
        let mut q = queue(&[S, X, S]);
        assert_eq!(q.position(1), Some(1));
        assert_eq!(q.position(9), None);

        let removed = q.remove(1).unwrap();
        assert_eq!(removed.txn(), 1);
        assert_eq!(q.len(), 2);
        assert_eq!(q.granted_len(), 2);
    }

    #[test]
    fn test_holders() {
        let q = queue(&[S, S, X]);
        let holders: Vec<u64> = q.holders().map(|r| r.txn()).collect();
        assert_eq!(holders, vec![0, 1]);
        assert!(q.is_granted(1));
        assert!(!q.is_granted(2));
    }
}
