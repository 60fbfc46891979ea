use std::sync::{Mutex, MutexGuard};

/// 获取锁; 持有者 panic 后仍沿用内部数据
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
