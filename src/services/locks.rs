//! In-process serialization of estimate mutations.

use std::collections::HashSet;
use std::sync::{Condvar, LazyLock, Mutex, MutexGuard, PoisonError};

struct Registry {
    held: Mutex<HashSet<(i32, i32)>>,
    released: Condvar,
}

static REGISTRY: LazyLock<Registry> = LazyLock::new(|| Registry {
    held: Mutex::new(HashSet::new()),
    released: Condvar::new(),
});

fn held() -> MutexGuard<'static, HashSet<(i32, i32)>> {
    REGISTRY.held.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Exclusive hold on one estimate, released on drop.
#[must_use = "the estimate is unlocked as soon as the guard is dropped"]
pub struct EstimateLock {
    key: (i32, i32),
}

impl Drop for EstimateLock {
    fn drop(&mut self) {
        held().remove(&self.key);
        REGISTRY.released.notify_all();
    }
}

/// Block until no other caller holds the estimate, then hold it.
pub fn lock_estimate(hub_id: i32, estimate_id: i32) -> EstimateLock {
    let key = (hub_id, estimate_id);
    let mut guard = held();
    while guard.contains(&key) {
        guard = REGISTRY
            .released
            .wait(guard)
            .unwrap_or_else(PoisonError::into_inner);
    }
    guard.insert(key);
    EstimateLock { key }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn second_holder_waits_for_release() {
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let active = Arc::clone(&active);
                let peak = Arc::clone(&peak);
                thread::spawn(move || {
                    let _lock = lock_estimate(900, 1);
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    thread::sleep(Duration::from_millis(10));
                    active.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();

        for worker in workers {
            worker.join().unwrap();
        }
        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn different_estimates_do_not_block() {
        let _first = lock_estimate(901, 1);
        let _second = lock_estimate(901, 2);
        let _other_hub = lock_estimate(902, 1);
    }
}
