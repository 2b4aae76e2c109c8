//! Process-wide divide-and-conquer scheduler for row-sliced work.
//!
//! The multiplication engine (`numlab_linalg::matmul`) is the only consumer:
//! it submits the row range `[0, A.m)` and this module decides whether that
//! range runs on the calling thread or is recursively halved across a bounded
//! pool of worker threads. Workers never share mutable state with each other;
//! each leaf slice writes into disjoint output rows.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

use crossbeam_deque::{Injector, Steal};
use crossbeam_utils::CachePadded;

use crate::diagnostics::{default_diagnostics, Diagnostics};

type Job = Box<dyn FnOnce() + Send + 'static>;

struct Pool {
    injector: Arc<Injector<Job>>,
    handles: Vec<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
    wake: Arc<(Mutex<()>, Condvar)>,
}

impl Pool {
    fn spawn(worker_count: usize) -> Self {
        let injector = Arc::new(Injector::new());
        let shutdown = Arc::new(AtomicBool::new(false));
        let wake = Arc::new((Mutex::new(()), Condvar::new()));

        let handles = (0..worker_count.max(1))
            .map(|_| {
                let injector = Arc::clone(&injector);
                let shutdown = Arc::clone(&shutdown);
                let wake = Arc::clone(&wake);
                thread::spawn(move || worker_loop(injector, shutdown, wake))
            })
            .collect();

        Pool {
            injector,
            handles,
            shutdown,
            wake,
        }
    }

    fn submit(&self, job: Job) {
        self.injector.push(job);
        let (_, cvar) = &*self.wake;
        cvar.notify_all();
    }

    fn shutdown_and_join(self) {
        self.shutdown.store(true, Ordering::SeqCst);
        let (_, cvar) = &*self.wake;
        cvar.notify_all();
        for handle in self.handles {
            let _ = handle.join();
        }
    }
}

fn worker_loop(injector: Arc<Injector<Job>>, shutdown: Arc<AtomicBool>, wake: Arc<(Mutex<()>, Condvar)>) {
    loop {
        match injector.steal() {
            Steal::Success(job) => job(),
            Steal::Empty | Steal::Retry => {
                if shutdown.load(Ordering::SeqCst) && matches!(injector.steal(), Steal::Empty) {
                    return;
                }
                let (lock, cvar) = &*wake;
                let guard = lock.lock().unwrap();
                let _ = cvar
                    .wait_timeout(guard, std::time::Duration::from_millis(2))
                    .unwrap();
            }
        }
    }
}

/// A latch that the caller of [`Scheduler::run_row_slices`] waits on until
/// every leaf slice submitted for one call has completed.
struct Latch {
    // Every worker decrements this on its own leaf's completion; padding it
    // to a cache line keeps that contention off whatever the pool's other
    // shared state lands next to.
    remaining: CachePadded<AtomicUsize>,
    lock: Mutex<()>,
    cvar: Condvar,
}

impl Latch {
    fn new(count: usize) -> Arc<Self> {
        Arc::new(Latch {
            remaining: CachePadded::new(AtomicUsize::new(count)),
            lock: Mutex::new(()),
            cvar: Condvar::new(),
        })
    }

    fn decrement(&self) {
        if self.remaining.fetch_sub(1, Ordering::SeqCst) == 1 {
            let _guard = self.lock.lock().unwrap();
            self.cvar.notify_all();
        }
    }

    fn wait(&self) {
        let mut guard = self.lock.lock().unwrap();
        while self.remaining.load(Ordering::SeqCst) != 0 {
            guard = self.cvar.wait(guard).unwrap();
        }
    }
}

/// Process-wide scheduler singleton. Started by [`Scheduler::parallelize`],
/// stopped by [`Scheduler::unparallelize`].
pub struct Scheduler {
    pool: Mutex<Option<Pool>>,
}

impl Scheduler {
    const fn new() -> Self {
        Scheduler {
            pool: Mutex::new(None),
        }
    }

    /// True if a worker pool is currently accepting work.
    pub fn is_running(&self) -> bool {
        self.pool.lock().unwrap().is_some()
    }

    /// Starts the worker pool. Calling this while already running is a no-op
    /// that emits an informational diagnostic, never an error.
    pub fn parallelize(&self) {
        self.parallelize_with(num_cpus::get(), default_diagnostics())
    }

    pub fn parallelize_with(&self, worker_count: usize, diagnostics: Arc<dyn Diagnostics>) {
        let mut guard = self.pool.lock().unwrap();
        if guard.is_some() {
            diagnostics.info("scheduler already running; parallelize() is a no-op");
            return;
        }
        *guard = Some(Pool::spawn(worker_count));
        diagnostics.info(&format!("scheduler started with {} workers", worker_count));
    }

    /// Stops the worker pool. In-flight slices are allowed to drain; no new
    /// work is accepted once this returns.
    pub fn unparallelize(&self) {
        let pool = self.pool.lock().unwrap().take();
        if let Some(pool) = pool {
            pool.shutdown_and_join();
        }
    }

    /// Stops and restarts the pool. Idempotent: calling this on a stopped
    /// scheduler simply starts it.
    pub fn reparallelize(&self) {
        self.unparallelize();
        self.parallelize();
    }

    /// Runs `work(lo, hi)` for disjoint sub-slices covering `[lo, hi)`.
    ///
    /// When the pool is not running, `work` is invoked once, synchronously,
    /// with the full range. When running, the range is halved recursively
    /// until a slice is at or below `threshold` (minimum one row), and each
    /// leaf is pushed onto the pool; this call blocks until every leaf has
    /// run.
    pub fn run_row_slices<F>(&self, lo: usize, hi: usize, threshold: usize, work: F)
    where
        F: Fn(usize, usize) + Sync + Send + 'static,
    {
        if lo >= hi {
            return;
        }
        let threshold = threshold.max(1);
        let guard = self.pool.lock().unwrap();
        let pool = match guard.as_ref() {
            Some(pool) => pool,
            None => {
                work(lo, hi);
                return;
            }
        };

        let leaves = count_leaves(lo, hi, threshold);
        let latch = Latch::new(leaves);
        let work = Arc::new(work);
        submit_range(pool, lo, hi, threshold, &work, &latch);
        drop(guard);
        latch.wait();
    }
}

fn count_leaves(lo: usize, hi: usize, threshold: usize) -> usize {
    if hi - lo <= threshold {
        1
    } else {
        let mid = lo + (hi - lo) / 2;
        count_leaves(lo, mid, threshold) + count_leaves(mid, hi, threshold)
    }
}

fn submit_range<F>(pool: &Pool, lo: usize, hi: usize, threshold: usize, work: &Arc<F>, latch: &Arc<Latch>)
where
    F: Fn(usize, usize) + Sync + Send + 'static,
{
    if hi - lo <= threshold {
        let work = Arc::clone(work);
        let latch = Arc::clone(latch);
        pool.submit(Box::new(move || {
            work(lo, hi);
            latch.decrement();
        }));
        return;
    }
    let mid = lo + (hi - lo) / 2;
    submit_range(pool, lo, mid, threshold, work, latch);
    submit_range(pool, mid, hi, threshold, work, latch);
}

static SCHEDULER: Scheduler = Scheduler::new();

/// The process-wide scheduler instance consumed by `numlab_linalg`'s
/// multiplication engine.
pub fn global_scheduler() -> &'static Scheduler {
    &SCHEDULER
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU64;

    #[test]
    fn serial_path_runs_synchronously_when_not_started() {
        let scheduler = Scheduler::new();
        let touched = Arc::new(AtomicBool::new(false));
        let t = Arc::clone(&touched);
        scheduler.run_row_slices(0, 10, 4, move |lo, hi| {
            assert_eq!((lo, hi), (0, 10));
            t.store(true, Ordering::SeqCst);
        });
        assert!(touched.load(Ordering::SeqCst));
    }

    #[test]
    fn parallel_path_covers_every_row_exactly_once() {
        let scheduler = Scheduler::new();
        scheduler.parallelize_with(4, Arc::new(crate::diagnostics::NullDiagnostics));
        let sum = Arc::new(AtomicU64::new(0));
        let s = Arc::clone(&sum);
        scheduler.run_row_slices(0, 97, 7, move |lo, hi| {
            s.fetch_add((hi - lo) as u64, Ordering::SeqCst);
        });
        assert_eq!(sum.load(Ordering::SeqCst), 97);
        scheduler.unparallelize();
    }

    #[test]
    fn starting_twice_is_a_noop() {
        let scheduler = Scheduler::new();
        scheduler.parallelize();
        assert!(scheduler.is_running());
        scheduler.parallelize();
        assert!(scheduler.is_running());
        scheduler.unparallelize();
        assert!(!scheduler.is_running());
    }
}
