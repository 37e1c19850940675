//! Rayon worker pool for batch execution.

use afsc_config::WorkerThreads;
use rayon::ThreadPoolBuilder;

use crate::error::SimulationError;

/// How many worker threads execute the runs of a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerPool {
    /// Number of worker threads. If 0, use the global rayon pool.
    pub workers: usize,
}

impl WorkerPool {
    /// Use exactly `n` worker threads.
    pub fn with_workers(n: usize) -> Self {
        Self { workers: n }
    }

    /// Runs `f` with this worker count. With 0 workers `f` runs on the global
    /// rayon pool; otherwise a dedicated pool is built for the call.
    pub fn install<F, R>(&self, f: F) -> Result<R, SimulationError>
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            Ok(f())
        } else {
            let pool = ThreadPoolBuilder::new()
                .num_threads(self.workers)
                .thread_name(|i| format!("afsc-worker-{i}"))
                .build()?;
            Ok(pool.install(f))
        }
    }
}

impl From<WorkerThreads> for WorkerPool {
    fn from(threads: WorkerThreads) -> Self {
        Self {
            workers: threads.count().unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_worker_threads() {
        assert_eq!(WorkerPool::from(WorkerThreads::Auto).workers, 0);
        assert_eq!(WorkerPool::from(WorkerThreads::Count(3)).workers, 3);
    }

    #[test]
    fn test_install_runs_on_named_pool() {
        let name = WorkerPool::with_workers(2)
            .install(|| std::thread::current().name().map(str::to_string))
            .unwrap();
        assert!(name.unwrap().starts_with("afsc-worker-"));
    }

    #[test]
    fn test_install_on_global_pool() {
        let sum: u32 = WorkerPool::default()
            .install(|| {
                use rayon::prelude::*;
                (1..=4u32).into_par_iter().sum()
            })
            .unwrap();
        assert_eq!(sum, 10);
    }
}
