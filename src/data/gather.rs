//! Settle-all combinator.
//!
//! Runs a fixed list of independent, blocking tasks on a rayon pool with one
//! thread per task and waits for all of them. A failing task never cancels its siblings; its error is folded into a
//! `Settled::Rejected` sentinel at its own position.

use rayon::prelude::*;

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq)]
pub enum Settled<T> {
    Fulfilled(T),
    Rejected(String),
}

impl<T> Settled<T> {
    pub fn ok(self) -> Option<T> {
        match self {
            Settled::Fulfilled(v) => Some(v),
            Settled::Rejected(_) => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Settled::Rejected(_))
    }
}

/// Run every task concurrently; results keep the input order.
///
/// Tasks are expected to block on I/O, so they get a pool of their own rather
/// than sharing rayon's per-core global pool.
pub fn settle_all<T, F>(tasks: Vec<F>) -> Vec<Settled<T>>
where
    T: Send,
    F: FnOnce() -> Result<T, AppError> + Send,
{
    if tasks.is_empty() {
        return Vec::new();
    }

    let run = |tasks: Vec<F>| -> Vec<Settled<T>> {
        tasks
            .into_par_iter()
            .with_max_len(1)
            .map(|task| match task() {
                Ok(value) => Settled::Fulfilled(value),
                Err(err) => Settled::Rejected(err.to_string()),
            })
            .collect()
    };

    match rayon::ThreadPoolBuilder::new()
        .num_threads(tasks.len())
        .thread_name(|i| format!("settle-{i}"))
        .build()
    {
        Ok(pool) => pool.install(|| run(tasks)),
        Err(e) => {
            log::warn!("Falling back to the global pool: {e}");
            run(tasks)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Barrier};

    use super::*;

    #[test]
    fn keeps_order_and_isolates_failures() {
        let tasks: Vec<Box<dyn FnOnce() -> Result<u32, AppError> + Send>> = vec![
            Box::new(|| Ok(1)),
            Box::new(|| Err(AppError::upstream("boom"))),
            Box::new(|| Ok(3)),
        ];
        let settled = settle_all(tasks);
        assert_eq!(
            settled,
            vec![
                Settled::Fulfilled(1),
                Settled::Rejected("boom".to_string()),
                Settled::Fulfilled(3)
            ]
        );
    }

    fn rendezvous_tasks(n: usize) -> Vec<impl FnOnce() -> Result<usize, AppError> + Send> {
        // Each task blocks until all of them have started, so a runner with
        // fewer than `n` threads would deadlock here.
        let barrier = Arc::new(Barrier::new(n));
        (0..n)
            .map(|i| {
                let barrier = Arc::clone(&barrier);
                move || {
                    barrier.wait();
                    Ok(i)
                }
            })
            .collect()
    }

    #[test]
    fn tasks_run_concurrently() {
        let settled = settle_all(rendezvous_tasks(3));
        assert_eq!(
            settled,
            vec![Settled::Fulfilled(0), Settled::Fulfilled(1), Settled::Fulfilled(2)]
        );
    }

    #[test]
    fn batch_is_concurrent_inside_a_single_thread_pool() {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap();
        let settled = pool.install(|| settle_all(rendezvous_tasks(3)));
        assert!(settled.iter().all(|s| !s.is_rejected()));
    }

    #[test]
    fn empty_batch_settles_immediately() {
        let tasks: Vec<fn() -> Result<(), AppError>> = Vec::new();
        assert!(settle_all(tasks).is_empty());
    }
}
