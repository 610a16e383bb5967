//! Host drivers that invoke adapted callables per element or per call.
//!
//! Every driver stops at the first [`UnrecoverableError`] and returns it.
//! The parallel variants run on rayon's global pool; adapted callables hold
//! no mutable state, so sharing one across workers needs no locking.

use rayon::prelude::*;

use crate::adapter::{AdaptedAction, AdaptedReceiver, AdaptedTransformer};
use crate::error::UnrecoverableError;

pub fn for_each<I, A>(items: I, receiver: &AdaptedReceiver<A>) -> Result<(), UnrecoverableError>
where
    I: IntoIterator<Item = A>,
{
    items.into_iter().try_for_each(|item| receiver.run(item))
}

/// Parallel [`for_each`]. Elements already in flight when one fails still
/// complete; no new ones are started.
pub fn par_for_each<I, A>(items: I, receiver: &AdaptedReceiver<A>) -> Result<(), UnrecoverableError>
where
    I: IntoParallelIterator<Item = A>,
    A: Send,
{
    items
        .into_par_iter()
        .try_for_each(|item| receiver.run(item))
}

pub fn map<I, A, T>(
    items: I,
    transformer: &AdaptedTransformer<A, T>,
) -> Result<Vec<T>, UnrecoverableError>
where
    I: IntoIterator<Item = A>,
{
    items.into_iter().map(|item| transformer.run(item)).collect()
}

/// Parallel [`map`]; output order follows input order.
pub fn par_map<I, A, T>(
    items: I,
    transformer: &AdaptedTransformer<A, T>,
) -> Result<Vec<T>, UnrecoverableError>
where
    I: IntoParallelIterator<Item = A>,
    A: Send,
    T: Send,
{
    items
        .into_par_iter()
        .map(|item| transformer.run(item))
        .collect()
}

pub fn repeat(times: usize, action: &AdaptedAction) -> Result<(), UnrecoverableError> {
    (0..times).try_for_each(|_| action.run())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::Adapter;
    use crate::error::WorkError;
    use crate::policy::ErrorPolicy;
    use crate::unit::{Action, Receiver, Transformer};
    use anyhow::{bail, ensure};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn recording_receiver(seen: &Arc<Mutex<Vec<i32>>>) -> Receiver<i32> {
        let seen = Arc::clone(seen);
        Receiver::new(move |n: i32| {
            ensure!(n != 3, "cannot store {n}");
            seen.lock().unwrap().push(n);
            Ok(())
        })
    }

    #[test]
    fn test_for_each_stops_at_first_fatal() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let store = Adapter::wrap_default(recording_receiver(&seen));

        let err = for_each(1..=5, &store).unwrap_err();

        assert_eq!(err.cause().to_string(), "cannot store 3");
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_for_each_continues_when_recovered() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let store = Adapter::wrap(
            recording_receiver(&seen),
            ErrorPolicy::log_and_continue(None),
        );

        for_each(1..=5, &store).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 4, 5]);
    }

    #[test]
    fn test_par_for_each_recovered_visits_all() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let store = Adapter::wrap(
            recording_receiver(&seen),
            ErrorPolicy::log_and_continue(None),
        );

        par_for_each((1..=100).collect::<Vec<i32>>(), &store).unwrap();

        let mut seen = seen.lock().unwrap().clone();
        seen.sort_unstable();
        assert_eq!(seen.len(), 99);
        assert!(!seen.contains(&3));
    }

    #[test]
    fn test_par_for_each_surfaces_fatal() {
        let store = Adapter::wrap_default(Receiver::new(|n: i32| {
            if n == 50 {
                bail!("bad element {n}");
            }
            Ok(())
        }));

        let err = par_for_each((0..100).collect::<Vec<i32>>(), &store).unwrap_err();
        assert_eq!(err.cause().to_string(), "bad element 50");
    }

    #[test]
    fn test_map_and_par_map_agree() {
        let parse = Adapter::wrap(
            Transformer::new(|s: &str| Ok(s.parse::<i32>()?)),
            ErrorPolicy::custom_or(Receiver::infallible(|_: WorkError| {}), 0),
        );
        let input = vec!["1", "x", "3"];

        assert_eq!(map(input.clone(), &parse).unwrap(), vec![1, 0, 3]);
        assert_eq!(par_map(input, &parse).unwrap(), vec![1, 0, 3]);
    }

    #[test]
    fn test_repeat_counts_and_aborts() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let tick = Adapter::wrap_default(Action::new(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            ensure!(n < 3, "tick {n} over budget");
            Ok(())
        }));

        let err = repeat(10, &tick).unwrap_err();
        assert_eq!(err.cause().to_string(), "tick 3 over budget");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
