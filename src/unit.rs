//! Units of work: deferred, possibly failing computations of a fixed shape.
//!
//! Each variant stores its closure behind an `Arc`, so a unit can be cloned
//! and invoked any number of times, from any thread. Bodies return
//! `anyhow::Result`, which lets them use `?` on whatever error they hit; the
//! failure surfaces to callers as a [`WorkError`].
//!
//! Fallible and infallible bodies of the same shape get different
//! constructor names (`new` / `infallible`) rather than sharing one.

use std::fmt;
use std::sync::Arc;

use crate::error::WorkError;
use crate::shape::{Shape, Shaped};

type ActionFn = dyn Fn() -> anyhow::Result<()> + Send + Sync;
type ProducerFn<T> = dyn Fn() -> anyhow::Result<T> + Send + Sync;
type ReceiverFn<A> = dyn Fn(A) -> anyhow::Result<()> + Send + Sync;
type TransformerFn<A, T> = dyn Fn(A) -> anyhow::Result<T> + Send + Sync;

/// Zero arguments, no result.
#[derive(Clone)]
pub struct Action {
    body: Arc<ActionFn>,
}

impl Action {
    pub fn new<F>(body: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Action {
            body: Arc::new(body),
        }
    }

    pub fn infallible<F>(body: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Action::new(move || {
            body();
            Ok(())
        })
    }

    pub fn run(&self) -> Result<(), WorkError> {
        (self.body)().map_err(WorkError::new)
    }
}

/// Zero arguments, returns `T`.
pub struct Producer<T> {
    body: Arc<ProducerFn<T>>,
}

impl<T> Producer<T> {
    pub fn new<F>(body: F) -> Self
    where
        F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
    {
        Producer {
            body: Arc::new(body),
        }
    }

    pub fn infallible<F>(body: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Producer::new(move || Ok(body()))
    }

    pub fn run(&self) -> Result<T, WorkError> {
        (self.body)().map_err(WorkError::new)
    }
}

/// One argument, no result.
pub struct Receiver<A> {
    body: Arc<ReceiverFn<A>>,
}

impl<A> Receiver<A> {
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(A) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Receiver {
            body: Arc::new(body),
        }
    }

    pub fn infallible<F>(body: F) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Receiver::new(move |arg| {
            body(arg);
            Ok(())
        })
    }

    pub fn run(&self, arg: A) -> Result<(), WorkError> {
        (self.body)(arg).map_err(WorkError::new)
    }
}

/// One argument, returns `T`.
pub struct Transformer<A, T> {
    body: Arc<TransformerFn<A, T>>,
}

impl<A, T> Transformer<A, T> {
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(A) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        Transformer {
            body: Arc::new(body),
        }
    }

    pub fn infallible<F>(body: F) -> Self
    where
        F: Fn(A) -> T + Send + Sync + 'static,
    {
        Transformer::new(move |arg| Ok(body(arg)))
    }

    pub fn run(&self, arg: A) -> Result<T, WorkError> {
        (self.body)(arg).map_err(WorkError::new)
    }
}

impl<T> Clone for Producer<T> {
    fn clone(&self) -> Self {
        Producer {
            body: Arc::clone(&self.body),
        }
    }
}

impl<A> Clone for Receiver<A> {
    fn clone(&self) -> Self {
        Receiver {
            body: Arc::clone(&self.body),
        }
    }
}

impl<A, T> Clone for Transformer<A, T> {
    fn clone(&self) -> Self {
        Transformer {
            body: Arc::clone(&self.body),
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").finish_non_exhaustive()
    }
}

impl<T> fmt::Debug for Producer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer").finish_non_exhaustive()
    }
}

impl<A> fmt::Debug for Receiver<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Receiver").finish_non_exhaustive()
    }
}

impl<A, T> fmt::Debug for Transformer<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transformer").finish_non_exhaustive()
    }
}

impl Shaped for Action {
    const SHAPE: Shape = Shape::ACTION;
}

impl<T> Shaped for Producer<T> {
    const SHAPE: Shape = Shape::PRODUCER;
}

impl<A> Shaped for Receiver<A> {
    const SHAPE: Shape = Shape::RECEIVER;
}

impl<A, T> Shaped for Transformer<A, T> {
    const SHAPE: Shape = Shape::TRANSFORMER;
}

/// The closed set of unit shapes, for call sites that pick the variant at
/// runtime (e.g. dispatch through an [`OverloadSet`](crate::OverloadSet)).
#[derive(Debug)]
pub enum UnitOfWork<A, T> {
    Action(Action),
    Producer(Producer<T>),
    Receiver(Receiver<A>),
    Transformer(Transformer<A, T>),
}

impl<A, T> UnitOfWork<A, T> {
    pub fn shape(&self) -> Shape {
        match self {
            UnitOfWork::Action(_) => Shape::ACTION,
            UnitOfWork::Producer(_) => Shape::PRODUCER,
            UnitOfWork::Receiver(_) => Shape::RECEIVER,
            UnitOfWork::Transformer(_) => Shape::TRANSFORMER,
        }
    }
}

impl<A, T> Clone for UnitOfWork<A, T> {
    fn clone(&self) -> Self {
        match self {
            UnitOfWork::Action(unit) => UnitOfWork::Action(unit.clone()),
            UnitOfWork::Producer(unit) => UnitOfWork::Producer(unit.clone()),
            UnitOfWork::Receiver(unit) => UnitOfWork::Receiver(unit.clone()),
            UnitOfWork::Transformer(unit) => UnitOfWork::Transformer(unit.clone()),
        }
    }
}

impl<A, T> From<Action> for UnitOfWork<A, T> {
    fn from(unit: Action) -> Self {
        UnitOfWork::Action(unit)
    }
}

impl<A, T> From<Producer<T>> for UnitOfWork<A, T> {
    fn from(unit: Producer<T>) -> Self {
        UnitOfWork::Producer(unit)
    }
}

impl<A, T> From<Receiver<A>> for UnitOfWork<A, T> {
    fn from(unit: Receiver<A>) -> Self {
        UnitOfWork::Receiver(unit)
    }
}

impl<A, T> From<Transformer<A, T>> for UnitOfWork<A, T> {
    fn from(unit: Transformer<A, T>) -> Self {
        UnitOfWork::Transformer(unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_failure_is_distinct_from_unit_success() {
        let ok = Action::new(|| Ok(()));
        let failing = Action::new(|| bail!("disk full"));

        assert!(ok.run().is_ok());
        let err = failing.run().unwrap_err();
        assert_eq!(err.cause().to_string(), "disk full");
    }

    #[test]
    fn test_units_are_reusable() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let producer = Producer::infallible(move || counter.fetch_add(1, Ordering::SeqCst) + 1);

        assert_eq!(producer.run().unwrap(), 1);
        assert_eq!(producer.clone().run().unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_question_mark_inside_bodies() {
        let parse = Transformer::new(|input: &'static str| Ok(input.trim().parse::<i32>()?));

        assert_eq!(parse.run(" 42 ").unwrap(), 42);
        let err = parse.run("forty-two").unwrap_err();
        assert!(err.cause().downcast_ref::<std::num::ParseIntError>().is_some());
    }

    #[test]
    fn test_receiver_sees_argument() {
        let seen = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&seen);
        let receiver = Receiver::infallible(move |n: usize| {
            sink.fetch_add(n, Ordering::SeqCst);
        });

        receiver.run(3).unwrap();
        receiver.run(4).unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_tagged_variant_shapes() {
        let units: Vec<UnitOfWork<i32, i32>> = vec![
            Action::infallible(|| {}).into(),
            Producer::infallible(|| 1).into(),
            Receiver::infallible(|_: i32| {}).into(),
            Transformer::infallible(|x: i32| x + 1).into(),
        ];

        let shapes: Vec<Shape> = units.iter().map(UnitOfWork::shape).collect();
        assert_eq!(shapes, Shape::ALL.to_vec());
    }
}
