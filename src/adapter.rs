//! Adapting fallible units of work into callables that never surface a
//! [`WorkError`].
//!
//! Every adapted type keeps its source's shape and binds exactly one
//! [`ErrorPolicy`] for its whole lifetime. Invocation returns
//! `Result<_, UnrecoverableError>`; a `WorkError` is always settled by the
//! policy first.

use crate::error::UnrecoverableError;
use crate::policy::ErrorPolicy;
use crate::shape::{Shape, Shaped};
use crate::unit::{Action, Producer, Receiver, Transformer, UnitOfWork};

/// A unit of work that can be bound to a policy.
pub trait Adaptable: Shaped + Sized {
    /// Result type of the shape, `()` when void-compatible.
    type Output;
    type Adapted: Shaped;

    fn adapt(self, policy: ErrorPolicy<Self::Output>) -> Self::Adapted;
}

/// Entry point for adaptation.
#[derive(Debug)]
pub struct Adapter;

impl Adapter {
    pub fn wrap<W: Adaptable>(work: W, policy: ErrorPolicy<W::Output>) -> W::Adapted {
        work.adapt(policy)
    }

    /// Wrap with [`ErrorPolicy::Default`]: any failure is fatal.
    pub fn wrap_default<W: Adaptable>(work: W) -> W::Adapted {
        work.adapt(ErrorPolicy::Default)
    }
}

#[derive(Debug, Clone)]
pub struct AdaptedAction {
    unit: Action,
    policy: ErrorPolicy,
}

impl AdaptedAction {
    pub fn run(&self) -> Result<(), UnrecoverableError> {
        self.policy.apply(self.unit.run())
    }
}

#[derive(Debug)]
pub struct AdaptedProducer<T> {
    unit: Producer<T>,
    policy: ErrorPolicy<T>,
}

impl<T> AdaptedProducer<T> {
    pub fn run(&self) -> Result<T, UnrecoverableError> {
        self.policy.apply(self.unit.run())
    }
}

#[derive(Debug)]
pub struct AdaptedReceiver<A> {
    unit: Receiver<A>,
    policy: ErrorPolicy,
}

impl<A> AdaptedReceiver<A> {
    pub fn run(&self, arg: A) -> Result<(), UnrecoverableError> {
        self.policy.apply(self.unit.run(arg))
    }
}

#[derive(Debug)]
pub struct AdaptedTransformer<A, T> {
    unit: Transformer<A, T>,
    policy: ErrorPolicy<T>,
}

impl<A, T> AdaptedTransformer<A, T> {
    pub fn run(&self, arg: A) -> Result<T, UnrecoverableError> {
        self.policy.apply(self.unit.run(arg))
    }
}

impl<T> Clone for AdaptedProducer<T> {
    fn clone(&self) -> Self {
        AdaptedProducer {
            unit: self.unit.clone(),
            policy: self.policy.clone(),
        }
    }
}

impl<A> Clone for AdaptedReceiver<A> {
    fn clone(&self) -> Self {
        AdaptedReceiver {
            unit: self.unit.clone(),
            policy: self.policy.clone(),
        }
    }
}

impl<A, T> Clone for AdaptedTransformer<A, T> {
    fn clone(&self) -> Self {
        AdaptedTransformer {
            unit: self.unit.clone(),
            policy: self.policy.clone(),
        }
    }
}

impl Shaped for AdaptedAction {
    const SHAPE: Shape = Shape::ACTION;
}

impl<T> Shaped for AdaptedProducer<T> {
    const SHAPE: Shape = Shape::PRODUCER;
}

impl<A> Shaped for AdaptedReceiver<A> {
    const SHAPE: Shape = Shape::RECEIVER;
}

impl<A, T> Shaped for AdaptedTransformer<A, T> {
    const SHAPE: Shape = Shape::TRANSFORMER;
}

impl Adaptable for Action {
    type Output = ();
    type Adapted = AdaptedAction;

    fn adapt(self, policy: ErrorPolicy) -> AdaptedAction {
        AdaptedAction { unit: self, policy }
    }
}

impl<T> Adaptable for Producer<T> {
    type Output = T;
    type Adapted = AdaptedProducer<T>;

    fn adapt(self, policy: ErrorPolicy<T>) -> AdaptedProducer<T> {
        AdaptedProducer { unit: self, policy }
    }
}

impl<A> Adaptable for Receiver<A> {
    type Output = ();
    type Adapted = AdaptedReceiver<A>;

    fn adapt(self, policy: ErrorPolicy) -> AdaptedReceiver<A> {
        AdaptedReceiver { unit: self, policy }
    }
}

impl<A, T> Adaptable for Transformer<A, T> {
    type Output = T;
    type Adapted = AdaptedTransformer<A, T>;

    fn adapt(self, policy: ErrorPolicy<T>) -> AdaptedTransformer<A, T> {
        AdaptedTransformer { unit: self, policy }
    }
}

/// Adapted counterpart of [`UnitOfWork`], variant for variant.
#[derive(Debug)]
pub enum AdaptedCallable<A, T> {
    Action(AdaptedAction),
    Producer(AdaptedProducer<T>),
    Receiver(AdaptedReceiver<A>),
    Transformer(AdaptedTransformer<A, T>),
}

impl<A, T> AdaptedCallable<A, T> {
    pub fn shape(&self) -> Shape {
        match self {
            AdaptedCallable::Action(_) => Shape::ACTION,
            AdaptedCallable::Producer(_) => Shape::PRODUCER,
            AdaptedCallable::Receiver(_) => Shape::RECEIVER,
            AdaptedCallable::Transformer(_) => Shape::TRANSFORMER,
        }
    }

    pub fn as_producer(&self) -> Option<&AdaptedProducer<T>> {
        match self {
            AdaptedCallable::Producer(callable) => Some(callable),
            _ => None,
        }
    }
}

impl<A, T: 'static> UnitOfWork<A, T> {
    /// Adapt whichever variant this is. Void-compatible variants get the
    /// policy via [`ErrorPolicy::discarding`].
    pub fn adapt(self, policy: ErrorPolicy<T>) -> AdaptedCallable<A, T> {
        match self {
            UnitOfWork::Action(unit) => AdaptedCallable::Action(unit.adapt(policy.discarding())),
            UnitOfWork::Producer(unit) => AdaptedCallable::Producer(unit.adapt(policy)),
            UnitOfWork::Receiver(unit) => {
                AdaptedCallable::Receiver(unit.adapt(policy.discarding()))
            }
            UnitOfWork::Transformer(unit) => AdaptedCallable::Transformer(unit.adapt(policy)),
        }
    }
}
