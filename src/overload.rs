//! Overload admission.
//!
//! An [`OverloadSet`] groups the entry points of one logical operation. A
//! closure written at the call site only carries its shape, so entries may
//! share the operation name only when their shapes differ. Whether an entry
//! may raise is invisible at the call site and never disambiguates.
//! Entries whose target operation is itself generic cannot be written as a
//! closure and are refused outright.

use tracing::debug;

use crate::adapter::AdaptedCallable;
use crate::error::OverloadError;
use crate::policy::ErrorPolicy;
use crate::shape::{Shape, Shaped};
use crate::unit::UnitOfWork;

/// Error declaration of an entry point's accepted unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Raises {
    /// The unit may fail with a recoverable error.
    Checked,
    Never,
}

/// What kind of value the entry point's parameter is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// A unit of fixed shape; an inline closure fits.
    Concrete,
    /// An operation generic over a type the entry point does not fix. No
    /// closure can implement it.
    GenericOperation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    shape: Shape,
    raises: Raises,
    target: Target,
}

impl EntryPoint {
    pub fn new(shape: Shape) -> Self {
        EntryPoint {
            shape,
            raises: Raises::Checked,
            target: Target::Concrete,
        }
    }

    pub fn of<W: Shaped>() -> Self {
        EntryPoint::new(W::SHAPE)
    }

    pub fn raises(mut self, raises: Raises) -> Self {
        self.raises = raises;
        self
    }

    pub fn target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn raise_declaration(&self) -> Raises {
        self.raises
    }

    pub fn target_kind(&self) -> Target {
        self.target
    }
}

#[derive(Debug, Clone)]
pub struct OverloadSet {
    operation: String,
    entries: Vec<EntryPoint>,
}

impl OverloadSet {
    pub fn builder(operation: impl Into<String>) -> OverloadSetBuilder {
        OverloadSetBuilder {
            operation: operation.into(),
            entries: Vec::new(),
        }
    }

    /// One checked entry point per shape.
    pub fn standard(operation: impl Into<String>) -> Self {
        OverloadSet {
            operation: operation.into(),
            entries: Shape::ALL.iter().copied().map(EntryPoint::new).collect(),
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn entries(&self) -> &[EntryPoint] {
        &self.entries
    }

    /// Admission guarantees at most one match.
    pub fn resolve(&self, shape: Shape) -> Option<&EntryPoint> {
        self.entries.iter().find(|entry| entry.shape == shape)
    }

    pub fn resolve_for<W: Shaped>(&self) -> Option<&EntryPoint> {
        self.resolve(W::SHAPE)
    }

    /// Resolve the unit's shape against this set and adapt it.
    pub fn bind<A, T: 'static>(
        &self,
        work: UnitOfWork<A, T>,
        policy: ErrorPolicy<T>,
    ) -> Result<AdaptedCallable<A, T>, OverloadError> {
        let shape = work.shape();
        if self.resolve(shape).is_none() {
            return Err(OverloadError::NoMatch {
                operation: self.operation.clone(),
                shape,
            });
        }
        Ok(work.adapt(policy))
    }
}

#[derive(Debug, Clone)]
pub struct OverloadSetBuilder {
    operation: String,
    entries: Vec<EntryPoint>,
}

impl OverloadSetBuilder {
    pub fn entry(mut self, entry: EntryPoint) -> Self {
        self.entries.push(entry);
        self
    }

    /// Shorthand for a checked, concrete entry accepting `W`.
    pub fn accept<W: Shaped>(self) -> Self {
        self.entry(EntryPoint::of::<W>())
    }

    pub fn build(self) -> Result<OverloadSet, OverloadError> {
        if self.entries.is_empty() {
            return Err(OverloadError::Empty {
                operation: self.operation,
            });
        }

        for (i, entry) in self.entries.iter().enumerate() {
            if entry.target == Target::GenericOperation {
                return Err(OverloadError::GenericTarget {
                    operation: self.operation,
                    shape: entry.shape,
                });
            }
            if self.entries[..i].iter().any(|prior| prior.shape == entry.shape) {
                let suggestion = match entry.raises {
                    Raises::Checked => format!("{}_checked", self.operation),
                    Raises::Never => format!("{}_infallible", self.operation),
                };
                return Err(OverloadError::Forbidden {
                    operation: self.operation,
                    shape: entry.shape,
                    suggestion,
                });
            }
        }

        debug!(
            operation = %self.operation,
            entries = self.entries.len(),
            "overload set admitted"
        );
        Ok(OverloadSet {
            operation: self.operation,
            entries: self.entries,
        })
    }
}
