//! Shape classification for units of work and their adapted callables.
//!
//! A shape is the pair (arity, returns-value). Two shapes are equal exactly
//! when an inline closure written for one would also fit the other, so the
//! shape is what overload admission and resolution key on.

use std::fmt;

/// Number of arguments a unit of work takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    Nullary,
    Unary,
}

/// Whether a unit of work produces a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Returns {
    /// Void-compatible: the body is run for its effect only.
    Nothing,
    /// Value-compatible: the body yields a result.
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    pub arity: Arity,
    pub returns: Returns,
}

impl Shape {
    pub const ACTION: Shape = Shape::new(Arity::Nullary, Returns::Nothing);
    pub const PRODUCER: Shape = Shape::new(Arity::Nullary, Returns::Value);
    pub const RECEIVER: Shape = Shape::new(Arity::Unary, Returns::Nothing);
    pub const TRANSFORMER: Shape = Shape::new(Arity::Unary, Returns::Value);

    /// All four shapes, in declaration order.
    pub const ALL: [Shape; 4] = [
        Shape::ACTION,
        Shape::PRODUCER,
        Shape::RECEIVER,
        Shape::TRANSFORMER,
    ];

    pub const fn new(arity: Arity, returns: Returns) -> Self {
        Shape { arity, returns }
    }

    pub fn is_void_compatible(&self) -> bool {
        self.returns == Returns::Nothing
    }

    pub fn is_value_compatible(&self) -> bool {
        self.returns == Returns::Value
    }

    /// Conventional name of the shape, e.g. `producer`.
    pub fn name(&self) -> &'static str {
        match (self.arity, self.returns) {
            (Arity::Nullary, Returns::Nothing) => "action",
            (Arity::Nullary, Returns::Value) => "producer",
            (Arity::Unary, Returns::Nothing) => "receiver",
            (Arity::Unary, Returns::Value) => "transformer",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let signature = match (self.arity, self.returns) {
            (Arity::Nullary, Returns::Nothing) => "() -> ()",
            (Arity::Nullary, Returns::Value) => "() -> T",
            (Arity::Unary, Returns::Nothing) => "(A) -> ()",
            (Arity::Unary, Returns::Value) => "(A) -> T",
        };
        write!(f, "{} {}", self.name(), signature)
    }
}

/// Implemented by every type with a fixed shape.
pub trait Shaped {
    const SHAPE: Shape;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapes_are_distinct() {
        for (i, a) in Shape::ALL.iter().enumerate() {
            for b in &Shape::ALL[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_void_and_value_compatibility() {
        assert!(Shape::ACTION.is_void_compatible());
        assert!(Shape::RECEIVER.is_void_compatible());
        assert!(Shape::PRODUCER.is_value_compatible());
        assert!(Shape::TRANSFORMER.is_value_compatible());
        assert!(!Shape::ACTION.is_value_compatible());
    }

    #[test]
    fn test_display() {
        assert_eq!(Shape::PRODUCER.to_string(), "producer () -> T");
        assert_eq!(Shape::RECEIVER.to_string(), "receiver (A) -> ()");
    }
}
