//! # Work Adapter
//!
//! Pass fallible closures into an API without leaking their errors and
//! without ambiguous overloads.
//!
//! ## Pieces
//!
//! 1. **Units of work** - `Action`, `Producer<T>`, `Receiver<A>`,
//!    `Transformer<A, T>`: one type per (arity, returns-value) shape
//! 2. **Error policies** - `ErrorPolicy::Default` escalates, `Custom`
//!    handlers may recover
//! 3. **Adapter** - binds a unit to a policy; the result only ever fails
//!    with `UnrecoverableError`
//! 4. **Overload sets** - admit one entry point per shape for an operation
//! 5. **Drivers** - `for_each`, `map` and their rayon counterparts
//!
//! ## Example
//!
//! ```
//! use work_adapter::{drive, Adapter, ErrorPolicy, Receiver, WorkError};
//!
//! let store = Adapter::wrap(
//!     Receiver::new(|line: &str| {
//!         let n: i32 = line.parse()?;
//!         anyhow::ensure!(n >= 0, "negative: {n}");
//!         Ok(())
//!     }),
//!     ErrorPolicy::custom(Receiver::infallible(|err: WorkError| {
//!         eprintln!("skipping: {err}");
//!     })),
//! );
//!
//! drive::for_each(["1", "x", "-2", "4"], &store).unwrap();
//! ```

pub mod adapter;
pub mod config;
pub mod drive;
pub mod error;
pub mod overload;
pub mod policy;
pub mod shape;
pub mod unit;

pub use adapter::{
    Adaptable, AdaptedAction, AdaptedCallable, AdaptedProducer, AdaptedReceiver,
    AdaptedTransformer, Adapter,
};
pub use config::{FailureMode, PolicyConfig};
pub use error::{ConfigError, OverloadError, PolicyError, UnrecoverableError, WorkError};
pub use overload::{EntryPoint, OverloadSet, OverloadSetBuilder, Raises, Target};
pub use policy::ErrorPolicy;
pub use shape::{Arity, Returns, Shape, Shaped};
pub use unit::{Action, Producer, Receiver, Transformer, UnitOfWork};
