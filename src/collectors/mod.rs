//! Collector implementation units and the loaders that provide them.
//!
//! The numeric collectors themselves live outside this crate. Each generation
//! of an operation is exposed as a [`CollectorUnit`]: a fixed table of named
//! functions that take [`CallArgs`] and return a JSON value.

mod args;
mod loader;
mod unit;

pub use args::{ArgError, CallArgs};
pub use loader::{CachingLoader, ImplementationLoader, LoadError, StaticLoader};
pub use unit::{CollectorFn, CollectorUnit, CollectorUnitBuilder, InvocationError, UnitId};
