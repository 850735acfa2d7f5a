//! Namespace registry and the dispatch front-end.

mod dispatcher;
mod error;
mod registry;

pub use dispatcher::Dispatcher;
pub use error::DispatchError;
pub use registry::{Namespace, NamespaceRegistry, RegistryError};
