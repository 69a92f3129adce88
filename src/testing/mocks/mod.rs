//! Mock implementations for testing

pub mod identity;
pub mod model;
pub mod store;

pub use identity::CountingIdentityProvider;
pub use model::ScriptedModel;
pub use store::{DelayedStore, FailingStore};
