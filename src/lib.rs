//! # souschef
//!
//! Turns a free-text ingredient list into a structured recipe (title,
//! preparation time, ordered steps) with a generative model, keeps an
//! anonymous history of generations and lets signed-in users save favorites.
//!
//! ## Modules
//!
//! - `recipe` - Recipe data model and ingredient validation
//! - `flow` - Prompt template and generative model invocation
//! - `storage` - Append-only document store with access rules
//! - `persistence` - Detached history writes, favorites, persistence events
//! - `identity` - Identity provider and anonymous identity bootstrap
//! - `orchestrator` - Per-request pipeline and save policy
//! - `context` - Explicitly constructed application context
//! - `server` - axum HTTP surface
//! - `app` - Configuration, logging and runtime setup
//! - `testing` - Test doubles for the external collaborators
pub mod app;
pub mod context;
pub mod error;
pub mod flow;
pub mod identity;
pub mod messages;
pub mod orchestrator;
pub mod persistence;
pub mod recipe;
pub mod server;
pub mod storage;

pub mod testing;

pub use context::AppContext;
pub use error::{Error, Result};
