//! Runtime orchestration for the cooperative heist engine.
//!
//! `heist-runtime` wires the pure rules engine from `heist-core` to the
//! outside world: room documents and their persistence, asynchronous
//! choice providers, and the single-writer [`Session`] driver that
//! applies actions and persists results.
//!
//! Modules are organized by responsibility:
//! - [`room`] defines the stored room envelope around the game document
//! - [`repository`] provides the persistence contract and reference impls
//! - [`provider`] sources secondary player choices asynchronously
//! - [`session`] hosts the write-path driver
pub mod error;
pub mod provider;
pub mod repository;
pub mod room;
pub mod session;

pub use error::{Result, RuntimeError};
pub use provider::{ChoiceProvider, FirstOptionProvider, ScriptedProvider};
pub use repository::{
    FileStateRepository, InMemoryStateRepo, RepositoryError, StateRepository,
};
pub use room::{Phase, Room};
pub use session::Session;
