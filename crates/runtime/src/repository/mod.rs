//! Persistence for the shared room document.
//!
//! Rooms are stored wholesale under a last-write-wins contract; the
//! [`Session`](crate::session::Session) serializes writers, so a
//! repository never has to merge concurrent updates.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileStateRepository;
pub use memory::InMemoryStateRepo;
pub use traits::StateRepository;
