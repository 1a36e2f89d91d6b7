// Library crate: the enclosure modeling core, its import/export collaborators and
// the headless harness used by integration tests and the command protocol.

pub mod attachment;
pub mod build;
pub mod command;
pub mod error;
pub mod export;
pub mod fixtures;
pub mod geometry;
pub mod harness;
pub mod import;
pub mod registry;
pub mod state;
pub mod validation;
pub mod workspace;

pub use error::{EnclosureError, Result};
pub use workspace::Workspace;
