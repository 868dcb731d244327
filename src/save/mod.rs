//! Member data storage
//!
//! Record type and the persistence collaborator interface.

pub mod record;
pub mod store;

pub use record::MemberRecord;
pub use store::{ExperienceStore, MemoryStore};
