//! Filesystem tools for file operations
//!
//! Every tool here resolves its path through the sandbox before touching the
//! filesystem.

mod delete;
mod edit;
mod list;
mod read;
mod search;
mod write;

pub use delete::DeleteFile;
pub use edit::EditFile;
pub use list::{ListDirectory, EMPTY_DIRECTORY};
pub use read::ReadFile;
pub use search::{SearchFiles, MAX_SEARCH_RESULTS, NO_MATCHES};
pub use write::WriteFile;
