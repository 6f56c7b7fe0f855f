//! Haiku post storage and stream cursor persistence.

pub mod file;
pub mod memory;
pub mod table;
pub mod traits;

pub use file::{FileCursorStore, FilePostStore};
pub use memory::{MemoryCursorStore, MemoryPostStore};
pub use table::PostTable;
pub use traits::{CursorStore, PostReader, PostStore};
