pub mod store;

pub use store::{MemoError, MemoId, MemoStore};
