//! Shared building blocks: the lock alias used across the crate and the scan direction.

mod atomic;
mod sort_order;

pub use atomic::*;
pub use sort_order::*;
