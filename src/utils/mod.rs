// src/utils/mod.rs
mod format;
mod io;

pub use format::*;
pub use io::*;

/// Bytes in one mebibyte
pub const MIB: u64 = 1024 * 1024;
