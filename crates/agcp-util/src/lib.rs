#![forbid(unsafe_code)]
//! Filesystem, hashing, text and process helpers for agcp.

pub mod error;
pub mod fs;
pub mod hash;
pub mod process;
pub mod text;
