//! Text rendering of assembled trees for logs and debugging.
pub mod trace;
