//! Core types for turnguard.

pub mod message;
pub mod turn;

pub use message::*;
pub use turn::*;
