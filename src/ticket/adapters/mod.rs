//! Adapter implementations for ticket lifecycle ports.

pub mod memory;
pub mod postgres;
