//! Quality-ticket lifecycle management.
//!
//! Tickets are filed against a work order, receive a `<work order>-<seq>`
//! identifier, and move between Open, InProgress, and Closed. Every close
//! appends a closure cycle, so a ticket reopened and closed again keeps its
//! full history. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
