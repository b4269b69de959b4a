//! Unit tests for the ticket lifecycle module.
