//! Outbound adapters implementing the domain's driven ports.
//!
//! - **memory**: transactional in-memory store with round-trip accounting

pub mod memory;
