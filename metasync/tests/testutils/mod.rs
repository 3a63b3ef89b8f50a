//! Test utilities for metasync integration tests
//!
//! - SyncFixture: snapshot source + memory store + reconciler wiring
//! - faulty_source: source decorators that fail, stall or panic on demand

#![allow(dead_code)]

pub mod faulty_source;
pub mod sync_fixture;
