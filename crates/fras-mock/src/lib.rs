//! Locally synthesised data for the FRAS client.
//!
//! [`MockSupplier`] implements both [`RecordSupplier`] and [`ServiceDesk`]
//! without any backend. The pure generators in [`generate`] take the clock,
//! zone and random source as arguments so they can be pinned down in tests.
//!
//! [`RecordSupplier`]: fras_core::supplier::RecordSupplier
//! [`ServiceDesk`]: fras_core::supplier::ServiceDesk

pub mod generate;
mod supplier;

pub use supplier::{DEFAULT_SUBMIT_LATENCY, MockSupplier};
