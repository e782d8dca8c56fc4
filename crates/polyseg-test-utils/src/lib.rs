//! Fixture types and helpers for polyseg development.
//!
//! Provides a [`Probe`] base capability with three concrete types of
//! different sizes ([`Scale`], [`Offset`], [`Negate`]), plus a [`ProbeSink`]
//! trait so the same fill routine can drive every collection under test.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{
    fill_round_robin, kind_runs, observe, Kind, Negate, Offset, Probe, ProbeSink, Scale,
};
