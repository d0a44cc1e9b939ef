//! Roadnet CLI -- the line-oriented command layer over [`roadnet_core`].
//!
//! [`command::Command`] parses one protocol line and
//! [`session::Session`] runs a stream of them against a single network,
//! printing descriptions to stdout and `ERROR <line>` reports to stderr.

pub mod command;
pub mod session;
