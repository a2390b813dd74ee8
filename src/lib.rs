//! Handoff: a local-first letter-of-instruction builder.
//!
//! The interview state model lives in [`domain`], the document compilers and
//! export coordination in [`application`], and persistence plus the PDF byte
//! stream writer in [`infra`]. The binary in `main.rs` is a thin driver; all
//! behavior worth testing is reachable from this library crate.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
