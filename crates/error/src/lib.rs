//! Error handling types and utilities for the tyreg project.
//!
//! # Error Conventions
//!
//! Compiler phases call into the registry directly, so every failure is a
//! variant of a concrete enum that callers can match on. Only the CLI turns
//! these into rendered diagnostics.
//!
//! # Recoverable and Fatal Failures
//!
//! Only failures that a caller can _act on_ are represented here. These are
//! problems with the target configuration (which abort compiler
//! initialization), and conversions from untrusted raw data into the
//! registry's types. Asking the registry about a type it does not know is a
//! bug in the caller, and is reported by panicking rather than by returning
//! one of these errors.

#![warn(clippy::all, clippy::cargo, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)] // Allows for better API naming
#![allow(clippy::multiple_crate_versions)] // Enforced by our dependencies

pub mod registry;
