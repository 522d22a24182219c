//! Shared foundational types used across the larch library archive tooling.
//!
//! This crate provides compilation target identifiers with their default
//! substitution tables, and dotted package names used to address metadata
//! inside a library archive.

#![warn(missing_docs)]

pub mod fq_name;
pub mod target;

pub use fq_name::FqName;
pub use target::{Architecture, Family, ParseTargetError, Target};
