//! Core types for slot-aware class-name variants.
//!
//! This crate provides the foundational types used across the twv crates:
//! - Class lists and slot maps
//! - Variant values
//! - Slot sets
//! - The merger contract
//! - Error types

pub mod class_list;
pub mod errors;
pub mod merge;
pub mod slots;
pub mod value;

pub use class_list::*;
pub use errors::*;
pub use merge::*;
pub use slots::*;
pub use value::*;
