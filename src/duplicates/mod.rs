//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based file grouping (phase 1)
//! - SHA-256 confirmation of same-size candidates (phase 2)
//! - Duplicate group management

pub mod finder;
pub mod groups;

pub use finder::{DuplicateFinder, FinderConfig};
pub use groups::{group_by_size, DuplicateGroup, GroupView, GroupingStats, SizeBuckets, SizeGroup};
