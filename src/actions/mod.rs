//! File actions module.
//!
//! This module turns detected duplicate groups into deletions:
//!
//! - [`delete`]: permanent in-place deletion, single file and batch
//! - [`resolve`]: resolution policies and the engine that applies them
//!
//! Deletion is permanent; files are not moved to a trash folder.
//!
//! ```no_run
//! use hashsweep::actions::{plan_group, GroupChoice, GroupPlan};
//! use hashsweep::duplicates::DuplicateFinder;
//! use std::path::PathBuf;
//!
//! let (groups, _stats) = DuplicateFinder::with_defaults().find_duplicates(&[PathBuf::from(".")]);
//! for group in &groups {
//!     if let Ok(GroupPlan::Delete { keep, remove }) = plan_group(group, GroupChoice::KeepNewest) {
//!         println!("keep {} and remove {} copies", keep.display(), remove.len());
//!     }
//! }
//! ```

pub mod delete;
pub mod resolve;

pub use delete::{
    delete_batch, permanent_delete, BatchDeleteResult, DeleteError, DeleteProgressCallback,
    DeleteResult, SilentCallback,
};
pub use resolve::{
    newest_index, plan_group, GroupChoice, GroupDecider, GroupPlan, KeepNewest, Policy,
    Resolution, ResolutionEngine, ResolveError,
};
