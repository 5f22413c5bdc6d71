//! Duplicate group resolution.
//!
//! # Overview
//!
//! Resolution turns the detected duplicate groups into deletions under one
//! of three policies, chosen once per run:
//!
//! - [`Policy::Skip`]: nothing is touched.
//! - [`Policy::Auto`]: every group keeps its most recently modified file.
//! - [`Policy::Interactive`]: a [`GroupDecider`] picks a [`GroupChoice`] for
//!   each group in turn.
//!
//! The decision itself is the pure function [`plan_group`]; the
//! [`ResolutionEngine`] only drives it over the groups, applies the
//! resulting [`GroupPlan`], and returns the groups still unresolved as a new
//! collection.
//!
//! # Example
//!
//! ```no_run
//! use hashsweep::actions::resolve::{Policy, ResolutionEngine, KeepNewest};
//! use hashsweep::duplicates::DuplicateFinder;
//! use std::path::PathBuf;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, mut stats) = finder.find_duplicates(&[PathBuf::from(".")]);
//!
//! let resolution = ResolutionEngine::new(Policy::Auto).resolve(groups, &mut KeepNewest, &mut stats);
//! println!("freed {} bytes, {} groups left", stats.bytes_freed, resolution.remaining.len());
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::duplicates::DuplicateGroup;
use crate::stats::RunStats;

use super::delete::{delete_batch, BatchDeleteResult, DeleteProgressCallback, SilentCallback};

/// Resolution policy for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Ask for a choice per group.
    Interactive,
    /// Keep the newest file of every group.
    Auto,
    /// Detection only.
    Skip,
}

/// Decision for a single group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupChoice {
    /// Keep the member at this 0-based index, delete the others.
    Keep(usize),
    /// Keep the most recently modified member, delete the others.
    KeepNewest,
    /// Leave this group untouched and move on.
    Skip,
    /// Stop resolving; this and all later groups stay untouched.
    Abort,
}

/// Concrete actions for one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupPlan {
    /// Keep one file and delete the rest.
    Delete {
        /// File that survives
        keep: PathBuf,
        /// Files to remove, in group order
        remove: Vec<PathBuf>,
    },
    /// Leave the group as it is.
    Skip,
    /// Stop processing all remaining groups.
    Abort,
}

/// Errors from planning a group.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// A keep index outside the group.
    #[error("invalid file number {number}: choose between 1 and {len}")]
    IndexOutOfRange {
        /// 1-based number that was chosen
        number: usize,
        /// Number of files in the group
        len: usize,
    },

    /// The group has no files to keep.
    #[error("group is empty")]
    EmptyGroup,
}

/// Index of the most recently modified member.
///
/// Ties go to the earliest member.
#[must_use]
pub fn newest_index(group: &DuplicateGroup) -> Option<usize> {
    group
        .files
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, _)>, (i, file)| match best {
            Some((_, modified)) if modified >= file.modified => best,
            _ => Some((i, file.modified)),
        })
        .map(|(i, _)| i)
}

/// Turn a choice into concrete actions for `group`.
///
/// This performs no I/O.
///
/// # Errors
///
/// Returns [`ResolveError::IndexOutOfRange`] when a `Keep` index does not
/// name a member, and [`ResolveError::EmptyGroup`] when there is nothing to
/// keep.
pub fn plan_group(group: &DuplicateGroup, choice: GroupChoice) -> Result<GroupPlan, ResolveError> {
    let keep_index = match choice {
        GroupChoice::Skip => return Ok(GroupPlan::Skip),
        GroupChoice::Abort => return Ok(GroupPlan::Abort),
        GroupChoice::KeepNewest => newest_index(group).ok_or(ResolveError::EmptyGroup)?,
        GroupChoice::Keep(index) if index < group.len() => index,
        GroupChoice::Keep(index) => {
            return Err(ResolveError::IndexOutOfRange {
                number: index + 1,
                len: group.len(),
            })
        }
    };

    let keep = group.files[keep_index].path.clone();
    let remove = group
        .files
        .iter()
        .enumerate()
        .filter(|&(i, f)| i != keep_index && f.path != keep)
        .map(|(_, f)| f.path.clone())
        .collect();

    Ok(GroupPlan::Delete { keep, remove })
}

/// Source of per-group choices for the interactive policy.
pub trait GroupDecider {
    /// Choose what to do with `group`, shown as `position` of `total`
    /// (1-based). Members are ordered newest-first.
    fn decide(&mut self, group: &DuplicateGroup, position: usize, total: usize) -> GroupChoice;

    /// Called when the last choice could not be applied; `decide` is then
    /// asked again for the same group.
    fn reject(&mut self, _error: &ResolveError) {}
}

/// Decider that always keeps the newest file.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepNewest;

impl GroupDecider for KeepNewest {
    fn decide(&mut self, _group: &DuplicateGroup, _position: usize, _total: usize) -> GroupChoice {
        GroupChoice::KeepNewest
    }
}

/// Outcome of resolving a set of groups.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Groups skipped or never reached, in original order
    pub remaining: Vec<DuplicateGroup>,
    /// Groups on which a keep-one plan was carried out
    pub resolved: usize,
    /// Groups explicitly skipped
    pub skipped: usize,
    /// Whether the decider aborted the run
    pub aborted: bool,
    /// Whether a shutdown request cut resolution short
    pub interrupted: bool,
}

/// Drives a [`Policy`] over a set of duplicate groups.
pub struct ResolutionEngine<'a> {
    policy: Policy,
    callback: &'a dyn DeleteProgressCallback,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl std::fmt::Debug for ResolutionEngine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionEngine")
            .field("policy", &self.policy)
            .field("shutdown_flag", &self.shutdown_flag)
            .finish_non_exhaustive()
    }
}

impl<'a> ResolutionEngine<'a> {
    /// Create an engine for `policy` with no progress reporting.
    #[must_use]
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            callback: &SilentCallback,
            shutdown_flag: None,
        }
    }

    /// Report kept and deleted files to `callback`.
    #[must_use]
    pub fn with_callback(mut self, callback: &'a dyn DeleteProgressCallback) -> Self {
        self.callback = callback;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// The policy this engine applies.
    #[must_use]
    pub fn policy(&self) -> Policy {
        self.policy
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Resolve `groups` under the engine's policy.
    ///
    /// `decider` is only consulted by [`Policy::Interactive`]. Each group is
    /// sorted newest-first before it is decided on. Deletion failures are
    /// reported per file and never stop the run; only successful deletions
    /// reach `stats`. The shutdown flag is checked between groups.
    pub fn resolve(
        &self,
        groups: Vec<DuplicateGroup>,
        decider: &mut dyn GroupDecider,
        stats: &mut RunStats,
    ) -> Resolution {
        let mut resolution = Resolution::default();

        if self.policy == Policy::Skip {
            log::info!("Skipping file deletion");
            resolution.remaining = groups;
            return resolution;
        }

        let total = groups.len();
        let mut pending = groups.into_iter().enumerate();

        while let Some((index, mut group)) = pending.next() {
            if self.is_shutdown_requested() {
                log::info!("Resolution interrupted before group {}/{}", index + 1, total);
                resolution.interrupted = true;
                resolution.remaining.push(group);
                resolution.remaining.extend(pending.map(|(_, g)| g));
                break;
            }

            group.sort_newest_first();
            let plan = self.plan_for(&group, index + 1, total, decider);

            match plan {
                GroupPlan::Delete { keep, remove } => {
                    log::debug!(
                        "Group {}/{}: keeping {}, deleting {} file(s)",
                        index + 1,
                        total,
                        keep.display(),
                        remove.len()
                    );
                    self.callback.on_keep(&keep);
                    let remove = without_kept_file(&keep, remove);
                    let batch = delete_batch(&remove, self.callback);
                    record_batch(&batch, stats);
                    resolution.resolved += 1;
                }
                GroupPlan::Skip => {
                    log::debug!("Group {}/{}: skipped", index + 1, total);
                    resolution.skipped += 1;
                    resolution.remaining.push(group);
                }
                GroupPlan::Abort => {
                    log::info!("Resolution aborted at group {}/{}", index + 1, total);
                    resolution.aborted = true;
                    resolution.remaining.push(group);
                    resolution.remaining.extend(pending.map(|(_, g)| g));
                    break;
                }
            }
        }

        resolution.interrupted |= self.is_shutdown_requested();
        resolution
    }

    /// Ask for choices until one yields a valid plan.
    fn plan_for(
        &self,
        group: &DuplicateGroup,
        position: usize,
        total: usize,
        decider: &mut dyn GroupDecider,
    ) -> GroupPlan {
        loop {
            let choice = match self.policy {
                Policy::Interactive => decider.decide(group, position, total),
                Policy::Auto | Policy::Skip => GroupChoice::KeepNewest,
            };

            match plan_group(group, choice) {
                Ok(plan) => return plan,
                Err(ResolveError::EmptyGroup) => return GroupPlan::Skip,
                Err(e) => {
                    log::debug!("Rejected choice for group {}: {}", position, e);
                    decider.reject(&e);
                }
            }
        }
    }
}

/// Drop every path that resolves to the kept file itself.
fn without_kept_file(keep: &Path, remove: Vec<PathBuf>) -> Vec<PathBuf> {
    let kept = fs::canonicalize(keep).ok();
    remove
        .into_iter()
        .filter(|path| {
            let same = path == keep
                || kept
                    .as_ref()
                    .is_some_and(|k| fs::canonicalize(path).is_ok_and(|p| p == *k));
            if same {
                log::warn!("Not deleting {}: it is the file being kept", path.display());
            }
            !same
        })
        .collect()
}

/// Credit every confirmed deletion of a batch to `stats`.
fn record_batch(batch: &BatchDeleteResult, stats: &mut RunStats) {
    for deleted in &batch.successes {
        stats.record_deletion(deleted.size);
    }
}
