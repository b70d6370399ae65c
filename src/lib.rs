//! EERA skills client — remote skill dispatch and on-demand icon loading.
//!
//! ARCHITECTURE
//! ============
//! Two independent halves share one shape (name → async resolution → typed
//! result):
//!
//! - [`skills`] resolves a skill id against a registry, POSTs to the matching
//!   edge function and normalizes every failure into a [`skills::SkillOutcome`].
//! - [`loader`] resolves component names from a [`loader::ComponentLibrary`]
//!   with a process-wide cache and single-flight deduplication.
//!
//! Neither half panics across its public boundary.

pub mod error;
pub mod loader;
pub mod skills;

pub use error::ErrorCode;
