//! Core library for tagver.
//!
//! Derives semantic versions from a git repository's tags and working tree
//! state, and creates release tags.
//!
//! # Modules
//!
//! - [`git`] - Repository access traits and the libgit2 implementation
//! - [`version`] - Version tag parsing, precedence and bumping
//! - [`tag_index`] - Commit to tag name index
//! - [`guide`] - Distance to the nearest tagged ancestor
//! - [`latest`] - Latest reachable release
//! - [`dirty`] - Working tree modification time
//! - [`describe`] - Floating development versions
//! - [`bump`] - Release tag creation
//! - [`config`] - Configuration loading and management
//! - [`error`] - Configuration error types
//!
//! # Quick Start
//!
//! ```no_run
//! use tagver_core::describe::{DescribeOptions, describe};
//! use tagver_core::git::GitRepository;
//!
//! let repo = GitRepository::open(".").expect("not a git repository");
//! let description = describe(&repo, DescribeOptions::default()).expect("describe failed");
//! println!("{}", description.resolved);
//! ```
#![deny(unsafe_code)]

pub mod bump;

pub mod config;

pub mod describe;

pub mod dirty;

pub mod error;

pub mod git;

pub mod guide;

pub mod latest;

pub mod tag_index;

pub mod version;

pub use config::{Config, ConfigLoader, LogLevel};

pub use error::{ConfigError, ConfigResult};

// Re-export semver so downstream crates don't need a direct dependency.
pub use semver;
