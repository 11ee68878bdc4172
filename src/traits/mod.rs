//! Trait definitions for OpenShift resources.
//!
//! Each resource type implements the traits it supports; link lookup and
//! dispatch live in the trait defaults.

mod refresh;
mod resource;

pub use refresh::Refresh;
pub use resource::Resource;
