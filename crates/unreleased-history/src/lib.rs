//! History types for Unreleased.
//!
//! This crate provides the source-control types shared by every backend:
//! - [`Revision`]: One change on trunk, reduced to its day and message
//! - [`ReleaseTag`]: The tag (or svn revision) a release was cut from

mod revision;
mod tag;

pub use revision::Revision;
pub use tag::ReleaseTag;
