//! Core domain entities.
//!
//! - [`Link`] - A persisted short link
//! - [`NewLink`] - Insert payload for a link
//! - [`CreatedLink`] - Caller-facing view returned after creation
//! - [`Owner`] - The (possibly temporary) user a link belongs to

pub mod link;
pub mod owner;

pub use link::{CreatedLink, Link, NewLink};
pub use owner::Owner;
