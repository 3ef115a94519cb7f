//! Validated request structures organised by resource.

pub mod article;

pub use article::*;
