//! Data models for packages and manifests

mod manifest;
mod package;

pub use manifest::*;
pub use package::*;
