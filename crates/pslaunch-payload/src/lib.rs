//! Embedded script payload access and extraction.
//!
//! The launcher binary carries its script as a read-only blob addressed by a
//! fixed numeric ID. This crate looks the blob up ([`ResourceSource`]) and
//! copies it into a uniquely named temporary script file ([`TempScript`])
//! that is deleted when the guard goes away.

pub mod resource;
pub mod temp_script;

pub use resource::{BundledResource, ResourceSource};
#[cfg(windows)]
pub use resource::ModuleResource;
pub use temp_script::{TempScript, extract, extract_in, temp_dir};
