//! Storage module for media objects
//!
//! Provides a DigitalOcean Spaces (S3-compatible) client for uploading
//! and deleting stored media assets.

mod spaces_client;

pub use spaces_client::SpacesClient;
