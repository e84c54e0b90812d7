mod media_service;

pub use media_service::{stored_object_keys, MediaService};
