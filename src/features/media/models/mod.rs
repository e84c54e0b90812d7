mod media;

pub use media::{Media, MediaSizes, MediaVariant};
