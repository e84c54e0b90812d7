pub mod categories;
pub mod jobs;
pub mod media;
pub mod tags;
pub mod users;
