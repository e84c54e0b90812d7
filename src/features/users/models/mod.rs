mod user;

pub use user::{AuthenticatedUser, User};
