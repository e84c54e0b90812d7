mod token_service;
mod user_service;

pub use token_service::TokenService;
pub use user_service::UserService;
