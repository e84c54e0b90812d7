pub mod dtos;
pub mod handlers;
pub mod models;
pub mod processing;
pub mod resolver;
pub mod routes;
pub mod services;
