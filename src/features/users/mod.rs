pub mod dtos;
pub mod guards;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
