mod auth;
mod backend;
mod oauth;
pub mod web;

pub use auth::Permission;
