mod backend;
pub mod web;
