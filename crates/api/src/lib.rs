//! HTTP API for the trivia question bank: configuration, routing, and
//! request/response mapping.

pub mod app;
pub mod config;
pub mod middleware;
