//! Scrawl - a minimal blog platform backend
//!
//! This library provides the REST API, services, and persistence layer
//! for the Scrawl blog system.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
