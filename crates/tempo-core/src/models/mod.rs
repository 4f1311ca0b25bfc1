//! Data models.

pub mod config;
pub mod profile;
pub mod purchase;
