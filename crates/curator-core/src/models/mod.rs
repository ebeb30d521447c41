//! Data models for parsed cards and configuration.

pub mod card;
pub mod config;
