//! Brezza: a compact self-hosted blog server built around shared
//! view-data composition and dependency-driven cache invalidation.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
