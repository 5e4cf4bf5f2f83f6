//! # Newsroom Core
//!
//! The domain layer of the newsroom platform: the article lifecycle engine,
//! its authorization rules, and the visibility filter for listings.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
