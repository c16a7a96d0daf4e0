#![doc = include_str!("../README.md")]

pub mod auth;
pub mod client;
pub mod error;

pub use error::TextAnalyticsError;
