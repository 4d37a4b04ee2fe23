//! TrackForge - batch audio conversion with metadata-driven naming
//!
//! Converts audio files discovered under configured source directories
//! into a normalized MP3 output tree, deriving each output name from
//! resolved track metadata rather than the original filename.

pub mod config;
pub mod error;
pub mod services;
pub mod types;

pub use crate::error::{Error, Result};
