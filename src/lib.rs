//! spritetint - HTTP sprite tinting and compositing service
//!
//! This library provides functionality to:
//! - Load pre-rendered PNG sprites from a startup-validated asset catalog
//! - Recolor non-transparent pixels by per-channel multiplication
//! - Composite a tinted overlay onto a tinted base at fixed or centered offsets
//! - Serve the results as PNG over three HTTP GET routes

pub mod assets;
pub mod compositor;
pub mod config;
pub mod error;
pub mod params;
pub mod server;
pub mod tint;
