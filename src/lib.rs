//! Skyline - pick a country, region and city; see its current weather
//!
//! The library exposes every module so the binary and the tests share them.

pub mod action;
pub mod api;
pub mod components;
pub mod config;
pub mod effect;
pub mod error;
pub mod icons;
pub mod orchestrator;
pub mod reducer;
pub mod services;
pub mod state;
