//! Global companies rankings: load a CSV of companies (name, market cap,
//! price), filter / sort / limit it, summarise it, and show the result in an
//! egui dashboard.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
