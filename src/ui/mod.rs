//! Presentation layer: egui panels, tables, cards and charts that render the
//! output of the data pipeline.

pub mod format;
pub mod panels;
pub mod plot;
pub mod tables;
