//! Catalog Insights - descriptive analytics over a streaming catalog export
//!
//! Loads the cleaned titles CSV, answers fifteen fixed questions about the
//! catalog and presents each answer as a console table and an SVG chart.

pub mod charts;
pub mod config;
pub mod data;
pub mod questions;
pub mod report;
pub mod stats;
