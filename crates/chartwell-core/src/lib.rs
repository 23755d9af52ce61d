//! Chartwell Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Chartwell
//! parser, chart builder, and front ends. It includes:
//!
//! - **Dataset**: Headers and raw string cells ([`dataset::Dataset`])
//! - **Selection**: Column-to-chart mapping ([`selection::ChartSelection`])
//! - **Chart**: The declarative chart specification ([`chart::ChartSpec`])
//! - **Colors**: Color handling and hue-stepped generation ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)

pub mod chart;
pub mod color;
pub mod dataset;
pub mod geometry;
pub mod selection;
