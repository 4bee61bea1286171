//! Floor-plan rasterization

pub mod occupancy;

pub use occupancy::{GridBuilder, OccupancyGrid};
