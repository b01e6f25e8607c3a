//! Geometry and layout model for the venue canvas
//!
//! This module defines the placeable item kinds with their fixed sizes, the
//! ordered [`Layout`] collection, and the procedural planner that proposes
//! baseline arrangements.

pub mod config;
pub mod error;
pub mod planner;
pub mod types;

pub use config::CanvasConfig;
pub use error::LayoutError;
pub use planner::{plan_layout, plan_variant, PlanVariant};
pub use types::*;
