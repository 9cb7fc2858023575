//! Chart widgets and the plumbing they share.

pub mod bubble;
pub mod bubble_force;
pub mod canvas;
pub mod physics;
pub mod record;
pub mod scale;
pub mod sunburst;
pub mod theme;
pub mod tooltip;
