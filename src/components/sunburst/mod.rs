//! Zoomable sunburst over a hierarchical dataset.
//!
//! ```ignore
//! view! { <SunburstChart data=tree width=960.0 height=700.0 /> }
//! ```

mod component;
pub mod partition;
mod render;
pub mod state;
mod types;

pub use component::SunburstChart;
pub use partition::{PartitionNode, partition};
pub use types::HierarchyNode;
