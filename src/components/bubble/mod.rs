//! Count-sized bubble charts.
//!
//! - [`BubbleCenterChart`]: one centered cluster.
//! - [`BubbleScaleAxisChart`]: the same bubbles, switchable between the
//!   cluster and one column per category with axis labels.
//!
//! # Example
//!
//! ```ignore
//! use bubble_charts::{BubbleRecord, BubbleScaleAxisChart, BubbleMode};
//!
//! let (mode, set_mode) = signal(BubbleMode::Center);
//! view! {
//!     <BubbleScaleAxisChart
//!         data=records
//!         categories=labels
//!         width=960.0
//!         height=500.0
//!         gap=200.0
//!         mode=mode
//!         on_click=Callback::new(|r: BubbleRecord| log::info!("clicked {}", r.id))
//!     />
//! }
//! ```

mod component;
mod render;
pub mod state;
mod types;

pub use component::{BubbleCenterChart, BubbleScaleAxisChart};
pub use state::{BubbleMode, category_x_center, category_x_centers};
pub use types::BubbleRecord;
