//! Amount-sized bubble chart with animated regrouping.
//!
//! ```ignore
//! let (mode, set_mode) = signal(GroupMode::All);
//! view! {
//!     <button on:click=move |_| set_mode.set(GroupMode::Year)>"By year"</button>
//!     <BubbleForceChart data=grants width=960.0 height=640.0 mode=mode />
//! }
//! ```

mod component;
mod render;
pub mod state;
mod types;

pub use component::BubbleForceChart;
pub use state::{BubbleForceConfig, GroupAnchor, GroupMode, create_nodes};
pub use types::{ForceNode, GrantRecord};
