//! View module - session view state and the render pass

mod render;
mod state;

pub use render::{render, Dashboard, DisplayModel, Metrics};
pub use state::{ExplorerConfig, Panel, ViewState};
