mod components;
mod view;

pub use view::{RenderReport, UiContext, draw};
