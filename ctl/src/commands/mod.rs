mod example;
mod render;

pub use example::{ExampleParams, example};
pub use render::{RenderParams, render};
