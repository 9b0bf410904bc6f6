//! Charts module - Static chart rendering

mod renderer;
mod theme;

pub use renderer::{RenderError, StaticChartRenderer};
pub use theme::{parse_hex_color, ChartTheme};
