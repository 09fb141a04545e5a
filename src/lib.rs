pub mod calendar;
#[cfg(all(feature = "cli", feature = "png"))]
pub mod cli;
pub mod config;
pub mod force;
pub mod history;
pub mod ir;
pub mod raster;
pub mod render;
pub mod svg;
pub mod theme;

pub use calendar::{Calendar, DayCell, build_calendar};
pub use config::{CalendarConfig, Config, GraphConfig, load_config};
pub use force::{ForceSimulation, LayoutEngine, PositionedGraph};
pub use history::{GitCli, Histogram, HistoryReader, build_histogram};
pub use ir::Graph;
pub use raster::{ImageEncoder, RasterOptions, write_output_png};
#[cfg(feature = "png")]
pub use raster::ResvgEncoder;
pub use render::{render_calendar_svg, render_graph_svg};
pub use theme::Theme;
