pub mod channel_plot;
pub mod gesture;
pub mod selection;
pub mod selection_canvas;
pub mod view_bounds;

pub use channel_plot::ChannelPlot;
pub use selection::{SelectionSegment, Segments};
pub use selection_canvas::{CanvasEvent, SelectionCanvas};
