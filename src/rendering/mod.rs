pub mod canvas;
pub mod palette;
pub mod presenter;
pub mod surface;

pub use canvas::PixelCanvas;
pub use presenter::PresenterPlugin;
pub use surface::{DrawSurface, Dot, Segment};
