//! Stock modes and the drawing adapters built on them.

pub mod circle;
pub mod direct_select;
pub mod draw_polygon;
pub mod polygon;
pub mod rectangle_drag;
pub mod simple_select;

pub use circle::CircleMode;
pub use direct_select::DirectSelectMode;
pub use draw_polygon::DrawPolygonMode;
pub use polygon::PolygonMode;
pub use rectangle_drag::RectangleDragMode;
pub use simple_select::SimpleSelectMode;
