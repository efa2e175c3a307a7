//! Image composition and annotation utilities.
//!
//! Provides box geometry, alpha-blended shape drawing, anchored text
//! rendering, image joins and grids, and a chainable `Visualiser` facade.

pub mod bbox;
pub mod color;
pub mod compose;
pub mod draw;
pub mod error;
pub mod font;
pub mod io;
pub mod position;
pub mod resize;
pub mod text;
pub mod visualiser;

// Re-exports for convenience
pub use bbox::{BBox, Edge};
pub use color::Color;
pub use compose::{
    GridOptions, draw_rule_of_thirds, img_join_horizontal, img_join_vertical, make_img_grid,
};
pub use error::VisError;
pub use font::Font;
pub use io::{LoadOptions, load_image};
pub use position::Position;
pub use resize::{PadLocation, PadOptions, resize_pad};
pub use visualiser::{BBoxOptions, BoxStyle, Visualiser, format_label};
