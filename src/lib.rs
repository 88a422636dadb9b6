pub mod camera;
pub mod engine;
pub mod grid;
pub mod life;
pub mod state;

pub mod prelude {
    use bevy::{color::Color, math::Vec2};

    pub use crate::engine::{advance, randomize, reset, toggle_at};
    pub use crate::grid::{Grid, GridError};

    pub const UPDATE_INTERVAL_MS: u64 = 50;
    pub const BG_COLOR: Color = Color::srgb(1.0, 1.0, 1.0);

    pub const WINDOW_SIZE_PX: Vec2 = Vec2::splat(1000.0);
    pub const BOARD_POS: Vec2 = Vec2::ZERO;
    /// the board fills the window; cols and rows are derived from this and the cell size
    pub const BOARD_SIZE_PX: Vec2 = WINDOW_SIZE_PX;

    pub const CELL_SIZE_PX: f32 = 20.0;
    pub const CELL_SCALE: Vec2 = Vec2::splat(1.0);
    pub const CELL_ALIVE_COLOR: Color = Color::srgb(210.0 / 255.0, 100.0 / 255.0, 30.0 / 255.0);
    pub const GRID_LINE_COLOR: Color = Color::srgb(0.0, 0.0, 0.0);
}
