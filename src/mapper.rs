// Active-area remap plus first-order exponential smoothing.
// Rule: a stable, slightly-lagging pointer feels better than a jittery exact one.

use crate::geometry::interpolate;
use crate::types::{CursorSettings, NormalizedCoord, ScreenSize};

/// Maps an index-fingertip landmark into pointer space and smooths it.
/// Holds the previous mapped position across frames; reset only at construction.
pub struct PointerMapper {
    cursor: CursorSettings,
    screen: ScreenSize,
    prev_x: f32,
    prev_y: f32,
}

impl PointerMapper {
    pub fn new(cursor: CursorSettings, screen: ScreenSize) -> Self {
        PointerMapper {
            cursor,
            screen,
            prev_x: 0.0,
            prev_y: 0.0,
        }
    }

    /// Map a normalized fingertip to a smoothed pointer position.
    ///
    /// Denormalizes into source-frame pixels, remaps the active-area rectangle
    /// `[margin, w-margin] x [margin, h-margin]` onto the full screen, then
    /// applies `current = prev + (target - prev) / smoothening`. The result is
    /// stored as the new previous position. Deterministic given the inputs and
    /// the previous state.
    pub fn update(&mut self, tip: NormalizedCoord, frame_width: u32, frame_height: u32) -> (f32, f32) {
        let px = tip.x * frame_width as f32;
        let py = tip.y * frame_height as f32;

        let margin = self.cursor.frame_reduction;
        let target_x = interpolate(
            px,
            (margin, frame_width as f32 - margin),
            (0.0, self.screen.width),
        );
        let target_y = interpolate(
            py,
            (margin, frame_height as f32 - margin),
            (0.0, self.screen.height),
        );

        let s = self.cursor.smoothening;
        let x = self.prev_x + (target_x - self.prev_x) / s;
        let y = self.prev_y + (target_y - self.prev_y) / s;

        self.prev_x = x;
        self.prev_y = y;
        (x, y)
    }
}
