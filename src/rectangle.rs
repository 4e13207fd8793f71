use crate::point2d::Point2D;

/// Inclusive pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

// helper methods
impl Rect {
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }
    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }
    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// Pixel bounding box of a screen-space triangle, clamped to a
    /// `screen_width x screen_height` buffer. Minima are floored and maxima
    /// ceiled. Returns `None` when the unclamped box has zero extent along
    /// either axis, or when nothing of it is left inside the buffer.
    pub fn clipped_bounds(
        v0: Point2D,
        v1: Point2D,
        v2: Point2D,
        screen_width: u32,
        screen_height: u32,
    ) -> Option<Rect> {
        if ![v0, v1, v2].iter().all(|v| v.x.is_finite() && v.y.is_finite()) {
            return None;
        }
        let min_x = v0.x.min(v1.x).min(v2.x).floor();
        let max_x = v0.x.max(v1.x).max(v2.x).ceil();
        let min_y = v0.y.min(v1.y).min(v2.y).floor();
        let max_y = v0.y.max(v1.y).max(v2.y).ceil();
        if !(max_x > min_x && max_y > min_y) {
            return None;
        }

        // Inclusive after clamping: a single row or column is still a box.
        let min_x = min_x.max(0.0);
        let min_y = min_y.max(0.0);
        let max_x = max_x.min((screen_width - 1) as f32);
        let max_y = max_y.min((screen_height - 1) as f32);
        if min_x > max_x || min_y > max_y {
            return None;
        }
        Some(Rect {
            min_x: min_x as u32,
            min_y: min_y as u32,
            max_x: max_x as u32,
            max_y: max_y as u32,
        })
    }
}
