//! Bubble entities and spawn tuning.

use super::rng::FrameRng;

/// Wall-clock spawn cadence while the bubble phase is active.
pub const SPAWN_INTERVAL_MS: i32 = 700;
/// Delay between a bubble being marked popped and its removal.
pub const POP_DELAY_MS: i32 = 150;
/// Extra distance below the play area a bubble may travel before it is culled.
pub const EXIT_MARGIN: f64 = 60.0;

const SIZE_MIN: f64 = 30.0;
const SIZE_MAX: f64 = 60.0;
const LEFT_PCT_MIN: f64 = 10.0;
const LEFT_PCT_MAX: f64 = 90.0;
const SPEED_MIN: f64 = 1.2;
const SPEED_MAX: f64 = 2.7;

/// Numeric state of one floating bubble. Motion is expressed in px per
/// animation frame, not per unit time, so apparent speed follows the display
/// refresh rate. Kept that way on purpose.
#[derive(Clone, Copy, Debug)]
pub struct BubbleBody {
    pub size: f64,
    /// Horizontal position as a percentage of the play-area width.
    pub left_pct: f64,
    /// Vertical position in px from the top of the play area.
    pub top: f64,
    pub speed: f64,
    pub popped: bool,
}

impl BubbleBody {
    /// Draw randomized attributes. The bubble starts its own height above the
    /// top edge so it enters the play area smoothly.
    pub fn spawn(rng: &mut FrameRng) -> Self {
        let size = rng.range(SIZE_MIN, SIZE_MAX);
        Self {
            size,
            left_pct: rng.range(LEFT_PCT_MIN, LEFT_PCT_MAX),
            top: -size,
            speed: rng.range(SPEED_MIN, SPEED_MAX),
            popped: false,
        }
    }

    pub fn advance(&mut self) {
        self.top += self.speed;
    }

    /// True once the bubble has fully left through the bottom edge.
    pub fn has_exited(&self, area_height: f64) -> bool {
        self.top > area_height + EXIT_MARGIN
    }
}
