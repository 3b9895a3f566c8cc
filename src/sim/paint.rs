//! Paint colors and the rotating color wheel

use serde::{Deserialize, Serialize};

use super::tile::Tile;

/// A paint color; also the color of a door's lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaintColor {
    #[default]
    White,
    Red,
    Yellow,
}

impl PaintColor {
    /// Wool tile this color paints
    pub fn wool(self) -> Tile {
        match self {
            PaintColor::White => Tile::WhiteWool,
            PaintColor::Red => Tile::RedWool,
            PaintColor::Yellow => Tile::YellowWool,
        }
    }

    /// CSS color for the renderer
    pub fn css(self) -> &'static str {
        match self {
            PaintColor::White => "#ccc",
            PaintColor::Red => "#a00",
            PaintColor::Yellow => "#dd0",
        }
    }
}

/// Velocity given to an idle wheel on the first press
const START_VELOCITY: f32 = 0.15;
/// Velocity when pressed again mid-turn
const BOOST_VELOCITY: f32 = 2.0;
const DECELERATION: f32 = 0.005;
/// Frame value at which the wheel has turned one slot
const TURN_FRAMES: f32 = 2.0;

/// Color wheel; the head of `colors` is the selected color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaintSelector {
    pub colors: [PaintColor; 3],
    pub animating: bool,
    pub frame: f32,
    pub velocity: f32,
}

impl Default for PaintSelector {
    fn default() -> Self {
        Self {
            colors: [PaintColor::White, PaintColor::Red, PaintColor::Yellow],
            animating: false,
            frame: 0.0,
            velocity: 0.0,
        }
    }
}

impl PaintSelector {
    pub fn selected(&self) -> PaintColor {
        self.colors[0]
    }

    /// Secondary action: start turning, or speed up a turn in progress
    pub fn press(&mut self) {
        if self.animating {
            self.velocity = BOOST_VELOCITY;
        } else {
            self.velocity = START_VELOCITY;
            self.animating = true;
        }
    }

    /// Advance the turn animation by one frame
    pub fn update(&mut self) {
        if !self.animating {
            return;
        }
        self.velocity -= DECELERATION;
        self.frame += self.velocity;

        if self.frame >= TURN_FRAMES {
            self.frame = 0.0;
            self.animating = false;
            self.colors.rotate_left(1);
            log::debug!("Paint color now {:?}", self.selected());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wheel_turns_after_press() {
        let mut wheel = PaintSelector::default();
        assert_eq!(wheel.selected(), PaintColor::White);

        wheel.press();
        let mut frames = 0;
        while wheel.animating {
            wheel.update();
            frames += 1;
            assert!(frames < 1000, "wheel never finished turning");
        }
        assert_eq!(wheel.selected(), PaintColor::Red);
        assert_eq!(wheel.colors, [PaintColor::Red, PaintColor::Yellow, PaintColor::White]);
    }

    #[test]
    fn test_second_press_boosts_turn() {
        let mut wheel = PaintSelector::default();
        wheel.press();
        wheel.update();
        wheel.press();
        wheel.update();
        assert!(!wheel.animating);
        assert_eq!(wheel.selected(), PaintColor::Red);
    }

    #[test]
    fn test_colors_map_to_wool() {
        assert_eq!(PaintColor::White.wool(), Tile::WhiteWool);
        assert_eq!(PaintColor::Red.wool(), Tile::RedWool);
        assert_eq!(PaintColor::Yellow.wool(), Tile::YellowWool);
    }
}
