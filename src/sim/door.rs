//! Sliding doors toggled by level scripts

use serde::{Deserialize, Serialize};

use super::paint::PaintColor;
use crate::consts::DOOR_STEP;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Door {
    /// Name level scripts address this door by
    pub tag: String,
    pub color: PaintColor,
    pub vertical: bool,
    /// 0 = closed, 1 = fully open
    pub open: f32,
    pub opening: bool,
    pub closing: bool,
}

impl Door {
    pub fn new(tag: String, color: PaintColor, vertical: bool) -> Self {
        Self {
            tag,
            color,
            vertical,
            open: 0.0,
            opening: false,
            closing: false,
        }
    }

    /// Only a fully closed door is solid
    pub fn blocks(&self) -> bool {
        self.open == 0.0
    }

    /// Advance the slide animation; opening is applied before closing
    pub fn frame(&mut self) {
        if self.opening {
            self.open = (self.open + DOOR_STEP).min(1.0);
            if self.open >= 1.0 {
                self.opening = false;
            }
        }

        if self.closing {
            self.open = (self.open - DOOR_STEP).max(0.0);
            if self.open <= 0.0 {
                self.closing = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn door() -> Door {
        Door::new("door".into(), PaintColor::Red, true)
    }

    #[test]
    fn test_opens_fully_and_clears_flag() {
        let mut d = door();
        d.opening = true;
        for _ in 0..25 {
            d.frame();
            assert!((0.0..=1.0).contains(&d.open));
        }
        assert_eq!(d.open, 1.0);
        assert!(!d.opening);
        assert!(!d.blocks());
    }

    #[test]
    fn test_closes_to_exactly_zero() {
        let mut d = door();
        d.open = 1.0;
        d.closing = true;
        for _ in 0..25 {
            d.frame();
        }
        assert_eq!(d.open, 0.0);
        assert!(!d.closing);
        assert!(d.blocks());
    }

    #[test]
    fn test_partially_open_never_blocks() {
        let mut d = door();
        d.opening = true;
        d.frame();
        assert!(d.open > 0.0);
        assert!(!d.blocks());
    }

    #[test]
    fn test_both_flags_cancel_out() {
        let mut d = door();
        d.open = 0.5;
        d.opening = true;
        d.closing = true;
        d.frame();
        assert!((d.open - 0.5).abs() < 1e-6);
        assert!(d.opening && d.closing);
    }
}
