//! Cyclic color palette and the cursor that walks it.

use crate::color::Rgb;

/// Default watercolor anchors. The last entry repeats the first so the cycle
/// closes without a hard jump.
pub const WATERCOLOR_ANCHORS: [Rgb; 6] = [
    Rgb::new(0x99, 0xF1, 0xC6),
    Rgb::new(0x17, 0x81, 0xD9),
    Rgb::new(0xE1, 0x21, 0x75),
    Rgb::new(0xF6, 0x9B, 0x2E),
    Rgb::new(0xCB, 0xED, 0x8E),
    Rgb::new(0x99, 0xF1, 0xC6),
];

/// Floating index into an ordered, cyclic list of anchor colors.
///
/// The value always stays in `[0, anchors.len())`.
#[derive(Debug, Clone)]
pub struct PaletteCursor {
    anchors: Vec<Rgb>,
    value: f64,
    step: f64,
}

impl PaletteCursor {
    /// Cursor at 0.0 over `anchors`.
    ///
    /// Callers validate that `anchors` is non-empty; see
    /// [`FieldConfig::validate`](crate::config::FieldConfig::validate).
    pub fn new(anchors: Vec<Rgb>, step: f64) -> Self {
        Self {
            anchors,
            value: 0.0,
            step,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn anchors(&self) -> &[Rgb] {
        &self.anchors
    }

    /// Move the cursor to `value`, wrapped into range.
    pub fn set(&mut self, value: f64) {
        self.value = self.wrap(value);
    }

    /// Advance by one step and return the new value.
    pub fn advance(&mut self) -> f64 {
        self.value = self.wrap(self.value + self.step);
        self.value
    }

    /// Color at the current cursor.
    pub fn color(&self) -> Rgb {
        self.color_at(self.value)
    }

    /// Color at an arbitrary cursor value (wrapped into range first).
    pub fn color_at(&self, cursor: f64) -> Rgb {
        let len = self.anchors.len();
        if len == 0 {
            return Rgb::BLACK;
        }
        let cursor = self.wrap(cursor);
        let index = (cursor.floor() as usize).min(len - 1);
        let next = (index + 1) % len;
        let factor = cursor - index as f64;
        self.anchors[index].lerp(self.anchors[next], factor)
    }

    fn wrap(&self, value: f64) -> f64 {
        let len = self.anchors.len() as f64;
        if len == 0.0 {
            return 0.0;
        }
        let wrapped = value.rem_euclid(len);
        // rem_euclid can round up to `len` for tiny negative inputs
        if wrapped >= len {
            0.0
        } else {
            wrapped
        }
    }
}

impl Default for PaletteCursor {
    fn default() -> Self {
        Self::new(WATERCOLOR_ANCHORS.to_vec(), 0.01)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_values_are_exact() {
        let cursor = PaletteCursor::default();
        for (i, anchor) in WATERCOLOR_ANCHORS.iter().enumerate() {
            assert_eq!(cursor.color_at(i as f64), *anchor);
        }
        assert_eq!(cursor.color_at(2.0).to_hex(), "#e12175");
    }

    #[test]
    fn test_midpoint_between_anchors() {
        let cursor = PaletteCursor::default();
        // (225+246)/2, (33+155)/2, (117+46)/2 rounded
        assert_eq!(cursor.color_at(2.5), Rgb::new(236, 94, 82));
    }

    #[test]
    fn test_last_segment_closes_cycle() {
        let cursor = PaletteCursor::default();
        // Anchor 5 interpolates toward anchor 0, both #99F1C6.
        assert_eq!(cursor.color_at(5.7), WATERCOLOR_ANCHORS[0]);
    }

    #[test]
    fn test_advance_wraps() {
        let mut cursor = PaletteCursor::new(WATERCOLOR_ANCHORS.to_vec(), 0.5);
        for _ in 0..11 {
            cursor.advance();
        }
        assert!((cursor.value() - 5.5).abs() < 1e-12);
        cursor.advance();
        assert!(cursor.value() < 1e-12);
        cursor.advance();
        assert!((cursor.value() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_set_wraps_negative_and_large_values() {
        let mut cursor = PaletteCursor::default();
        cursor.set(7.25);
        assert!((cursor.value() - 1.25).abs() < 1e-12);
        cursor.set(-0.5);
        assert!((cursor.value() - 5.5).abs() < 1e-12);
    }

    #[test]
    fn test_value_stays_in_range() {
        let mut cursor = PaletteCursor::default();
        for _ in 0..2000 {
            let v = cursor.advance();
            assert!((0.0..6.0).contains(&v));
        }
    }
}
