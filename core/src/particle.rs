//! A single watercolor particle.

use crate::color::Rgb;
use crate::surface::{Paint, RadialGradient};

/// Particle state. Identity is its position in the field's collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: [f32; 2],
    pub velocity: [f32; 2],
    pub radius: f32,
    pub opacity: f32,
    pub color: Rgb,
}

impl Particle {
    pub fn new(position: [f32; 2], velocity: [f32; 2], radius: f32, opacity: f32, color: Rgb) -> Self {
        Self {
            position,
            velocity,
            radius,
            opacity,
            color,
        }
    }

    /// Advance one tick: drift by velocity, grow, fade.
    ///
    /// Per tick, never scaled by wall-clock time.
    #[inline]
    pub fn step(&mut self, radius_growth: f32, opacity_decay: f32) {
        self.position[0] += self.velocity[0];
        self.position[1] += self.velocity[1];
        self.radius += radius_growth;
        self.opacity *= opacity_decay;
    }

    #[inline]
    pub fn is_faded(&self, threshold: f32) -> bool {
        self.opacity < threshold
    }

    /// Watercolor paint: the particle color at its current opacity in the
    /// center, fully transparent at the rim.
    pub fn paint(&self) -> Paint {
        let gradient = RadialGradient::new(self.position, 0.0, self.radius)
            .with_stop(0.0, self.color.with_opacity(self.opacity))
            .with_stop(1.0, self.color.with_alpha(0));
        Paint::Radial(gradient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;

    fn sample() -> Particle {
        Particle::new([10.0, 20.0], [0.25, -0.5], 5.0, 0.8, Rgb::new(225, 33, 117))
    }

    #[test]
    fn test_step_applies_motion_growth_and_decay() {
        let mut p = sample();
        p.step(0.2, 0.97);
        assert_eq!(p.position, [10.25, 19.5]);
        assert!((p.radius - 5.2).abs() < 1e-6);
        assert!((p.opacity - 0.8 * 0.97).abs() < 1e-6);
        assert_eq!(p.velocity, [0.25, -0.5]);
    }

    #[test]
    fn test_is_faded_is_strict() {
        let mut p = sample();
        p.opacity = 0.01;
        assert!(!p.is_faded(0.01));
        p.opacity = 0.0099;
        assert!(p.is_faded(0.01));
    }

    #[test]
    fn test_paint_is_two_stop_radial() {
        let p = sample();
        let Paint::Radial(g) = p.paint() else {
            panic!("expected radial paint");
        };
        assert_eq!(g.center, [10.0, 20.0]);
        assert_eq!(g.inner_radius, 0.0);
        assert_eq!(g.outer_radius, 5.0);
        assert_eq!(g.stops.len(), 2);
        assert_eq!(g.stops[0].color, Rgba::new(225, 33, 117, 204));
        assert_eq!(g.stops[1].color, Rgba::new(225, 33, 117, 0));
        assert_eq!(g.stops[0].color.to_hex(), "#e12175cc");
    }
}
