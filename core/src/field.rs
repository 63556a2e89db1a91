//! The particle field renderer.
//!
//! Owns the particle collection, the palette cursor and (once the host hands
//! one over) the drawing surface. Hosts call:
//! - [`ParticleField::on_surface_ready`] when the surface exists
//! - [`ParticleField::on_resize`] on viewport resize
//! - [`ParticleField::on_pointer_move`] on pointer movement
//! - [`ParticleField::tick`] once per animation frame
//!
//! Without a surface every call is a no-op.

use crate::config::{ConfigError, FieldConfig};
use crate::palette::PaletteCursor;
use crate::particle::Particle;
use crate::surface::{DrawSurface, Rect};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// What the host scheduler should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRequest {
    /// Schedule another tick.
    Next,
    /// Stop scheduling (no surface, or unmounted).
    Stop,
}

/// Mutable particle collection rendered onto a host surface.
pub struct ParticleField<S, R = StdRng> {
    config: FieldConfig,
    particles: Vec<Particle>,
    palette: PaletteCursor,
    surface: Option<S>,
    rng: R,
    mounted: bool,
    ticks: u64,
}

impl<S: DrawSurface> ParticleField<S, StdRng> {
    /// Create a field seeded from OS entropy.
    pub fn new(config: FieldConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<S: DrawSurface, R: Rng> ParticleField<S, R> {
    /// Create a field drawing randomness from `rng`.
    pub fn with_rng(config: FieldConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let palette = config.palette_cursor();
        Ok(Self {
            config,
            particles: Vec::new(),
            palette,
            surface: None,
            rng,
            mounted: true,
            ticks: 0,
        })
    }

    /// Take ownership of the host surface. Replaces any previous surface but
    /// keeps particles and palette state.
    pub fn on_surface_ready(&mut self, surface: S) -> FrameRequest {
        let (width, height) = surface.size();
        log::debug!("Surface ready: {}x{}", width, height);
        self.surface = Some(surface);
        self.mounted = true;
        FrameRequest::Next
    }

    /// Resize the held surface to the new viewport. Particles are kept.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        match self.surface.as_mut() {
            Some(surface) => {
                log::debug!("Resizing surface to {}x{}", width, height);
                surface.resize(width, height);
            }
            None => log::trace!("Resize to {}x{} ignored: no surface", width, height),
        }
    }

    /// Spawn `particles_per_move` particles around `(x, y)`.
    ///
    /// Returns how many were spawned (0 without a surface).
    pub fn on_pointer_move(&mut self, x: f32, y: f32) -> usize {
        if self.surface.is_none() {
            log::trace!("Pointer move at ({}, {}) ignored: no surface", x, y);
            return 0;
        }
        let count = self.config.particles_per_move as usize;
        self.particles.reserve(count);
        for _ in 0..count {
            let particle = self.spawn(x, y);
            self.particles.push(particle);
        }
        count
    }

    fn spawn(&mut self, x: f32, y: f32) -> Particle {
        self.palette.advance();

        let angle = self.rng.gen::<f32>() * TAU;
        let speed = sample(&mut self.rng, self.config.speed_range);
        let jitter = self.config.jitter;
        let jitter_x = (self.rng.gen::<f32>() - 0.5) * 2.0 * jitter;
        let jitter_y = (self.rng.gen::<f32>() - 0.5) * 2.0 * jitter;
        let radius = sample(&mut self.rng, self.config.radius_range);
        let opacity = sample(&mut self.rng, self.config.opacity_range);

        Particle::new(
            [x + jitter_x, y + jitter_y],
            [speed * angle.cos(), speed * angle.sin()],
            radius,
            opacity,
            self.palette.color(),
        )
    }

    /// Run one animation frame: veil, update and draw every particle, drop
    /// faded ones, present.
    pub fn tick(&mut self) -> FrameRequest {
        if !self.mounted {
            return FrameRequest::Stop;
        }
        let Some(surface) = self.surface.as_mut() else {
            log::trace!("Tick skipped: no surface");
            return FrameRequest::Stop;
        };

        let veil = self
            .config
            .trail_color
            .with_opacity(self.config.trail_fade_alpha);
        let bounds = Rect::covering(surface.size());
        surface.fill_rect(bounds, veil);

        let (growth, decay) = (self.config.radius_growth, self.config.opacity_decay);
        for particle in &mut self.particles {
            particle.step(growth, decay);
            surface.fill_arc(particle.position, particle.radius, &particle.paint());
        }

        // Update and draw first, filter after, so removal never shifts an
        // unvisited particle.
        let before = self.particles.len();
        let threshold = self.config.removal_threshold;
        self.particles.retain(|p| !p.is_faded(threshold));

        surface.present();
        self.ticks += 1;
        log::trace!(
            "Tick {}: {} particles, {} removed",
            self.ticks,
            self.particles.len(),
            before - self.particles.len()
        );

        FrameRequest::Next
    }

    /// Stop rendering and release the surface back to the host.
    pub fn unmount(&mut self) -> Option<S> {
        log::debug!("Unmounting with {} live particles", self.particles.len());
        self.mounted = false;
        self.surface.take()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access to live particles, for hosts that seed state directly.
    pub fn particles_mut(&mut self) -> &mut Vec<Particle> {
        &mut self.particles
    }

    pub fn palette(&self) -> &PaletteCursor {
        &self.palette
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    /// Ticks rendered so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Uniform sample in `[min, max)`; a degenerate range yields `min`.
fn sample<R: Rng>(rng: &mut R, (min, max): (f32, f32)) -> f32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::surface::{DrawCommand, Paint, RecordingSurface};

    fn field() -> ParticleField<RecordingSurface> {
        let mut field =
            ParticleField::with_rng(FieldConfig::default(), StdRng::seed_from_u64(7)).unwrap();
        field.on_surface_ready(RecordingSurface::new(800, 600));
        field
    }

    #[test]
    fn test_spawn_respects_ranges() {
        let mut field = field();
        for i in 0..200 {
            field.on_pointer_move(100.0 + i as f32, 50.0);
        }
        for (i, p) in field.particles().iter().enumerate() {
            let px = 100.0 + (i / 2) as f32;
            assert!((p.position[0] - px).abs() <= 5.0);
            assert!((p.position[1] - 50.0).abs() <= 5.0);
            assert!((5.0..15.0).contains(&p.radius));
            assert!((0.6..0.8).contains(&p.opacity));
            let speed = (p.velocity[0].powi(2) + p.velocity[1].powi(2)).sqrt();
            assert!(speed >= 0.1 - 1e-5 && speed < 0.4 + 1e-5, "speed {speed}");
        }
    }

    #[test]
    fn test_spawned_color_follows_palette() {
        let mut field = field();
        field.on_pointer_move(0.0, 0.0);
        let expected = field.palette().color_at(0.02);
        assert_eq!(field.particles()[1].color, expected);
        assert_eq!(field.particles()[0].color, field.palette().color_at(0.01));
    }

    #[test]
    fn test_tick_draws_veil_first_then_arcs() {
        let mut field = field();
        field.on_pointer_move(400.0, 300.0);
        field.surface_mut().unwrap().take_commands();
        field.tick();

        let commands = field.surface().unwrap().commands();
        assert_eq!(commands.len(), 4);
        assert_eq!(
            commands[0],
            DrawCommand::FillRect {
                rect: Rect::new(0.0, 0.0, 800.0, 600.0),
                color: Rgba::new(255, 255, 255, 25),
            }
        );
        for (cmd, particle) in commands[1..3].iter().zip(field.particles()) {
            let DrawCommand::FillArc { center, radius, paint } = cmd else {
                panic!("expected arc, got {cmd:?}");
            };
            assert_eq!(*center, particle.position);
            assert_eq!(*radius, particle.radius);
            assert!(matches!(paint, Paint::Radial(_)));
        }
        assert_eq!(commands[3], DrawCommand::Present);
    }

    #[test]
    fn test_particle_drawn_on_its_removal_tick() {
        let mut field = field();
        field
            .particles_mut()
            .push(Particle::new([1.0, 1.0], [0.0, 0.0], 5.0, 0.0101, crate::color::Rgb::BLACK));
        field.tick();
        assert!(field.particles().is_empty());
        assert_eq!(field.surface().unwrap().arc_count(), 1);
    }

    #[test]
    fn test_unmount_stops_ticks() {
        let mut field = field();
        field.on_pointer_move(1.0, 1.0);
        let surface = field.unmount();
        assert!(surface.is_some());
        assert!(!field.is_mounted());
        assert_eq!(field.tick(), FrameRequest::Stop);
        assert_eq!(field.on_pointer_move(1.0, 1.0), 0);
    }

    #[test]
    fn test_degenerate_range_sample() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(sample(&mut rng, (3.0, 3.0)), 3.0);
        let v = sample(&mut rng, (1.0, 2.0));
        assert!((1.0..2.0).contains(&v));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = FieldConfig { opacity_decay: 1.5, ..Default::default() };
        assert!(ParticleField::<RecordingSurface>::new(config).is_err());
    }
}
