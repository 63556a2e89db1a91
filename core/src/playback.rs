//! Scripted pointer playback for headless runs.

use crate::host::{EffectHost, HostEvent, ManualScheduler};
use crate::surface::DrawSurface;
use rand::Rng;
use serde::Serialize;
use std::f32::consts::TAU;

/// Pointer trajectory, sampled once per frame while active.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerPath {
    /// Pointer held at one point (still emits a move per frame).
    Still { x: f32, y: f32 },
    /// Straight sweep from `from` to `to` over the active frames.
    Line { from: [f32; 2], to: [f32; 2] },
    /// Circle around `center`, one revolution every `period` frames.
    Orbit { center: [f32; 2], radius: f32, period: u32 },
}

impl PointerPath {
    /// Position at `frame` of `active_frames`.
    pub fn position(&self, frame: u32, active_frames: u32) -> [f32; 2] {
        match *self {
            PointerPath::Still { x, y } => [x, y],
            PointerPath::Line { from, to } => {
                let t = if active_frames <= 1 {
                    0.0
                } else {
                    (frame as f32 / (active_frames - 1) as f32).min(1.0)
                };
                [from[0] + (to[0] - from[0]) * t, from[1] + (to[1] - from[1]) * t]
            }
            PointerPath::Orbit { center, radius, period } => {
                let angle = frame as f32 / period.max(1) as f32 * TAU;
                [center[0] + radius * angle.cos(), center[1] + radius * angle.sin()]
            }
        }
    }
}

/// Summary of a playback run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlaybackStats {
    pub frames: u32,
    pub pointer_events: u32,
    pub spawned: u64,
    pub peak_particles: usize,
    pub final_particles: usize,
}

/// Drives pointer events and frames through a headless host.
#[derive(Debug, Clone)]
pub struct Playback {
    pub path: PointerPath,
    /// Frames during which the pointer moves; afterwards it rests.
    pub active_frames: u32,
    /// Total frames to run.
    pub total_frames: u32,
}

impl Playback {
    pub fn new(path: PointerPath, active_frames: u32, total_frames: u32) -> Self {
        Self {
            path,
            active_frames,
            total_frames,
        }
    }

    /// Run the script. `progress` receives the completed fraction after every
    /// frame.
    pub fn run<S: DrawSurface, R: Rng>(
        &self,
        host: &mut EffectHost<S, ManualScheduler, R>,
        progress: Option<&dyn Fn(f32)>,
    ) -> PlaybackStats {
        log::debug!(
            "Playback: {:?}, {} active of {} frames",
            self.path,
            self.active_frames,
            self.total_frames
        );
        let mut stats = PlaybackStats::default();

        for frame in 0..self.total_frames {
            if frame < self.active_frames {
                let [x, y] = self.path.position(frame, self.active_frames);
                let before = host.field().particles().len();
                host.dispatch(HostEvent::PointerMove { x, y });
                stats.pointer_events += 1;
                stats.spawned += (host.field().particles().len() - before) as u64;
            }

            if host.pump(1) == 0 {
                log::debug!("Playback stopped at frame {}: no frame pending", frame);
                break;
            }
            stats.frames += 1;
            stats.peak_particles = stats.peak_particles.max(host.field().particles().len());

            if let Some(callback) = progress {
                callback((frame + 1) as f32 / self.total_frames as f32);
            }
        }

        stats.final_particles = host.field().particles().len();
        log::debug!("Playback finished: {:?}", stats);
        stats
    }
}
