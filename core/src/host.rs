//! Host glue: event dispatch, listener lifetime and frame scheduling.

use crate::field::{FrameRequest, ParticleField};
use crate::surface::DrawSurface;
use rand::Rng;

/// Events a host environment delivers to the effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    Resize { width: u32, height: u32 },
    PointerMove { x: f32, y: f32 },
    AnimationFrame,
}

/// "Run the next tick on the next animation frame."
pub trait FrameScheduler {
    fn request_frame(&mut self);

    /// Drop any pending request; no further frames until requested again.
    fn cancel(&mut self);
}

/// Headless scheduler: remembers whether a frame is pending.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pending: bool,
    requested: u64,
    cancelled: bool,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Total requests seen.
    pub fn requested(&self) -> u64 {
        self.requested
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Consume the pending request, if any.
    pub fn take_pending(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) {
        self.pending = true;
        self.requested += 1;
        self.cancelled = false;
    }

    fn cancel(&mut self) {
        self.pending = false;
        self.cancelled = true;
    }
}

/// Which host listeners are currently attached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Listeners {
    pub resize: bool,
    pub pointer: bool,
}

impl Listeners {
    pub fn any(&self) -> bool {
        self.resize || self.pointer
    }
}

/// Mounts a [`ParticleField`] in a host: owns the scheduler, tracks listener
/// registration and routes events.
pub struct EffectHost<S, F, R = rand::rngs::StdRng> {
    field: ParticleField<S, R>,
    scheduler: F,
    listeners: Listeners,
}

impl<S: DrawSurface, F: FrameScheduler, R: Rng> EffectHost<S, F, R> {
    pub fn new(field: ParticleField<S, R>, scheduler: F) -> Self {
        Self {
            field,
            scheduler,
            listeners: Listeners::default(),
        }
    }

    /// Attach listeners, hand the surface to the field and run the first frame
    /// right away.
    pub fn mount(&mut self, surface: S) {
        self.listeners = Listeners {
            resize: true,
            pointer: true,
        };
        if self.field.on_surface_ready(surface) == FrameRequest::Next {
            self.frame();
        }
    }

    /// Route one host event.
    pub fn dispatch(&mut self, event: HostEvent) {
        match event {
            HostEvent::Resize { width, height } if self.listeners.resize => {
                self.field.on_resize(width, height);
            }
            HostEvent::PointerMove { x, y } if self.listeners.pointer => {
                self.field.on_pointer_move(x, y);
            }
            HostEvent::AnimationFrame => self.frame(),
            ignored => log::trace!("Ignoring {:?}: listener detached", ignored),
        }
    }

    /// Tick once and ask the scheduler for the next frame if the field wants one.
    pub fn frame(&mut self) {
        if self.field.tick() == FrameRequest::Next {
            self.scheduler.request_frame();
        }
    }

    /// Detach listeners, cancel scheduling and return the surface.
    pub fn unmount(&mut self) -> Option<S> {
        self.listeners = Listeners::default();
        self.scheduler.cancel();
        self.field.unmount()
    }

    pub fn listeners(&self) -> Listeners {
        self.listeners
    }

    pub fn field(&self) -> &ParticleField<S, R> {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut ParticleField<S, R> {
        &mut self.field
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn into_field(self) -> ParticleField<S, R> {
        self.field
    }
}

impl<S: DrawSurface, R: Rng> EffectHost<S, ManualScheduler, R> {
    /// Run pending frames until none is pending or `max_frames` ran.
    ///
    /// Returns the number of frames run.
    pub fn pump(&mut self, max_frames: usize) -> usize {
        let mut ran = 0;
        while ran < max_frames && self.scheduler.take_pending() {
            self.frame();
            ran += 1;
        }
        ran
    }
}
