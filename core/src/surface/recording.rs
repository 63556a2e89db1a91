//! Surface double that records draw calls instead of painting.

use super::{DrawSurface, Paint, Rect};
use crate::color::Rgba;

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect { rect: Rect, color: Rgba },
    FillArc { center: [f32; 2], radius: f32, paint: Paint },
    Resize { width: u32, height: u32 },
    Present,
}

/// Records every call made through [`DrawSurface`].
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain recorded commands.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Commands grouped by frame, split at each `Present`.
    pub fn frames(&self) -> Vec<&[DrawCommand]> {
        self.commands
            .split_inclusive(|c| matches!(c, DrawCommand::Present))
            .collect()
    }

    pub fn arc_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillArc { .. }))
            .count()
    }

    pub fn present_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Present))
            .count()
    }
}

impl DrawSurface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.commands.push(DrawCommand::Resize { width, height });
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn fill_arc(&mut self, center: [f32; 2], radius: f32, paint: &Paint) {
        self.commands.push(DrawCommand::FillArc {
            center,
            radius,
            paint: paint.clone(),
        });
    }

    fn present(&mut self) {
        self.commands.push(DrawCommand::Present);
    }
}
