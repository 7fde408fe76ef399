use eframe::egui;

use super::FloorConfig;

/// Pan and zoom applied to the floor plan. Positions passed in and out are
/// canvas-local: `(0, 0)` is the top-left corner of the drawing area.
/// World units are pixels at scale 1, one cell being `cell_pixel_size` wide.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub translate: egui::Vec2,
    pub scale: f32,
}

impl Viewport {
    pub fn new(config: &FloorConfig) -> Self {
        Self {
            translate: config.default_translate(),
            scale: 1.0,
        }
    }

    pub fn reset(&mut self, config: &FloorConfig) {
        *self = Self::new(config);
    }

    pub fn world_to_canvas(&self, world: egui::Pos2) -> egui::Pos2 {
        (self.translate + world.to_vec2() * self.scale).to_pos2()
    }

    pub fn canvas_to_world(&self, canvas: egui::Pos2) -> egui::Pos2 {
        ((canvas.to_vec2() - self.translate) / self.scale).to_pos2()
    }

    /// Zooms by a wheel delta, keeping the point under `cursor` fixed.
    /// Positive deltas zoom out. Returns whether the scale changed.
    pub fn zoom_at(&mut self, cursor: egui::Pos2, wheel_delta: f32, config: &FloorConfig) -> bool {
        let target = self.scale - wheel_delta * config.zoom_sensitivity;
        self.zoom_to(cursor, target, config)
    }

    /// Sets the scale (clamped to the configured range) around `cursor`.
    pub fn zoom_to(&mut self, cursor: egui::Pos2, scale: f32, config: &FloorConfig) -> bool {
        if !scale.is_finite() {
            return false;
        }
        let old = self.scale;
        let new = scale.clamp(config.min_scale, config.max_scale);
        if (new - old).abs() <= f32::EPSILON {
            return false;
        }
        let c = cursor.to_vec2();
        self.translate = c - (c - self.translate) * (new / old);
        self.scale = new;
        true
    }

    /// Offset between the pointer and the current translation, recorded when
    /// a pan starts.
    pub fn pan_anchor(&self, pointer: egui::Pos2) -> egui::Vec2 {
        pointer.to_vec2() - self.translate
    }

    pub fn pan_to(&mut self, pointer: egui::Pos2, anchor: egui::Vec2) {
        self.translate = pointer.to_vec2() - anchor;
    }

    pub fn scroll_by(&mut self, delta: egui::Vec2) {
        self.translate += delta;
    }

    /// Moves the view so that `world` sits at the centre of a canvas of `size`.
    pub fn center_on(&mut self, world: egui::Pos2, size: egui::Vec2) {
        self.translate = size * 0.5 - world.to_vec2() * self.scale;
    }
}
