//! Fixed-size particle field mutated in place once per rendered frame.
//!
//! Buffers are structure-of-arrays `Vec<f32>` in the exact layout the
//! renderer uploads (positions/colors xyz-interleaved, sizes scalar), so a
//! frame update is one linear pass and the host can hand slices straight to
//! the GPU queue afterwards.

use crate::color::hsl_to_rgb;
use crate::constants::{
    BASE_COLOR, CAMERA_DISTANCE, FIELD_RADIUS, HUE_LIGHTNESS, HUE_SATURATION, MAX_DRIFT_SPEED,
    MAX_POINT_SIZE, NEAR_FADE_DISTANCE, POINTER_WORLD_SCALE, PULLBACK_FACTOR, REPEL_RADIUS,
    REPEL_STRENGTH, SIZE_PER_UNIT,
};
use crate::state::FrameInput;
use rand::prelude::*;

pub struct ParticleField {
    count: usize,
    positions: Vec<f32>,
    velocities: Vec<f32>,
    sizes: Vec<f32>,
    colors: Vec<f32>,
}

impl ParticleField {
    /// Allocate `count` particles distributed uniformly inside the field
    /// sphere. Deterministic under `seed` so frontends and tests agree.
    pub fn new(count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut positions = Vec::with_capacity(count * 3);
        let mut velocities = Vec::with_capacity(count * 3);
        let mut sizes = Vec::with_capacity(count);
        let mut colors = Vec::with_capacity(count * 3);

        for _ in 0..count {
            // Radius-biased draw (r = u^0.5 * R) avoids clustering at the
            // center; direction via inverse-CDF for the polar angle.
            let r = rng.gen::<f32>().sqrt() * FIELD_RADIUS;
            let theta = rng.gen::<f32>() * std::f32::consts::TAU;
            let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
            positions.push(r * phi.sin() * theta.cos());
            positions.push(r * phi.sin() * theta.sin());
            positions.push(r * phi.cos());

            for _ in 0..3 {
                velocities.push((rng.gen::<f32>() - 0.5) * 2.0 * MAX_DRIFT_SPEED);
            }

            sizes.push(rng.gen::<f32>() * MAX_POINT_SIZE);
            colors.extend_from_slice(&BASE_COLOR);
        }

        Self {
            count,
            positions,
            velocities,
            sizes,
            colors,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Flat xyz position buffer, `count * 3` floats.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Per-particle rendered sizes, `count` floats. Zero means hidden.
    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    /// Flat rgb color buffer, `count * 3` floats.
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// Advance the field by one frame: drift, near-field fading, pointer
    /// repulsion, then soft containment. Position and size buffers are
    /// mutated in place; the caller re-uploads them afterwards.
    pub fn update(&mut self, input: &FrameInput) {
        let pointer_x = input.pointer.x * POINTER_WORLD_SCALE;
        let pointer_y = input.pointer.y * POINTER_WORLD_SCALE;

        for i in 0..self.count {
            let i3 = i * 3;

            // Subtle drift, plain Euler
            self.positions[i3] += self.velocities[i3] * input.speed;
            self.positions[i3 + 1] += self.velocities[i3 + 1] * input.speed;
            self.positions[i3 + 2] += self.velocities[i3 + 2] * input.speed;

            // Near-field fading: hide particles too close to the camera at
            // +CAMERA_DISTANCE on Z, otherwise size follows camera distance.
            let dist_to_cam = CAMERA_DISTANCE - self.positions[i3 + 2];
            if dist_to_cam < NEAR_FADE_DISTANCE {
                self.sizes[i] = 0.0;
            } else {
                self.sizes[i] = (dist_to_cam * SIZE_PER_UNIT).min(MAX_POINT_SIZE);
            }

            // Pointer repulsion in the XY plane
            let dx = self.positions[i3] - pointer_x;
            let dy = self.positions[i3 + 1] - pointer_y;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist < REPEL_RADIUS {
                let force = (REPEL_RADIUS - dist) * REPEL_STRENGTH;
                self.positions[i3] += dx * force;
                self.positions[i3 + 1] += dy * force;
            }

            // Soft containment: exponential pull-back, not a hard clamp, so a
            // particle can exceed the boundary for one frame.
            let r2 = self.positions[i3] * self.positions[i3]
                + self.positions[i3 + 1] * self.positions[i3 + 1]
                + self.positions[i3 + 2] * self.positions[i3 + 2];
            if r2 > FIELD_RADIUS * FIELD_RADIUS {
                self.positions[i3] *= PULLBACK_FACTOR;
                self.positions[i3 + 1] *= PULLBACK_FACTOR;
                self.positions[i3 + 2] *= PULLBACK_FACTOR;
            }
        }
    }

    /// Recolor every particle to HSL(hue, 70%, 60%).
    pub fn set_hue(&mut self, hue_degrees: f32) {
        let rgb = hsl_to_rgb(hue_degrees, HUE_SATURATION, HUE_LIGHTNESS);
        for i in 0..self.count {
            let i3 = i * 3;
            self.colors[i3] = rgb[0];
            self.colors[i3 + 1] = rgb[1];
            self.colors[i3 + 2] = rgb[2];
        }
    }
}
