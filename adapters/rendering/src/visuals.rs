//! Backend-independent animation curves and the fog-of-war falloff.

use std::{f32::consts::FRAC_PI_3, time::Duration};

use glam::Vec2;

/// Opacity of the darkness outside the visibility radius.
pub const FOG_OPACITY: f32 = 0.96;

/// Fraction of the visibility radius where the fog starts fading in.
pub const FOG_SOFT_EDGE: f32 = 0.85;

/// Amplitude of the collectible glow oscillation.
pub const GLOW_PULSE: f32 = 3.0;

/// Darkness applied at `distance` from the light center.
///
/// Fully clear inside `FOG_SOFT_EDGE * radius`, ramping linearly to
/// [`FOG_OPACITY`] at `radius`.
#[must_use]
pub fn fog_alpha(distance: f32, radius: f32) -> f32 {
    if radius <= 0.0 {
        return FOG_OPACITY;
    }
    let inner = radius * FOG_SOFT_EDGE;
    if distance <= inner {
        0.0
    } else if distance >= radius {
        FOG_OPACITY
    } else {
        (distance - inner) / (radius - inner) * FOG_OPACITY
    }
}

/// Shared animation phase, one unit per 200 ms.
#[must_use]
pub fn animation_phase(time: Duration) -> f32 {
    time.as_secs_f32() * 5.0
}

/// Glow size offset of a collectible with the provided pulse offset.
#[must_use]
pub fn glow_pulse(phase: f32, offset: f32) -> f32 {
    (phase + offset).sin() * GLOW_PULSE
}

/// Corners of the spinning rune hexagon.
#[must_use]
pub fn rune_vertices(center: Vec2, radius: f32, phase: f32) -> [Vec2; 6] {
    let spin = phase / 5.0;
    let mut vertices = [Vec2::ZERO; 6];
    for (index, vertex) in vertices.iter_mut().enumerate() {
        let angle = index as f32 * FRAC_PI_3 + spin;
        *vertex = center + Vec2::new(angle.cos(), angle.sin()) * radius;
    }
    vertices
}

/// Rotation of the open portal.
#[must_use]
pub fn portal_rotation(phase: f32) -> f32 {
    phase / 2.0
}

/// Offset of a shadow's eyes from its center, looking along `heading`.
#[must_use]
pub fn eye_offset(heading: f32) -> Vec2 {
    Vec2::new(heading.cos(), heading.sin()) * 5.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fog_is_clear_inside_the_soft_edge() {
        assert_eq!(fog_alpha(0.0, 100.0), 0.0);
        assert_eq!(fog_alpha(85.0, 100.0), 0.0);
        assert!((fog_alpha(92.5, 100.0) - FOG_OPACITY * 0.5).abs() < 1e-4);
        assert_eq!(fog_alpha(100.0, 100.0), FOG_OPACITY);
        assert_eq!(fog_alpha(500.0, 100.0), FOG_OPACITY);
    }

    #[test]
    fn extinguished_light_reveals_nothing() {
        assert_eq!(fog_alpha(0.0, 0.0), FOG_OPACITY);
    }

    #[test]
    fn rune_vertices_sit_on_the_circle() {
        let center = Vec2::new(40.0, 60.0);
        let vertices = rune_vertices(center, 12.0, 3.7);
        for vertex in vertices {
            assert!((vertex.distance(center) - 12.0).abs() < 1e-4);
        }
        assert!((vertices[0].distance(vertices[1]) - 12.0).abs() < 1e-3);
    }

    #[test]
    fn animation_phase_counts_fifths_of_a_second() {
        assert!((animation_phase(Duration::from_millis(400)) - 2.0).abs() < 1e-6);
        assert_eq!(portal_rotation(2.0), 1.0);
        assert_eq!(glow_pulse(0.0, 0.0), 0.0);
    }
}
