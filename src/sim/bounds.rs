//! Play-field geometry helpers
//!
//! The play-field is the rectangle visible through the orthographic camera.
//! Everything here is pure: no context, no side effects, RNG passed in.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Rectangular play-field edges in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportBounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl ViewportBounds {
    pub const fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Bounds of an orthographic projection with half-height `scale`,
    /// widened horizontally by the aspect ratio
    pub fn from_aspect(aspect_ratio: f32, scale: f32) -> Self {
        let scale = scale.abs();
        Self {
            left: -aspect_ratio * scale,
            right: aspect_ratio * scale,
            top: scale,
            bottom: -scale,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    /// Width over height of the visible area
    pub fn aspect_ratio(&self) -> f32 {
        self.width().abs() / self.height().abs()
    }

    /// True when every edge is finite and the rectangle has positive area
    pub fn is_valid(&self) -> bool {
        [self.left, self.right, self.top, self.bottom]
            .iter()
            .all(|v| v.is_finite())
            && self.left < self.right
            && self.bottom < self.top
    }
}

/// A vector whose components may be individually absent
///
/// Used both as a movement delta and as a set of axes pinned to a fixed value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PartialVec3 {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
}

impl PartialVec3 {
    pub const NONE: Self = Self {
        x: None,
        y: None,
        z: None,
    };

    pub fn x(x: f32) -> Self {
        Self {
            x: Some(x),
            ..Self::NONE
        }
    }

    pub fn y(y: f32) -> Self {
        Self {
            y: Some(y),
            ..Self::NONE
        }
    }

    pub fn xy(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: None,
        }
    }
}

/// Sampling region for random placement, given as min/max per axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnArea {
    pub xmin: f32,
    pub xmax: f32,
    pub ymin: f32,
    pub ymax: f32,
    /// Optional depth range; without it sampled points stay on z = 0
    pub z: Option<(f32, f32)>,
}

impl From<ViewportBounds> for SpawnArea {
    fn from(bounds: ViewportBounds) -> Self {
        Self {
            xmin: bounds.left,
            xmax: bounds.right,
            ymin: bounds.bottom,
            ymax: bounds.top,
            z: None,
        }
    }
}

#[inline]
fn radius(min: f32, max: f32) -> f32 {
    (max - min).abs() / 2.0
}

fn sample_centered<R: Rng>(rng: &mut R, radius: f32) -> f32 {
    if radius > 0.0 && radius.is_finite() {
        rng.random_range(-radius..=radius)
    } else {
        0.0
    }
}

/// Random point within the half-extents of `area`, centered on the origin
///
/// Axes present in `fixed` are taken verbatim instead of sampled.
pub fn random_position_in<R: Rng>(
    area: &SpawnArea,
    fixed: PartialVec3,
    rng: &mut R,
) -> Vec3 {
    let x = match fixed.x {
        Some(x) => x,
        None => sample_centered(rng, radius(area.xmin, area.xmax)),
    };
    let y = match fixed.y {
        Some(y) => y,
        None => sample_centered(rng, radius(area.ymin, area.ymax)),
    };
    let z = match (fixed.z, area.z) {
        (Some(z), _) => z,
        (None, Some((zmin, zmax))) => sample_centered(rng, radius(zmin, zmax)),
        (None, None) => 0.0,
    };
    Vec3::new(x, y, z)
}

/// Map a position to the same relative spot inside `new` that it had in `old`
pub fn remap_position(old: &ViewportBounds, new: &ViewportBounds, position: Vec3) -> Vec3 {
    if old == new {
        return position;
    }

    let remap_axis = |value: f32, old_min: f32, old_extent: f32, new_min: f32, new_extent: f32| {
        if old_extent == 0.0 || !old_extent.is_finite() {
            return value;
        }
        (value - old_min) / old_extent * new_extent + new_min
    };

    Vec3::new(
        remap_axis(position.x, old.left, old.width(), new.left, new.width()),
        remap_axis(position.y, old.bottom, old.height(), new.bottom, new.height()),
        position.z,
    )
}

/// True when the point lies on or beyond any edge of the play-field
///
/// Non-finite coordinates are always out of bounds.
pub fn is_out_of_bounds(position: Vec3, bounds: &ViewportBounds) -> bool {
    let inside = position.x > bounds.left
        && position.x < bounds.right
        && position.y > bounds.bottom
        && position.y < bounds.top;
    !inside
}

/// Apply the present, finite components of `delta`
pub fn offset_position(position: Vec3, delta: PartialVec3) -> Vec3 {
    let apply = |value: f32, delta: Option<f32>| match delta {
        Some(d) if d.is_finite() => value + d,
        _ => value,
    };
    Vec3::new(
        apply(position.x, delta.x),
        apply(position.y, delta.y),
        apply(position.z, delta.z),
    )
}
