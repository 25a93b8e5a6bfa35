//! Terrain height queries used for spawn placement and anti-sink correction.
//!
//! The simulation never owns terrain. It asks a [`GroundResolver`] for the
//! surface height under a horizontal position and treats `None` as "no ground
//! found", which callers handle as a recoverable condition.

use std::sync::Arc;

use glam::{Vec2, Vec3};
use log::{debug, trace};

use crate::physics::Body;

/// Answers "how high is the ground here?" for a horizontal position.
#[cfg_attr(test, mockall::automock)]
pub trait GroundResolver: Send + Sync {
    /// Returns the terrain height at `at` (x/z plane), or `None` when the
    /// probe finds nothing.
    fn probe_ground_height(&self, at: Vec2) -> Option<f32>;
}

impl<G: GroundResolver + ?Sized> GroundResolver for Arc<G> {
    fn probe_ground_height(&self, at: Vec2) -> Option<f32> {
        (**self).probe_ground_height(at)
    }
}

/// Downward probe starting at `from_height`; surfaces above the probe origin
/// are not hit.
#[must_use]
pub fn probe_down(ground: &dyn GroundResolver, at: Vec2, from_height: f32) -> Option<f32> {
    ground
        .probe_ground_height(at)
        .filter(|height| height.is_finite() && *height <= from_height)
}

/// Infinite plane at a fixed height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatGround {
    /// Ground height everywhere.
    pub height: f32,
}

impl FlatGround {
    /// Plane at `height`.
    #[must_use]
    pub const fn new(height: f32) -> Self {
        Self { height }
    }
}

impl GroundResolver for FlatGround {
    fn probe_ground_height(&self, _at: Vec2) -> Option<f32> {
        Some(self.height)
    }
}

/// Resolver that never finds ground; placement always falls back.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGround;

impl GroundResolver for NoGround {
    fn probe_ground_height(&self, _at: Vec2) -> Option<f32> {
        None
    }
}

/// Adapts a closure into a resolver.
pub struct GroundFn<F>(pub F);

impl<F> GroundResolver for GroundFn<F>
where
    F: Fn(Vec2) -> Option<f32> + Send + Sync,
{
    fn probe_ground_height(&self, at: Vec2) -> Option<f32> {
        (self.0)(at)
    }
}

/// Regular grid of sampled heights with bilinear interpolation between
/// samples. Positions outside the grid have no ground.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    origin: Vec2,
    cell_size: f32,
    columns: usize,
    rows: usize,
    heights: Vec<f32>,
}

impl HeightField {
    /// Builds a field of `columns × rows` samples spaced `cell_size` apart,
    /// starting at `origin`, with heights produced by `height_at`.
    ///
    /// # Examples
    /// ```
    /// use glam::Vec2;
    /// use menagerie::ground::{GroundResolver, HeightField};
    /// let field = HeightField::from_fn(Vec2::ZERO, 1.0, 3, 3, |p| p.x);
    /// let h = field.probe_ground_height(Vec2::new(1.5, 0.5)).unwrap();
    /// assert!((h - 1.5).abs() < 1e-6);
    /// ```
    #[must_use]
    pub fn from_fn(
        origin: Vec2,
        cell_size: f32,
        columns: usize,
        rows: usize,
        height_at: impl Fn(Vec2) -> f32,
    ) -> Self {
        let mut heights = Vec::with_capacity(columns * rows);
        for row in 0..rows {
            for column in 0..columns {
                #[expect(
                    clippy::cast_precision_loss,
                    reason = "Grid dimensions stay far below f32 precision limits."
                )]
                let sample = origin + Vec2::new(column as f32, row as f32) * cell_size;
                heights.push(height_at(sample));
            }
        }
        Self {
            origin,
            cell_size: cell_size.max(f32::EPSILON),
            columns,
            rows,
            heights,
        }
    }

    fn sample(&self, column: usize, row: usize) -> Option<f32> {
        if column >= self.columns {
            return None;
        }
        self.heights.get(row * self.columns + column).copied()
    }

    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "Grid coordinates are checked to be finite and non-negative before casting."
    )]
    fn interpolate(&self, at: Vec2) -> Option<f32> {
        let local = (at - self.origin) / self.cell_size;
        if !local.is_finite() || local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        let column = local.x.floor() as usize;
        let row = local.y.floor() as usize;
        let fx = local.x - local.x.floor();
        let fy = local.y - local.y.floor();

        let h00 = self.sample(column, row)?;
        // Points exactly on the far edge have no neighbour cell; reuse the edge.
        let h10 = self
            .sample(column + 1, row)
            .or_else(|| (fx == 0.0).then_some(h00))?;
        let h01 = self
            .sample(column, row + 1)
            .or_else(|| (fy == 0.0).then_some(h00))?;
        let h11 = self
            .sample(column + 1, row + 1)
            .or_else(|| (fx == 0.0).then_some(h01))
            .or_else(|| (fy == 0.0).then_some(h10))?;

        let near = h00 + (h10 - h00) * fx;
        let far = h01 + (h11 - h01) * fx;
        Some(near + (far - near) * fy)
    }
}

impl GroundResolver for HeightField {
    fn probe_ground_height(&self, at: Vec2) -> Option<f32> {
        self.interpolate(at)
    }
}

/// Outcome of one anti-sink probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroundCheck {
    /// Lowest extent sat within tolerance of the ground.
    Settled,
    /// Lowest extent was below ground and has been lifted by `lifted`.
    Corrected {
        /// Distance the body was raised.
        lifted: f32,
    },
    /// Lowest extent hovers `gap` above ground; gravity is left to settle it.
    Floating {
        /// Distance between the lowest extent and the ground.
        gap: f32,
    },
    /// The probe found no ground under the body.
    NoGround,
}

/// Tolerances for [`check_ground`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundTolerance {
    /// Depth below the ground tolerated before lifting.
    pub sink: f32,
    /// Height above the ground tolerated before logging.
    pub float: f32,
}

/// Re-probes the ground below `body` and lifts it out of the terrain when its
/// lowest extent has sunk more than `tolerance.sink`. Downward velocity is
/// cleared on correction. Floating bodies are only reported.
pub fn check_ground(
    body: &mut Body,
    foot_offset: f32,
    ground: &dyn GroundResolver,
    tolerance: GroundTolerance,
) -> GroundCheck {
    let at = Vec2::new(body.position.x, body.position.z);
    let Some(surface) = ground.probe_ground_height(at) else {
        return GroundCheck::NoGround;
    };
    let lowest = body.position.y - foot_offset;
    if lowest < surface - tolerance.sink {
        let lifted = surface - lowest;
        body.position.y = surface + foot_offset;
        body.velocity.y = body.velocity.y.max(0.0);
        body.grounded = true;
        debug!("lifted sunken body by {lifted:.3} at {at}");
        return GroundCheck::Corrected { lifted };
    }
    let gap = lowest - surface;
    if gap > tolerance.float {
        trace!("body floating {gap:.3} above ground at {at}");
        return GroundCheck::Floating { gap };
    }
    GroundCheck::Settled
}

/// Vertical coordinate that rests a body with `foot_offset` on `surface`
/// with `clearance` to spare.
#[must_use]
pub fn resting_height(surface: f32, foot_offset: f32, clearance: f32) -> f32 {
    surface + foot_offset + clearance
}

/// Convenience for callers holding a full world position.
#[must_use]
pub fn ground_under(ground: &dyn GroundResolver, position: Vec3) -> Option<f32> {
    ground.probe_ground_height(Vec2::new(position.x, position.z))
}
