use crate::{
    config::LayoutParams,
    foundation::{
        core::{Canvas, Point, Rect},
        error::{CardError, CardResult},
    },
    layout::geometry,
};

/// Upper bound on shrink iterations. Smaller steps are widened so the floor is always
/// reachable within this many iterations.
pub const MAX_SHRINK_STEPS: usize = 256;

/// Placement of every ring slot for one card.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutPlan {
    pub canvas: Canvas,
    pub character_box: Rect,
    pub banner_box: Rect,
    pub hex_radius: f64,
    pub orbit_radius: f64,
    /// Slot centers in ring order.
    pub positions: Vec<Point>,
    /// False only when the radius floor was reached and the ring still reaches into the
    /// banner region.
    pub banner_clear: bool,
}

impl LayoutPlan {
    pub fn character_center(&self) -> Point {
        self.character_box.center()
    }

    pub fn character_radius(&self) -> f64 {
        geometry::half_diagonal(self.character_box)
    }
}

/// Collision-aware radial placement of item slots around the character.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadialLayoutEngine {
    /// Amount the hexagon radius shrinks per feasibility iteration.
    pub shrink_step: f64,
    /// Gap kept between slots and both the character circle and the banner.
    pub margin: f64,
    /// Preferred extra distance beyond the minimum orbit.
    pub orbit_offset: f64,
}

impl RadialLayoutEngine {
    pub fn from_params(params: &LayoutParams) -> Self {
        Self {
            shrink_step: params.shrink_step,
            margin: params.margin,
            orbit_offset: params.orbit_offset,
        }
    }

    /// Orbit bounds `(min, max)` for a given hexagon radius.
    pub fn orbit_bounds(&self, character_radius: f64, clearance: f64, hex_radius: f64) -> (f64, f64) {
        (
            character_radius + hex_radius + self.margin,
            clearance - hex_radius - self.margin,
        )
    }

    /// Compute slot positions and radii.
    ///
    /// The hexagon radius starts at `preferred_hex_radius` and shrinks by `shrink_step`
    /// while the minimum orbit (clear of the character) exceeds the maximum orbit (clear of
    /// the banner). It never grows and never drops below `hex_radius_floor`; at the floor
    /// the minimum orbit is accepted even if the ring reaches the banner.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn compute_layout(
        &self,
        canvas: Canvas,
        character_box: Rect,
        banner_box: Rect,
        item_count: usize,
        preferred_hex_radius: f64,
        hex_radius_floor: f64,
    ) -> CardResult<LayoutPlan> {
        if !(preferred_hex_radius.is_finite() && preferred_hex_radius > 0.0) {
            return Err(CardError::validation("preferred hex radius must be > 0"));
        }
        if !(hex_radius_floor.is_finite() && hex_radius_floor > 0.0) {
            return Err(CardError::validation("hex radius floor must be > 0"));
        }
        if !(self.shrink_step.is_finite() && self.shrink_step > 0.0) {
            return Err(CardError::validation("shrink step must be > 0"));
        }
        if !(self.margin.is_finite() && self.margin >= 0.0)
            || !(self.orbit_offset.is_finite() && self.orbit_offset >= 0.0)
        {
            return Err(CardError::validation("margin and orbit offset must be >= 0"));
        }
        if character_box.width() <= 0.0 || character_box.height() <= 0.0 {
            return Err(CardError::validation("character box must be non-empty"));
        }

        let floor = hex_radius_floor.min(preferred_hex_radius);
        let center = character_box.center();
        let character_radius = geometry::half_diagonal(character_box);
        let clearance = geometry::vertical_clearance(center, banner_box);

        let step = self
            .shrink_step
            .max((preferred_hex_radius - floor) / MAX_SHRINK_STEPS as f64);
        let mut hex_radius = preferred_hex_radius;
        let (mut min_orbit, mut max_orbit) =
            self.orbit_bounds(character_radius, clearance, hex_radius);
        for _ in 0..MAX_SHRINK_STEPS {
            if min_orbit <= max_orbit || hex_radius <= floor {
                break;
            }
            let next = (hex_radius - step).max(floor);
            if next >= hex_radius {
                break;
            }
            hex_radius = next;
            (min_orbit, max_orbit) = self.orbit_bounds(character_radius, clearance, hex_radius);
        }
        if min_orbit > max_orbit && hex_radius > floor {
            hex_radius = floor;
            (min_orbit, max_orbit) = self.orbit_bounds(character_radius, clearance, hex_radius);
        }

        let banner_clear = min_orbit <= max_orbit;
        let orbit_radius = if banner_clear {
            (min_orbit + self.orbit_offset).min(max_orbit)
        } else {
            tracing::warn!(
                hex_radius,
                min_orbit,
                max_orbit,
                "ring cannot clear the banner at the radius floor"
            );
            min_orbit
        };

        let positions = geometry::ring_positions(center, orbit_radius, item_count);
        tracing::debug!(hex_radius, orbit_radius, items = item_count, "layout solved");

        Ok(LayoutPlan {
            canvas,
            character_box,
            banner_box,
            hex_radius,
            orbit_radius,
            positions,
            banner_clear,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/radial.rs"]
mod tests;
