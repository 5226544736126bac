/*
 * Body Module
 *
 * A KinematicBody is the movable part shared by fish and the predator:
 * position, velocity and a per-tick acceleration accumulator, together with
 * the speed/force caps and the containment tuning of that kind of body.
 * Fish and predator embed one instead of duplicating the motion code.
 */

use nannou::geom::Vec3;

use crate::bounds::AquariumBounds;
use crate::math::SteeringMath;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KinematicBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,
    pub max_speed: f32,
    pub max_force: f32,
    pub bounce_force: f32,
    pub margin: f32,
}

/// Read-only view of something other bodies can react to.
pub trait Neighbor {
    fn position(&self) -> Vec3;
    fn velocity(&self) -> Vec3;
}

/// Frozen position and velocity of a body at the start of a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyState {
    pub position: Vec3,
    pub velocity: Vec3,
}

impl Neighbor for BodyState {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }
}

impl Neighbor for KinematicBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }
}

impl KinematicBody {
    pub fn new(position: Vec3, velocity: Vec3, max_speed: f32, max_force: f32) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vec3::ZERO,
            max_speed,
            max_force,
            bounce_force: 0.0,
            margin: 0.0,
        }
    }

    pub fn with_containment(mut self, bounce_force: f32, margin: f32) -> Self {
        self.bounce_force = bounce_force;
        self.margin = margin;
        self
    }

    pub fn state(&self) -> BodyState {
        BodyState {
            position: self.position,
            velocity: self.velocity,
        }
    }

    // Apply a force to the body
    pub fn apply_force(&mut self, force: Vec3) {
        self.acceleration += force;
    }

    /// Advance one tick. The order matters: acceleration is added before the
    /// speed clamp, and the clamped velocity is what moves the body.
    pub fn integrate(&mut self, step: f32) {
        self.velocity += self.acceleration * step;
        self.velocity = self.velocity.limit(self.max_speed);
        self.position += self.velocity * step;
        self.acceleration = Vec3::ZERO;
    }

    /// Reflect the body back inside `bounds`, axis by axis.
    pub fn contain(&mut self, bounds: &AquariumBounds) {
        let low = bounds.min();
        let high = bounds.max();
        let bounce = self.bounce_force;
        let margin = self.margin;

        contain_axis(&mut self.position.x, &mut self.velocity.x, low.x, high.x, margin, bounce);
        contain_axis(&mut self.position.y, &mut self.velocity.y, low.y, high.y, margin, bounce);
        contain_axis(&mut self.position.z, &mut self.velocity.z, low.z, high.z, margin, bounce);
    }

    /// Unit heading, or None when the body is too slow to have one.
    pub fn heading(&self, epsilon: f32) -> Option<Vec3> {
        if self.velocity.length() > epsilon {
            Some(self.velocity.unit_or_zero())
        } else {
            None
        }
    }
}

// Hard reflect-and-clamp: the velocity sign is overwritten, not accumulated
fn contain_axis(position: &mut f32, velocity: &mut f32, low: f32, high: f32, margin: f32, bounce: f32) {
    if *position < low + margin {
        *velocity = velocity.abs() + bounce;
        *position = low + margin;
    } else if *position > high - margin {
        *velocity = -velocity.abs() - bounce;
        *position = high - margin;
    }
}
