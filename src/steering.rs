/*
 * Steering Module
 *
 * Reynolds steering behaviors for a KinematicBody. Every behavior is a pure
 * function of the body and what it can see; it returns a force and leaves
 * the body untouched. Each rule follows the same recipe:
 * Steering = Desired - Velocity, clamped to the body's force cap.
 *
 * Neighbor checks use a strict radius and require a non-zero distance, so a
 * body listed among its own neighbors never reacts to itself.
 */

use nannou::geom::Vec3;

use crate::body::{KinematicBody, Neighbor};
use crate::math::SteeringMath;
use crate::params::SteeringParams;

/// Followers only chase the leader when farther away than this.
pub const FOLLOW_LEADER_DISTANCE: f32 = 8.0;

/// Fish start fleeing once the predator is closer than this.
pub const PREDATOR_AVOID_RADIUS: f32 = 20.0;

/// Fleeing fish aim for this multiple of their cruising speed...
pub const FLEE_SPEED_SCALE: f32 = 1.2;

/// ...and may steer this much harder than usual.
pub const FLEE_FORCE_SCALE: f32 = 2.0;

impl KinematicBody {
    // Calculate separation force (avoid crowding neighbors)
    pub fn separate<N: Neighbor>(&self, neighbors: &[N], radius: f32) -> Vec3 {
        let mut sum = Vec3::ZERO;
        let mut count = 0;

        for other in neighbors {
            let d = self.position.distance(other.position());
            if d > 0.0 && d < radius {
                // Closer neighbors push harder
                sum += (self.position - other.position()).unit_or_zero() / d;
                count += 1;
            }
        }

        if count == 0 {
            return Vec3::ZERO;
        }

        let desired = (sum / count as f32).with_length(self.max_speed);
        (desired - self.velocity).limit(self.max_force)
    }

    // Calculate alignment force (steer towards average heading of neighbors)
    pub fn align<N: Neighbor>(&self, neighbors: &[N], radius: f32) -> Vec3 {
        let mut sum = Vec3::ZERO;
        let mut count = 0;

        for other in neighbors {
            let d = self.position.distance(other.position());
            if d > 0.0 && d < radius {
                sum += other.velocity();
                count += 1;
            }
        }

        if count == 0 {
            return Vec3::ZERO;
        }

        let desired = (sum / count as f32).with_length(self.max_speed);
        (desired - self.velocity).limit(self.max_force)
    }

    // Calculate cohesion force (steer towards average position of neighbors)
    pub fn cohere<N: Neighbor>(&self, neighbors: &[N], radius: f32) -> Vec3 {
        let mut sum = Vec3::ZERO;
        let mut count = 0;

        for other in neighbors {
            let d = self.position.distance(other.position());
            if d > 0.0 && d < radius {
                sum += other.position();
                count += 1;
            }
        }

        if count == 0 {
            return Vec3::ZERO;
        }

        self.seek(sum / count as f32)
    }

    /// Steer towards `target` at the body's own speed and force caps.
    pub fn seek(&self, target: Vec3) -> Vec3 {
        self.seek_with(target, self.max_speed, self.max_force)
    }

    /// Seek with explicit caps. A target on top of the body yields no force.
    pub fn seek_with(&self, target: Vec3, speed: f32, force: f32) -> Vec3 {
        let offset = target - self.position;
        if offset == Vec3::ZERO {
            return Vec3::ZERO;
        }
        let desired = offset.with_length(speed);
        (desired - self.velocity).limit(force)
    }

    pub fn follow_leader(&self, leader: Vec3) -> Vec3 {
        if self.position.distance(leader) > FOLLOW_LEADER_DISTANCE {
            self.seek(leader)
        } else {
            Vec3::ZERO
        }
    }

    pub fn avoid_predator(&self, predator: Vec3) -> Vec3 {
        if self.position.distance(predator) >= PREDATOR_AVOID_RADIUS {
            return Vec3::ZERO;
        }
        let flee = (self.position - predator).with_length(self.max_speed * FLEE_SPEED_SCALE);
        (flee - self.velocity).limit(self.max_force * FLEE_FORCE_SCALE)
    }
}

/// Weighted sum of all follower behaviors. The sum itself is not clamped;
/// the speed clamp in `integrate` bounds the result.
pub fn blend<N: Neighbor>(
    body: &KinematicBody,
    neighbors: &[N],
    leader: Option<Vec3>,
    predator: Option<Vec3>,
    params: &SteeringParams,
) -> Vec3 {
    let mut force = body.separate(neighbors, params.separation_radius) * params.separation_weight
        + body.align(neighbors, params.alignment_radius) * params.alignment_weight
        + body.cohere(neighbors, params.cohesion_radius) * params.cohesion_weight;

    if let Some(leader) = leader {
        force += body.follow_leader(leader) * params.leader_follow_weight;
    }
    if let Some(predator) = predator {
        force += body.avoid_predator(predator) * params.predator_avoid_weight;
    }

    force
}
