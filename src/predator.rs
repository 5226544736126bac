/*
 * Predator Module
 *
 * The predator is a slower, heavier body that periodically locks onto the
 * fish closest to it and keeps seeking that spot until the next scan.
 */

use nannou::geom::{vec3, Vec3};
use rand::Rng;

use crate::body::{KinematicBody, Neighbor};
use crate::bounds::AquariumBounds;
use crate::fish::FACING_EPSILON;
use crate::params::PredatorParams;

#[derive(Clone, Debug)]
pub struct Predator {
    pub body: KinematicBody,
    pub chase_target: Vec3,
    /// Steps since the last nearest-fish scan.
    pub retarget_timer: f32,
    retarget_period: f32,
    facing: Vec3,
}

impl Predator {
    pub fn new(position: Vec3, velocity: Vec3, chase_target: Vec3, params: &PredatorParams) -> Self {
        let body = KinematicBody::new(position, velocity, params.max_speed, params.max_force)
            .with_containment(params.bounce_force, params.margin);
        Self {
            body,
            chase_target,
            retarget_timer: 0.0,
            retarget_period: params.retarget_period.max(1) as f32,
            facing: body.heading(FACING_EPSILON).unwrap_or(vec3(1.0, 0.0, 0.0)),
        }
    }

    /// Spawn somewhere in the central part of the tank, drifting slowly.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, bounds: &AquariumBounds, params: &PredatorParams) -> Self {
        let position = bounds.random_point_scaled(rng, 0.8);
        let velocity = vec3(
            (rng.gen::<f32>() - 0.5) * 0.8,
            (rng.gen::<f32>() - 0.5) * 0.2,
            (rng.gen::<f32>() - 0.5) * 0.8,
        );
        Self::new(position, velocity, bounds.center(), params)
    }

    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    pub fn facing(&self) -> Vec3 {
        self.facing
    }

    /// Index of the prey closest to the predator; the first one wins ties.
    pub fn nearest<N: Neighbor>(&self, prey: &[N]) -> Option<usize> {
        let mut closest = None;
        let mut closest_distance = f32::INFINITY;
        for (i, fish) in prey.iter().enumerate() {
            let distance = self.body.position.distance(fish.position());
            if distance < closest_distance {
                closest_distance = distance;
                closest = Some(i);
            }
        }
        closest
    }

    /// One full predator tick of length `step`: retarget when due, seek,
    /// integrate, contain.
    pub fn update<N: Neighbor>(&mut self, prey: &[N], bounds: &AquariumBounds, step: f32) {
        self.retarget_timer += step;
        if self.retarget_timer >= self.retarget_period {
            if let Some(i) = self.nearest(prey) {
                self.chase_target = prey[i].position();
            }
            self.retarget_timer = 0.0;
        }

        let force = self.body.seek(self.chase_target);
        self.body.apply_force(force);
        self.body.integrate(step);
        self.body.contain(bounds);

        if let Some(heading) = self.body.heading(FACING_EPSILON) {
            self.facing = heading;
        }
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.body.position += offset;
        self.chase_target += offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BodyState;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn still(position: Vec3) -> BodyState {
        BodyState { position, velocity: Vec3::ZERO }
    }

    #[test]
    fn nearest_breaks_ties_by_order() {
        let bounds = AquariumBounds::default();
        let predator = Predator::new(bounds.center(), Vec3::ZERO, bounds.center(), &PredatorParams::default());
        let c = bounds.center();
        let prey = [
            still(c + vec3(10.0, 0.0, 0.0)),
            still(c + vec3(0.0, 4.0, 0.0)),
            still(c + vec3(-4.0, 0.0, 0.0)),
        ];
        assert_eq!(predator.nearest(&prey), Some(1));

        let none: [BodyState; 0] = [];
        assert_eq!(predator.nearest(&none), None);
    }

    #[test]
    fn retargets_after_exactly_one_period() {
        let params = PredatorParams::default();
        let bounds = AquariumBounds::default();
        let c = bounds.center();
        let mut predator = Predator::new(c, Vec3::ZERO, c, &params);
        let prey = [
            still(c + vec3(20.0, 0.0, 0.0)),
            still(c + vec3(-3.0, 0.0, 0.0)),
            still(c + vec3(0.0, 0.0, 15.0)),
        ];

        for _ in 0..params.retarget_period - 1 {
            predator.update(&prey, &bounds, 1.0);
            assert_eq!(predator.chase_target, c);
        }

        // Re-centre so the expected winner does not depend on where it drifted
        predator.body.position = c;
        predator.update(&prey, &bounds, 1.0);
        assert_eq!(predator.chase_target, prey[1].position);
        assert_eq!(predator.retarget_timer, 0.0);
    }

    #[test]
    fn retarget_period_is_measured_in_steps() {
        let params = PredatorParams::default();
        let bounds = AquariumBounds::default();
        let c = bounds.center();
        let mut predator = Predator::new(c, Vec3::ZERO, c, &params);
        let prey = [still(c + vec3(-3.0, 0.0, 0.0))];

        // Twice as many half-length ticks make up one period
        for _ in 0..params.retarget_period * 2 - 1 {
            predator.update(&prey, &bounds, 0.5);
        }
        assert_eq!(predator.chase_target, c);
        assert_eq!(predator.retarget_timer, params.retarget_period as f32 - 0.5);

        predator.update(&prey, &bounds, 0.5);
        assert_eq!(predator.chase_target, prey[0].position);
        assert_eq!(predator.retarget_timer, 0.0);
    }

    #[test]
    fn predator_respects_its_caps_and_the_tank() {
        let params = PredatorParams::default();
        let bounds = AquariumBounds::default();
        let mut rng = StdRng::seed_from_u64(11);
        let mut predator = Predator::spawn(&mut rng, &bounds, &params);
        let prey = [still(bounds.max() + vec3(50.0, 50.0, 50.0))];

        // A wall bounce may add up to bounce_force on each reflected axis
        let speed_bound = params.max_speed + params.bounce_force * 3.0_f32.sqrt() + 1.0e-5;
        for _ in 0..2000 {
            predator.update(&prey, &bounds, 1.0);
            assert!(predator.body.velocity.length() <= speed_bound);
            assert!(bounds.contains(predator.position(), params.margin - 1.0e-4));
        }
    }
}
