/*
 * Fish Module
 *
 * This module defines the Fish struct: a kinematic body plus everything a
 * fish needs beyond raw motion. Followers flock (see `steering::blend`);
 * the single leader runs a small wander/avoid state machine instead and the
 * rest of the school is drawn towards it.
 *
 * Every fish also bobs gently around the height it was spawned at.
 */

use std::f32::consts::TAU;
use std::ops::Range;

use nannou::geom::{vec3, Vec3};
use rand::Rng;

use crate::body::{KinematicBody, Neighbor};
use crate::bounds::AquariumBounds;
use crate::params::{SteeringParams, SwimParams};

/// Below this speed a fish keeps its previous facing.
pub const FACING_EPSILON: f32 = 0.01;

/// The wander target is drawn from the tank shrunk by this much per axis.
pub const WANDER_MARGIN: f32 = 15.0;

/// Wander timing is measured in steps; one fixed-step tick is one step.
pub const INITIAL_WANDER_INTERVAL: f32 = 200.0;
pub const WANDER_INTERVAL_RANGE: Range<u32> = 150..250;

pub const WANDER_SPEED_SCALE: f32 = 1.2;
pub const WANDER_FORCE_SCALE: f32 = 1.2;

/// The leader only wanders while the flee force is below this fraction of
/// its force cap.
pub const AVOID_THRESHOLD: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FishRole {
    Leader,
    Follower,
}

/// Cosmetic variety; the renderer picks colors from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FishKind {
    Tropical,
    Deep,
    School,
}

impl FishKind {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.gen_range(0..3) {
            0 => FishKind::Tropical,
            1 => FishKind::Deep,
            _ => FishKind::School,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeaderMode {
    Wandering,
    Avoiding,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LeaderState {
    pub wander_target: Vec3,
    pub target_timer: f32,
    pub target_interval: f32,
    pub mode: LeaderMode,
}

#[derive(Clone, Debug)]
pub struct Fish {
    pub body: KinematicBody,
    pub role: FishRole,
    pub kind: FishKind,
    pub baseline_y: f32,
    pub swim_phase: f32,
    facing: Vec3,
    pub leader: Option<LeaderState>,
}

impl Fish {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, position: Vec3, role: FishRole, params: &SteeringParams) -> Self {
        // Random initial velocity, with less vertical movement
        let velocity = vec3(
            (rng.gen::<f32>() - 0.5) * params.max_speed,
            (rng.gen::<f32>() - 0.5) * params.max_speed * 0.3,
            (rng.gen::<f32>() - 0.5) * params.max_speed,
        );

        let body = KinematicBody::new(position, velocity, params.max_speed, params.max_force)
            .with_containment(params.bounce_force, params.margin);

        let leader = match role {
            FishRole::Leader => Some(LeaderState {
                wander_target: position,
                target_timer: 0.0,
                target_interval: INITIAL_WANDER_INTERVAL,
                mode: LeaderMode::Wandering,
            }),
            FishRole::Follower => None,
        };

        Self {
            body,
            role,
            kind: FishKind::random(rng),
            baseline_y: position.y,
            swim_phase: rng.gen_range(0.0..TAU),
            facing: body.heading(FACING_EPSILON).unwrap_or(vec3(1.0, 0.0, 0.0)),
            leader,
        }
    }

    pub fn is_leader(&self) -> bool {
        self.role == FishRole::Leader
    }

    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    /// Unit heading for the renderer.
    pub fn facing(&self) -> Vec3 {
        self.facing
    }

    /// Leader steering for one tick of length `step`: flee the predator when
    /// it is close, otherwise wander between random targets. Followers get no
    /// force here.
    pub fn leader_force<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        predator: Option<Vec3>,
        bounds: &AquariumBounds,
        step: f32,
    ) -> Vec3 {
        let body = self.body;
        let state = match self.leader.as_mut() {
            Some(state) => state,
            None => return Vec3::ZERO,
        };

        state.target_timer += step;

        let mut force = match predator {
            Some(predator) => body.avoid_predator(predator),
            None => Vec3::ZERO,
        };

        if force.length() < body.max_force * AVOID_THRESHOLD {
            state.mode = LeaderMode::Wandering;
            if state.target_timer >= state.target_interval {
                state.wander_target = bounds.random_point_shrunk(rng, WANDER_MARGIN);
                state.target_timer = 0.0;
                state.target_interval = rng.gen_range(WANDER_INTERVAL_RANGE) as f32;
            }
            force += body.seek_with(
                state.wander_target,
                body.max_speed * WANDER_SPEED_SCALE,
                body.max_force * WANDER_FORCE_SCALE,
            );
        } else {
            state.mode = LeaderMode::Avoiding;
        }

        force
    }

    /// Kinematics, bob and containment for one tick, in that order. A zero
    /// step leaves the bob where it is.
    pub fn advance(&mut self, step: f32, swim: &SwimParams, bounds: &AquariumBounds) {
        self.body.integrate(step);
        if step > 0.0 {
            self.bob(step, swim);
        }
        self.body.contain(bounds);

        if let Some(heading) = self.body.heading(FACING_EPSILON) {
            self.facing = heading;
        }
    }

    fn bob(&mut self, step: f32, swim: &SwimParams) {
        let speed_ratio = if self.body.max_speed > 0.0 {
            self.body.velocity.length() / self.body.max_speed
        } else {
            0.0
        };
        self.swim_phase += swim.cycle_rate * (speed_ratio + 0.5) * step;
        if swim.bob_frequency > 0.0 {
            // Keep the phase small without a jump in the bob
            self.swim_phase %= TAU / swim.bob_frequency;
        }
        self.body.position.y =
            self.baseline_y + (self.swim_phase * swim.bob_frequency).sin() * swim.bob_amplitude;
    }

    /// Move the fish and everything anchored to it by `offset`.
    pub fn translate(&mut self, offset: Vec3) {
        self.body.position += offset;
        self.baseline_y += offset.y;
        if let Some(state) = self.leader.as_mut() {
            state.wander_target += offset;
        }
    }
}

impl Neighbor for Fish {
    fn position(&self) -> Vec3 {
        self.body.position
    }

    fn velocity(&self) -> Vec3 {
        self.body.velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn leader_at(rng: &mut StdRng, position: Vec3) -> Fish {
        Fish::new(rng, position, FishRole::Leader, &SteeringParams::default())
    }

    #[test]
    fn only_leaders_carry_wander_state() {
        let mut rng = StdRng::seed_from_u64(1);
        let params = SteeringParams::default();
        let leader = Fish::new(&mut rng, Vec3::ZERO, FishRole::Leader, &params);
        let follower = Fish::new(&mut rng, Vec3::ZERO, FishRole::Follower, &params);

        assert!(leader.is_leader());
        assert_eq!(leader.leader.as_ref().map(|s| s.target_interval), Some(INITIAL_WANDER_INTERVAL));
        assert!(follower.leader.is_none());
        assert!(follower.body.velocity.length() <= params.max_speed);
    }

    #[test]
    fn leader_picks_new_target_when_timer_fires() {
        let mut rng = StdRng::seed_from_u64(2);
        let bounds = AquariumBounds::default();
        let mut leader = leader_at(&mut rng, bounds.center());

        for _ in 0..199 {
            leader.leader_force(&mut rng, None, &bounds, 1.0);
        }
        assert_eq!(leader.leader.as_ref().unwrap().wander_target, bounds.center());

        leader.leader_force(&mut rng, None, &bounds, 1.0);
        let state = leader.leader.as_ref().unwrap();
        assert_eq!(state.target_timer, 0.0);
        assert!(WANDER_INTERVAL_RANGE.contains(&(state.target_interval as u32)));
        assert!(bounds.contains(state.wander_target, WANDER_MARGIN / 2.0 - 1.0e-3));
        assert_eq!(state.mode, LeaderMode::Wandering);
    }

    #[test]
    fn leader_flees_instead_of_wandering() {
        let mut rng = StdRng::seed_from_u64(3);
        let bounds = AquariumBounds::default();
        let mut leader = leader_at(&mut rng, bounds.center());
        leader.body.velocity = Vec3::ZERO;

        let predator = bounds.center() + vec3(5.0, 0.0, 0.0);
        let force = leader.leader_force(&mut rng, Some(predator), &bounds, 1.0);

        assert_eq!(leader.leader.as_ref().unwrap().mode, LeaderMode::Avoiding);
        assert!(force.x < 0.0);
        assert_eq!(force, leader.body.avoid_predator(predator));
    }

    #[test]
    fn wander_force_is_capped_at_boosted_force() {
        let mut rng = StdRng::seed_from_u64(4);
        let bounds = AquariumBounds::default();
        let mut leader = leader_at(&mut rng, bounds.center());
        leader.leader.as_mut().unwrap().wander_target = bounds.center() + vec3(20.0, 0.0, 0.0);

        let force = leader.leader_force(&mut rng, None, &bounds, 1.0);
        assert!(force.length() <= leader.body.max_force * WANDER_FORCE_SCALE + 1.0e-6);
        assert!(force.x > 0.0);
    }

    #[test]
    fn followers_get_no_leader_force() {
        let mut rng = StdRng::seed_from_u64(5);
        let bounds = AquariumBounds::default();
        let mut follower = Fish::new(&mut rng, bounds.center(), FishRole::Follower, &SteeringParams::default());
        assert_eq!(follower.leader_force(&mut rng, None, &bounds, 1.0), Vec3::ZERO);
    }

    #[test]
    fn bob_stays_near_baseline() {
        let mut rng = StdRng::seed_from_u64(6);
        let bounds = AquariumBounds::default();
        let swim = SwimParams::default();
        let mut fish = Fish::new(&mut rng, bounds.center(), FishRole::Follower, &SteeringParams::default());

        for _ in 0..1000 {
            fish.body.apply_force(vec3(0.0, 0.05, 0.0));
            fish.advance(1.0, &swim, &bounds);
            assert!((fish.position().y - fish.baseline_y).abs() <= swim.bob_amplitude + 1.0e-5);
        }
    }

    #[test]
    fn facing_follows_velocity_and_holds_when_still() {
        let mut rng = StdRng::seed_from_u64(7);
        let bounds = AquariumBounds::default();
        let swim = SwimParams::default();
        let mut fish = Fish::new(&mut rng, bounds.center(), FishRole::Follower, &SteeringParams::default());

        fish.body.velocity = vec3(0.0, 0.0, 0.3);
        fish.advance(1.0, &swim, &bounds);
        let facing = fish.facing();
        assert!((facing - vec3(0.0, 0.0, 1.0)).length() < 1.0e-5);

        fish.body.velocity = Vec3::ZERO;
        fish.advance(1.0, &swim, &bounds);
        assert_eq!(fish.facing(), facing);
    }

    #[test]
    fn translate_moves_anchors_too() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut leader = leader_at(&mut rng, Vec3::ZERO);
        leader.translate(vec3(1.0, 2.0, 3.0));
        assert_eq!(leader.position(), vec3(1.0, 2.0, 3.0));
        assert_eq!(leader.baseline_y, 2.0);
        assert_eq!(leader.leader.unwrap().wander_target, vec3(1.0, 2.0, 3.0));
    }

    #[test]
    fn wander_timer_counts_steps_not_calls() {
        let mut rng = StdRng::seed_from_u64(9);
        let bounds = AquariumBounds::default();
        let mut leader = leader_at(&mut rng, bounds.center());

        // 399 half steps are 199.5 steps: not due yet
        for _ in 0..399 {
            leader.leader_force(&mut rng, None, &bounds, 0.5);
        }
        assert_eq!(leader.leader.as_ref().unwrap().wander_target, bounds.center());

        leader.leader_force(&mut rng, None, &bounds, 0.5);
        assert_eq!(leader.leader.as_ref().unwrap().target_timer, 0.0);
    }

    #[test]
    fn zero_step_leaves_the_fish_in_place() {
        let mut rng = StdRng::seed_from_u64(10);
        let bounds = AquariumBounds::default();
        let mut fish = Fish::new(&mut rng, bounds.center(), FishRole::Follower, &SteeringParams::default());
        let before = fish.position();

        fish.advance(0.0, &SwimParams::default(), &bounds);
        assert_eq!(fish.position(), before);
    }

    #[test]
    fn zero_speed_cap_keeps_the_bob_finite() {
        let mut rng = StdRng::seed_from_u64(11);
        let bounds = AquariumBounds::default();
        let params = SteeringParams {
            max_speed: 0.0,
            ..SteeringParams::default()
        };
        let mut fish = Fish::new(&mut rng, bounds.center(), FishRole::Follower, &params);

        for _ in 0..10 {
            fish.advance(1.0, &SwimParams::default(), &bounds);
            let p = fish.position();
            assert!(p.x.is_finite() && p.y.is_finite() && p.z.is_finite());
            assert!(fish.swim_phase.is_finite());
        }
    }
}
