/*
 * School Module
 *
 * The School owns the roster of fish, the optional predator and the tank,
 * and advances all of them once per tick:
 *
 * 1. Forces: the leader wanders or flees, every follower blends the flocking
 *    rules against the rest of the roster.
 * 2. Kinematics and containment for every fish.
 * 3. The predator's own retarget/seek/move/contain cycle.
 *
 * With the Snapshot policy every force in step 1 is computed from the
 * start-of-tick state, which also lets the follower pass run on rayon's pool.
 * The Sequential policy updates fish one at a time in roster order.
 *
 * User intents (add, remove, pause, predator, reset) are applied between
 * ticks through `&mut self`.
 */

use nannou::geom::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::body::BodyState;
use crate::bounds::AquariumBounds;
use crate::config::ConfigError;
use crate::fish::{Fish, FishRole};
use crate::params::{NeighborPolicy, SimulationParams, SteeringParams};
use crate::predator::Predator;
use crate::steering::blend;

/// New fish appear in this central fraction of the tank.
pub const SPAWN_FRACTION: f32 = 0.8;

/// A user request, applied between ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    AddFish,
    RemoveFish,
    TogglePause,
    TogglePredator,
    ResetSchool,
}

pub struct School {
    fish: Vec<Fish>,
    predator: Option<Predator>,
    bounds: AquariumBounds,
    params: SimulationParams,
    rng: StdRng,
    paused: bool,
    ticks: u64,
}

impl Default for School {
    fn default() -> Self {
        Self::build(SimulationParams::default())
    }
}

impl School {
    /// Build a school from validated parameters.
    pub fn new(params: SimulationParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self::build(params))
    }

    fn build(params: SimulationParams) -> Self {
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut school = Self {
            fish: Vec::new(),
            predator: None,
            bounds: params.bounds,
            params,
            rng,
            paused: false,
            ticks: 0,
        };
        school.reset_school();
        school
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn bounds(&self) -> &AquariumBounds {
        &self.bounds
    }

    pub fn fish(&self) -> &[Fish] {
        &self.fish
    }

    pub fn predator(&self) -> Option<&Predator> {
        self.predator.as_ref()
    }

    pub fn has_predator(&self) -> bool {
        self.predator.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn leader_index(&self) -> Option<usize> {
        self.fish.iter().position(Fish::is_leader)
    }

    pub fn leader(&self) -> Option<&Fish> {
        self.leader_index().map(|i| &self.fish[i])
    }

    /// Number of fish other than the leader.
    pub fn follower_count(&self) -> usize {
        self.fish.iter().filter(|f| !f.is_leader()).count()
    }

    /// Whole units between the leader and the tank floor.
    pub fn leader_depth(&self) -> Option<u32> {
        let floor = self.bounds.min().y;
        self.leader()
            .map(|leader| (leader.position().y - floor).max(0.0).round() as u32)
    }

    /// Start-of-tick positions and velocities of the whole roster.
    pub fn snapshot(&self) -> Vec<BodyState> {
        self.fish.iter().map(|f| f.body.state()).collect()
    }

    // Advance the whole school by one tick
    pub fn tick(&mut self, dt: f32) {
        if self.paused {
            return;
        }

        let step = self.params.integration.step(dt);
        match self.params.neighbor_policy {
            NeighborPolicy::Snapshot => self.tick_snapshot(step),
            NeighborPolicy::Sequential => self.tick_sequential(step),
        }

        let bounds = self.bounds;
        if let Some(predator) = self.predator.as_mut() {
            predator.update(&self.fish, &bounds, step);
        }

        self.ticks += 1;
    }

    fn tick_snapshot(&mut self, step: f32) {
        let mut forces = self.snapshot_forces();

        let bounds = self.bounds;
        if let Some(i) = self.leader_index() {
            let predator = self.predator.as_ref().map(Predator::position);
            forces[i] = self.fish[i].leader_force(&mut self.rng, predator, &bounds, step);
        }

        let swim = self.params.swim;
        for (fish, force) in self.fish.iter_mut().zip(forces) {
            fish.body.apply_force(force);
            fish.advance(step, &swim, &bounds);
        }
    }

    /// Follower forces computed from the start-of-tick snapshot, indexed
    /// like the roster. The leader's slot is zero; its force comes from its
    /// own wander/avoid state during the tick.
    pub fn snapshot_forces(&self) -> Vec<Vec3> {
        let snapshot = self.snapshot();
        let leader_index = self.leader_index();
        let leader = leader_index.map(|i| snapshot[i].position);
        let predator = self.predator.as_ref().map(Predator::position);
        let steering = self.params.steering;
        let fish = &self.fish;

        let follower_force = |i: usize| -> Vec3 {
            if Some(i) == leader_index {
                return Vec3::ZERO;
            }
            blend(&fish[i].body, &snapshot, leader, predator, &steering)
        };

        if self.params.enable_parallel {
            (0..fish.len()).into_par_iter().map(&follower_force).collect()
        } else {
            (0..fish.len()).map(&follower_force).collect()
        }
    }

    fn tick_sequential(&mut self, step: f32) {
        let bounds = self.bounds;
        let swim = self.params.swim;
        let steering = self.params.steering;
        let predator = self.predator.as_ref().map(Predator::position);
        let leader_index = self.leader_index();

        for i in 0..self.fish.len() {
            let force = if Some(i) == leader_index {
                self.fish[i].leader_force(&mut self.rng, predator, &bounds, step)
            } else {
                // Earlier fish have already moved this tick
                let leader = leader_index.map(|l| self.fish[l].position());
                blend(&self.fish[i].body, &self.fish, leader, predator, &steering)
            };

            let fish = &mut self.fish[i];
            fish.body.apply_force(force);
            fish.advance(step, &swim, &bounds);
        }
    }

    fn spawn_follower(&mut self) -> Fish {
        let position = self.bounds.random_point_scaled(&mut self.rng, SPAWN_FRACTION);
        Fish::new(&mut self.rng, position, FishRole::Follower, &self.params.steering)
    }

    /// Replace the roster with a fresh leader and school, and drop the
    /// predator.
    pub fn reset_school(&mut self) {
        self.predator = None;

        let count = self.params.initial_followers;
        let mut fish = Vec::with_capacity(count + 1);
        let center = self.bounds.center();
        fish.push(Fish::new(&mut self.rng, center, FishRole::Leader, &self.params.steering));
        for _ in 0..count {
            fish.push(self.spawn_follower());
        }

        self.fish = fish;
        self.ticks = 0;
        info!(followers = count, bounds = %self.bounds, "school reset");
    }

    pub fn add_fish(&mut self) {
        let fish = self.spawn_follower();
        self.fish.push(fish);
        debug!(followers = self.follower_count(), "fish added");
    }

    /// Remove the most recently added follower. The leader is never
    /// removed; with no followers left this is a no-op returning false.
    pub fn remove_fish(&mut self) -> bool {
        match self.fish.iter().rposition(|f| !f.is_leader()) {
            Some(i) => {
                self.fish.remove(i);
                debug!(followers = self.follower_count(), "fish removed");
                true
            }
            None => false,
        }
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        debug!(paused = self.paused, "pause toggled");
        self.paused
    }

    /// Spawn the predator, or remove it if one is already swimming.
    pub fn toggle_predator(&mut self) -> bool {
        if self.predator.take().is_none() {
            self.predator = Some(Predator::spawn(&mut self.rng, &self.bounds, &self.params.predator));
        }
        debug!(predator = self.has_predator(), "predator toggled");
        self.has_predator()
    }

    pub fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::AddFish => self.add_fish(),
            Intent::RemoveFish => {
                self.remove_fish();
            }
            Intent::TogglePause => {
                self.toggle_pause();
            }
            Intent::TogglePredator => {
                self.toggle_predator();
            }
            Intent::ResetSchool => self.reset_school(),
        }
    }

    /// Move the tank so it is centered on `origin`, carrying every body with it.
    pub fn reanchor(&mut self, origin: Vec3) {
        let offset = origin - self.bounds.center();
        self.bounds.reanchor(origin);
        self.params.bounds = self.bounds;
        for fish in &mut self.fish {
            fish.translate(offset);
        }
        if let Some(predator) = self.predator.as_mut() {
            predator.translate(offset);
        }
        info!(bounds = %self.bounds, "aquarium re-anchored");
    }

    /// Swap in new steering tuning; caps apply from the next tick. Rejected
    /// tunings leave the school unchanged.
    pub fn set_steering(&mut self, steering: SteeringParams) -> Result<(), ConfigError> {
        let mut params = self.params.clone();
        params.steering = steering;
        params.validate()?;
        self.params = params;

        for fish in &mut self.fish {
            fish.body.max_speed = steering.max_speed;
            fish.body.max_force = steering.max_force;
            fish.body.bounce_force = steering.bounce_force;
            fish.body.margin = steering.margin;
        }
        Ok(())
    }

    pub fn set_enable_parallel(&mut self, enabled: bool) {
        self.params.enable_parallel = enabled;
    }
}
