/*
 * Aquarium Simulation - Module Definitions
 *
 * This file defines the module structure for the aquarium simulation.
 * The simulation core (math through school) has no window dependency beyond
 * nannou's vector types; app, camera, renderer, ui, input and debug form the
 * nannou front end.
 */

// Re-export key components for easier access
pub use body::{BodyState, KinematicBody, Neighbor};
pub use bounds::AquariumBounds;
pub use config::ConfigError;
pub use fish::{Fish, FishKind, FishRole};
pub use params::{IntegrationMode, NeighborPolicy, PredatorParams, SimulationParams, SteeringParams, SwimParams};
pub use predator::Predator;
pub use school::{Intent, School};

// Simulation core
pub mod math;
pub mod bounds;
pub mod params;
pub mod config;
pub mod body;
pub mod steering;
pub mod fish;
pub mod predator;
pub mod school;

// Front end
pub mod app;
pub mod camera;
pub mod debug;
pub mod input;
pub mod renderer;
pub mod ui;
