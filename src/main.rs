/*
 * Aquarium
 *
 * A school of fish swims in a glass tank on a table. One leader wanders
 * between random targets and the rest of the school follows it using three
 * flocking rules:
 * 1. Separation: Avoid crowding neighbors
 * 2. Alignment: Steer towards the average heading of neighbors
 * 3. Cohesion: Steer towards the average position of neighbors
 *
 * A predator can be dropped into the tank; it hunts the nearest fish and the
 * school scatters away from it.
 *
 * Usage: aquarium [params.json]
 * Log verbosity follows RUST_LOG (default "info").
 */

use tracing_subscriber::EnvFilter;

use aquarium::app;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    nannou::app(app::model).update(app::update).run();
}
