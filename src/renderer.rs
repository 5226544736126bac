/*
 * Renderer Module
 *
 * This module handles the rendering of the aquarium.
 * It draws the optional backdrop, the table and the glass tank, every fish
 * and the predator, and the debug overlay.
 *
 * Bodies are projected through the Camera and drawn far to near so closer
 * fish cover the ones behind them.
 */

use std::cmp::Ordering;

use nannou::prelude::*;
use tracing::warn;

use crate::app::Model;
use crate::bounds::AquariumBounds;
use crate::camera::Camera;
use crate::fish::{Fish, FishKind};
use crate::ui;

pub const FISH_LENGTH: f32 = 1.6;
pub const PREDATOR_LENGTH: f32 = 4.0;

const TABLE_OVERHANG: f32 = 10.0;

struct Sprite {
    position: Vec3,
    facing: Vec3,
    length: f32,
    color: Rgb,
}

fn fish_color(fish: &Fish) -> Rgb {
    if fish.is_leader() {
        return rgb(0.9, 0.15, 0.15);
    }
    match fish.kind {
        FishKind::Tropical => rgb(1.0, 0.6, 0.1),
        FishKind::Deep => rgb(0.2, 0.4, 0.9),
        FishKind::School => rgb(0.75, 0.8, 0.85),
    }
}

// Render the model
pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(rgb(0.02, 0.05, 0.1));

    let window_rect = app.window_rect();
    if let Some(backdrop) = &model.backdrop {
        draw.texture(backdrop).wh(window_rect.wh());
    }

    let camera = &model.camera;
    let bounds = model.school.bounds();
    draw_table(&draw, camera, bounds, window_rect);
    draw_tank(&draw, camera, bounds, window_rect);

    let mut sprites: Vec<Sprite> = model
        .school
        .fish()
        .iter()
        .map(|fish| Sprite {
            position: fish.position(),
            facing: fish.facing(),
            length: if fish.is_leader() { FISH_LENGTH * 1.3 } else { FISH_LENGTH },
            color: fish_color(fish),
        })
        .collect();
    if let Some(predator) = model.school.predator() {
        sprites.push(Sprite {
            position: predator.position(),
            facing: predator.facing(),
            length: PREDATOR_LENGTH,
            color: rgb(0.35, 0.35, 0.4),
        });
    }

    // Far to near
    sprites.sort_by(|a, b| {
        camera
            .depth(b.position)
            .partial_cmp(&camera.depth(a.position))
            .unwrap_or(Ordering::Equal)
    });
    for sprite in &sprites {
        draw_sprite(&draw, camera, window_rect, sprite);
    }

    if model.show_debug {
        draw_debug_overlay(&draw, model, window_rect);
        ui::draw_debug_info(&draw, &model.debug_info, window_rect);
    }

    if let Err(e) = draw.to_frame(app, &frame) {
        warn!(error = ?e, "failed to draw the aquarium");
    }

    // Draw the egui UI
    if let Err(e) = model.egui.draw_to_frame(&frame) {
        warn!(error = ?e, "failed to draw the control window");
    }
}

// Draw a body as a triangle pointing along its projected facing
fn draw_sprite(draw: &Draw, camera: &Camera, window_rect: Rect, sprite: &Sprite) {
    let center = camera.world_to_screen(sprite.position, window_rect);
    let head = camera.world_to_screen(sprite.position + sprite.facing * sprite.length, window_rect);
    let (center, head) = match (center, head) {
        (Some(center), Some(head)) => (center, head),
        _ => return,
    };

    let size = sprite.length * camera.scale_at(sprite.position);
    let projected = head - center;
    // Facing straight at the viewer leaves nothing to orient by
    let direction = if projected.length() > 1.0e-3 {
        projected / projected.length()
    } else {
        vec2(1.0, 0.0)
    };
    let side = vec2(-direction.y, direction.x) * size * 0.35;
    let tail = center - direction * size * 0.6;

    draw.polygon()
        .color(sprite.color)
        .points([center + direction * size * 0.6, tail + side, tail - side]);
}

fn corners(low: Vec3, high: Vec3) -> [Vec3; 8] {
    [
        vec3(low.x, low.y, low.z),
        vec3(high.x, low.y, low.z),
        vec3(high.x, low.y, high.z),
        vec3(low.x, low.y, high.z),
        vec3(low.x, high.y, low.z),
        vec3(high.x, high.y, low.z),
        vec3(high.x, high.y, high.z),
        vec3(low.x, high.y, high.z),
    ]
}

const TANK_EDGES: [(usize, usize); 12] = [
    (0, 1), (1, 2), (2, 3), (3, 0),
    (4, 5), (5, 6), (6, 7), (7, 4),
    (0, 4), (1, 5), (2, 6), (3, 7),
];

fn draw_tank(draw: &Draw, camera: &Camera, bounds: &AquariumBounds, window_rect: Rect) {
    let corners = corners(bounds.min(), bounds.max());
    let screen: Vec<Option<Vec2>> = corners
        .iter()
        .map(|&corner| camera.world_to_screen(corner, window_rect))
        .collect();

    for &(a, b) in TANK_EDGES.iter() {
        if let (Some(start), Some(end)) = (screen[a], screen[b]) {
            draw.line()
                .start(start)
                .end(end)
                .weight(1.5)
                .color(rgba(0.6, 0.85, 1.0, 0.5));
        }
    }
}

// The tank rests on a table top level with its floor
fn draw_table(draw: &Draw, camera: &Camera, bounds: &AquariumBounds, window_rect: Rect) {
    let low = bounds.min();
    let high = bounds.max();
    let y = low.y;
    let top = [
        vec3(low.x - TABLE_OVERHANG, y, low.z - TABLE_OVERHANG),
        vec3(high.x + TABLE_OVERHANG, y, low.z - TABLE_OVERHANG),
        vec3(high.x + TABLE_OVERHANG, y, high.z + TABLE_OVERHANG),
        vec3(low.x - TABLE_OVERHANG, y, high.z + TABLE_OVERHANG),
    ];

    let points: Option<Vec<Vec2>> = top
        .iter()
        .map(|&corner| camera.world_to_screen(corner, window_rect))
        .collect();
    if let Some(points) = points {
        draw.polygon().color(rgb(0.35, 0.22, 0.12)).points(points);
    }
}

fn draw_debug_overlay(draw: &Draw, model: &Model, window_rect: Rect) {
    let camera = &model.camera;
    let steering = &model.school.params().steering;

    if let Some(leader) = model.school.leader() {
        if let Some(screen_pos) = camera.world_to_screen(leader.position(), window_rect) {
            // Perception radii around the leader, scaled for its depth
            let scale = camera.scale_at(leader.position());
            draw.ellipse()
                .xy(screen_pos)
                .radius(steering.separation_radius * scale)
                .no_fill()
                .stroke(RED)
                .stroke_weight(1.0);
            draw.ellipse()
                .xy(screen_pos)
                .radius(steering.cohesion_radius * scale)
                .no_fill()
                .stroke(BLUE)
                .stroke_weight(1.0);

            if let Some(state) = &leader.leader {
                if let Some(target) = camera.world_to_screen(state.wander_target, window_rect) {
                    draw.line().start(screen_pos).end(target).weight(1.0).color(YELLOW);
                    draw.ellipse().xy(target).radius(4.0).color(YELLOW);
                }
            }
        }
    }

    if let Some(predator) = model.school.predator() {
        let start = camera.world_to_screen(predator.position(), window_rect);
        let end = camera.world_to_screen(predator.chase_target, window_rect);
        if let (Some(start), Some(end)) = (start, end) {
            draw.arrow().start(start).end(end).stroke_weight(1.5).color(ORANGE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fish::FishRole;
    use crate::params::SteeringParams;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn leader_is_drawn_in_its_own_color() {
        let mut rng = StdRng::seed_from_u64(1);
        let params = SteeringParams::default();
        let leader = Fish::new(&mut rng, Vec3::ZERO, FishRole::Leader, &params);
        let mut follower = Fish::new(&mut rng, Vec3::ZERO, FishRole::Follower, &params);

        for kind in [FishKind::Tropical, FishKind::Deep, FishKind::School] {
            follower.kind = kind;
            assert_ne!(fish_color(&follower), fish_color(&leader));
        }
    }

    #[test]
    fn tank_has_twelve_distinct_edges() {
        let corners = corners(vec3(-1.0, -1.0, -1.0), vec3(1.0, 1.0, 1.0));
        for &(a, b) in TANK_EDGES.iter() {
            // Every edge runs along exactly one axis
            let d = corners[a] - corners[b];
            let axes = [d.x, d.y, d.z].iter().filter(|c| c.abs() > 0.0).count();
            assert_eq!(axes, 1);
        }
    }
}
