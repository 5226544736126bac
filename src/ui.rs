/*
 * UI Module
 *
 * This module contains functions for creating and updating the user interface
 * using nannou_egui. It exposes the school intents as buttons, the steering
 * tuning as sliders, and a few live readouts. Nothing is applied to the
 * school here; the caller gets a UiActions value back.
 */

use nannou_egui::{egui, Egui};

use crate::debug::DebugInfo;
use crate::params::{SimulationParams, SteeringParams};
use crate::school::{Intent, School};

#[derive(Debug, Default)]
pub struct UiActions {
    pub intents: Vec<Intent>,
    pub steering: Option<SteeringParams>,
    pub enable_parallel: Option<bool>,
}

// Update the UI and collect whatever the user asked for this frame
pub fn update_ui(egui: &mut Egui, school: &School, show_debug: &mut bool, debug_info: &DebugInfo) -> UiActions {
    let mut actions = UiActions::default();
    let mut steering = school.params().steering;
    let mut enable_parallel = school.params().enable_parallel;

    let ctx = egui.begin_frame();

    egui::Window::new("Aquarium Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.collapsing("School", |ui| {
                ui.horizontal(|ui| {
                    if ui.button("Add Fish").clicked() {
                        actions.intents.push(Intent::AddFish);
                    }
                    if ui.button("Remove Fish").clicked() {
                        actions.intents.push(Intent::RemoveFish);
                    }
                });
                ui.horizontal(|ui| {
                    let predator_label = if school.has_predator() { "Remove Predator" } else { "Add Predator" };
                    if ui.button(predator_label).clicked() {
                        actions.intents.push(Intent::TogglePredator);
                    }
                    if ui.button("Reset School").clicked() {
                        actions.intents.push(Intent::ResetSchool);
                    }
                });
                let pause_label = if school.is_paused() { "Resume" } else { "Pause" };
                if ui.button(pause_label).clicked() {
                    actions.intents.push(Intent::TogglePause);
                }

                ui.label(format!("Following fish: {}", school.follower_count()));
                if let Some(depth) = school.leader_depth() {
                    ui.label(format!("Leader depth: {} m", depth));
                }
            });

            ui.collapsing("Steering", |ui| {
                ui.add(egui::Slider::new(&mut steering.max_speed, SimulationParams::get_max_speed_range()).text("Max Speed"));
                ui.add(egui::Slider::new(&mut steering.max_force, SimulationParams::get_max_force_range()).text("Max Force"));
                ui.separator();
                ui.add(egui::Slider::new(&mut steering.separation_weight, SimulationParams::get_weight_range()).text("Separation Weight"));
                ui.add(egui::Slider::new(&mut steering.alignment_weight, SimulationParams::get_weight_range()).text("Alignment Weight"));
                ui.add(egui::Slider::new(&mut steering.cohesion_weight, SimulationParams::get_weight_range()).text("Cohesion Weight"));
                ui.add(egui::Slider::new(&mut steering.leader_follow_weight, SimulationParams::get_weight_range()).text("Leader Weight"));
                ui.add(egui::Slider::new(&mut steering.predator_avoid_weight, SimulationParams::get_weight_range()).text("Predator Weight"));
                ui.separator();
                ui.add(egui::Slider::new(&mut steering.separation_radius, SimulationParams::get_radius_range()).text("Separation Radius"));
                ui.add(egui::Slider::new(&mut steering.alignment_radius, SimulationParams::get_radius_range()).text("Alignment Radius"));
                ui.add(egui::Slider::new(&mut steering.cohesion_radius, SimulationParams::get_radius_range()).text("Cohesion Radius"));
            });

            ui.collapsing("Performance", |ui| {
                ui.checkbox(&mut enable_parallel, "Enable Parallel Processing");
                ui.label(format!("FPS: {:.1}", debug_info.fps));
                ui.label(format!("Frame time: {:.2} ms", debug_info.frame_time.as_secs_f64() * 1000.0));
            });

            ui.checkbox(show_debug, "Show Debug Info");
            ui.label("Keys: Space pause, P predator, +/- fish, R reset");
        });

    if steering != school.params().steering {
        actions.steering = Some(steering);
    }
    if enable_parallel != school.params().enable_parallel {
        actions.enable_parallel = Some(enable_parallel);
    }

    actions
}

// Draw debug information on the screen
pub fn draw_debug_info(draw: &nannou::Draw, debug_info: &DebugInfo, window_rect: nannou::geom::Rect) {
    let lines = debug_info.lines();

    // Background panel in the top-right corner, clear of the control window
    let margin = 20.0;
    let line_height = 20.0;
    let panel_width = 220.0;
    let panel_height = line_height * lines.len() as f32 + margin;
    let panel_x = window_rect.right() - panel_width / 2.0;
    let panel_y = window_rect.top() - panel_height / 2.0;

    draw.rect()
        .x_y(panel_x, panel_y)
        .w_h(panel_width, panel_height)
        .color(nannou::color::rgba(0.0, 0.0, 0.0, 0.7));

    let text_x = window_rect.right() - panel_width + margin;
    let text_y = window_rect.top() - margin;

    for (i, text) in lines.iter().enumerate() {
        let y = text_y - (i as f32 * line_height);

        // nannou centers text, so offset by half a typical line width
        draw.text(text)
            .x_y(text_x + 80.0, y)
            .color(nannou::color::WHITE)
            .font_size(14);
    }
}
