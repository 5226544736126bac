/*
 * Application Module
 *
 * This module defines the main application model and logic for the aquarium.
 * It handles the initialization of the window, the control UI and the school,
 * and drives one simulation tick per frame.
 *
 * Parameters come from the JSON file given as the first command line
 * argument, falling back to the defaults when it is missing or invalid.
 */

use nannou::prelude::*;
use nannou_egui::Egui;
use tracing::{info, warn};

use crate::camera::Camera;
use crate::debug::DebugInfo;
use crate::input::{key_pressed, raw_window_event};
use crate::params::SimulationParams;
use crate::renderer::view;
use crate::school::School;
use crate::ui;

pub const WINDOW_WIDTH: u32 = 1280;
pub const WINDOW_HEIGHT: u32 = 800;

// Main model for the application
pub struct Model {
    pub school: School,
    pub egui: Egui,
    pub debug_info: DebugInfo,
    pub camera: Camera,
    pub backdrop: Option<wgpu::Texture>,
    pub show_debug: bool,
}

// Initialize the model
pub fn model(app: &App) -> Model {
    let window_id = app
        .new_window()
        .title("Aquarium")
        .size(WINDOW_WIDTH, WINDOW_HEIGHT)
        .view(view)
        .key_pressed(key_pressed)
        .raw_event(raw_window_event)
        .build()
        .expect("failed to create the aquarium window");

    let egui = {
        let window = app.window(window_id).expect("aquarium window closed during startup");
        Egui::from_window(&window)
    };

    let params = load_params(std::env::args().nth(1));
    let backdrop = params.backdrop.as_deref().and_then(|path| load_backdrop(app, path));
    let camera = Camera::looking_at(params.bounds.center());
    let show_debug = params.show_debug;

    let school = School::new(params).unwrap_or_else(|e| {
        warn!(error = %e, "invalid parameters, using defaults");
        School::default()
    });
    info!(
        fish = school.fish().len(),
        bounds = %school.bounds(),
        policy = ?school.params().neighbor_policy,
        "aquarium ready"
    );

    let mut debug_info = DebugInfo::default();
    debug_info.observe(&school);

    Model {
        school,
        egui,
        debug_info,
        camera,
        backdrop,
        show_debug,
    }
}

/// Parameters from an optional JSON file; any failure falls back to the defaults.
pub fn load_params(path: Option<String>) -> SimulationParams {
    let path = match path {
        Some(path) => path,
        None => return SimulationParams::default(),
    };

    match SimulationParams::load(&path) {
        Ok(params) => params,
        Err(e) => {
            warn!(path = %path, error = %e, "could not load parameters, using defaults");
            SimulationParams::default()
        }
    }
}

// The backdrop is decoration only; the aquarium runs without it
fn load_backdrop(app: &App, path: &str) -> Option<wgpu::Texture> {
    match wgpu::Texture::from_path(app, path) {
        Ok(texture) => Some(texture),
        Err(e) => {
            warn!(path, error = %e, "could not load backdrop image");
            None
        }
    }
}

// Update the model
pub fn update(app: &App, model: &mut Model, update: Update) {
    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;

    let actions = ui::update_ui(&mut model.egui, &model.school, &mut model.show_debug, &model.debug_info);
    for intent in actions.intents {
        model.school.apply(intent);
    }
    if let Some(steering) = actions.steering {
        if let Err(e) = model.school.set_steering(steering) {
            warn!(error = %e, "steering change rejected");
        }
    }
    if let Some(enabled) = actions.enable_parallel {
        model.school.set_enable_parallel(enabled);
    }

    model.school.tick(update.since_last.as_secs_f32());

    model.camera.target = model.school.bounds().center();
    model.debug_info.observe(&model.school);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_falls_back_to_defaults() {
        assert_eq!(load_params(None), SimulationParams::default());
        assert_eq!(
            load_params(Some("/nonexistent/aquarium.json".to_string())),
            SimulationParams::default()
        );
    }

    #[test]
    fn invalid_config_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("aquarium-invalid-params.json");
        std::fs::write(&path, r#"{ "steering": { "max_speed": -1.0 } }"#).unwrap();
        let params = load_params(Some(path.to_string_lossy().into_owned()));
        std::fs::remove_file(&path).ok();
        assert_eq!(params, SimulationParams::default());
    }
}
