/*
 * Input Module
 *
 * This module handles user input events for the aquarium.
 * Keyboard shortcuts map onto the same intents as the control window:
 *
 * - Space: pause / resume
 * - P: add / remove the predator
 * - + and -: add or remove a follower
 * - R: reset the school
 */

use nannou::prelude::*;

use crate::app::Model;
use crate::school::Intent;

pub fn intent_for_key(key: Key) -> Option<Intent> {
    match key {
        Key::Space => Some(Intent::TogglePause),
        Key::P => Some(Intent::TogglePredator),
        Key::Equals | Key::Plus | Key::NumpadAdd => Some(Intent::AddFish),
        Key::Minus | Key::NumpadSubtract => Some(Intent::RemoveFish),
        Key::R => Some(Intent::ResetSchool),
        _ => None,
    }
}

// Key pressed event handler
pub fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    // Typing into an egui field should not steer the school
    if model.egui.ctx().wants_keyboard_input() {
        return;
    }
    if let Some(intent) = intent_for_key(key) {
        model.school.apply(intent);
    }
}

// Handle raw window events for egui
pub fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}
