/*
 * Debug Information Module
 *
 * This module defines the DebugInfo struct that contains frame timing and a
 * few simulation readouts to be displayed in the UI and the debug overlay.
 */

use std::time::Duration;

use crate::school::School;

// Debug information to display
#[derive(Clone, Debug, Default)]
pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    pub fish_count: usize,
    pub follower_count: usize,
    pub leader_depth: Option<u32>,
    pub ticks: u64,
    pub predator_active: bool,
}

impl DebugInfo {
    /// Refresh the simulation readouts after a tick.
    pub fn observe(&mut self, school: &School) {
        self.fish_count = school.fish().len();
        self.follower_count = school.follower_count();
        self.leader_depth = school.leader_depth();
        self.ticks = school.tick_count();
        self.predator_active = school.has_predator();
    }

    pub fn lines(&self) -> Vec<String> {
        let depth = match self.leader_depth {
            Some(depth) => format!("{} m", depth),
            None => "-".to_string(),
        };
        vec![
            format!("FPS: {:.1}", self.fps),
            format!("Frame time: {:.2} ms", self.frame_time.as_secs_f64() * 1000.0),
            format!("Fish: {} ({} following)", self.fish_count, self.follower_count),
            format!("Leader depth: {}", depth),
            format!("Predator: {}", if self.predator_active { "hunting" } else { "none" }),
            format!("Tick: {}", self.ticks),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::SimulationParams;

    #[test]
    fn observe_reads_the_school() {
        let school = School::new(SimulationParams {
            seed: Some(3),
            ..SimulationParams::default()
        })
        .unwrap();
        let mut info = DebugInfo::default();
        info.observe(&school);

        assert_eq!(info.fish_count, 36);
        assert_eq!(info.follower_count, 35);
        assert_eq!(info.leader_depth, Some(15));
        assert!(!info.predator_active);
        assert_eq!(info.lines().len(), 6);
        assert_eq!(info.lines()[3], "Leader depth: 15 m");
    }
}
