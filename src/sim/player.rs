//! Player pose and health
//!
//! Movement and camera are external; they report the pose every tick.

use glam::Vec3;

use super::health::HealthLedger;
use crate::settings::PlayerSettings;

#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec3,
    /// Facing direction (unit length)
    pub forward: Vec3,
    /// Reported by the movement controller, informational only
    pub grounded: bool,
    pub health: HealthLedger,
}

impl Player {
    pub fn new(settings: &PlayerSettings) -> Self {
        Self {
            position: settings.spawn_position,
            forward: settings.spawn_forward.try_normalize().unwrap_or(Vec3::Z),
            grounded: true,
            health: HealthLedger::new(settings.starting_health),
        }
    }

    /// Apply a pose from the movement controller. A zero forward keeps the old one.
    pub fn set_pose(&mut self, position: Vec3, forward: Vec3, grounded: bool) {
        self.position = position;
        if let Some(forward) = forward.try_normalize() {
            self.forward = forward;
        }
        self.grounded = grounded;
    }

    pub fn is_alive(&self) -> bool {
        self.health.is_alive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_is_full_and_normalized() {
        let settings = PlayerSettings {
            spawn_forward: Vec3::new(0.0, 0.0, 4.0),
            ..Default::default()
        };
        let player = Player::new(&settings);
        assert_eq!(player.health.current(), settings.starting_health);
        assert_eq!(player.forward, Vec3::Z);
    }

    #[test]
    fn test_zero_forward_is_ignored() {
        let mut player = Player::new(&PlayerSettings::default());
        player.set_pose(Vec3::new(1.0, 1.0, 1.0), Vec3::ZERO, false);
        assert_eq!(player.forward, Vec3::Z);
        assert_eq!(player.position, Vec3::new(1.0, 1.0, 1.0));
        assert!(!player.grounded);
    }
}
