// Actuation state model for the two-channel skid-steer base

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_DUTY;

/// The two motor channels of the base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorChannel {
    Left,
    Right,
}

impl MotorChannel {
    pub const BOTH: [MotorChannel; 2] = [MotorChannel::Left, MotorChannel::Right];
}

/// Direction-line setting for one channel. Forward and reverse drive opposite
/// lines of an H-bridge pair; stopped pulls both low. The encoding makes the
/// forward+reverse combination unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Reverse,
    Stopped,
}

/// Duty cycle and direction of one channel. Duty is kept in 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelState {
    duty: u8,
    direction: Direction,
}

impl ChannelState {
    pub fn duty(&self) -> u8 {
        self.duty
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_duty(&mut self, percent: u8) {
        self.duty = percent.min(100);
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }
}

impl Default for ChannelState {
    fn default() -> Self {
        Self {
            duty: DEFAULT_DUTY,
            direction: Direction::Stopped,
        }
    }
}

/// The car's actuation state: one `ChannelState` per side. Created once at
/// startup and mutated in place by each applied command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotorState {
    pub left: ChannelState,
    pub right: ChannelState,
}

impl MotorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn channel(&self, channel: MotorChannel) -> &ChannelState {
        match channel {
            MotorChannel::Left => &self.left,
            MotorChannel::Right => &self.right,
        }
    }

    pub fn channel_mut(&mut self, channel: MotorChannel) -> &mut ChannelState {
        match channel {
            MotorChannel::Left => &mut self.left,
            MotorChannel::Right => &mut self.right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_safe() {
        let state = MotorState::new();
        for ch in MotorChannel::BOTH {
            assert_eq!(state.channel(ch).duty(), DEFAULT_DUTY);
            assert_eq!(state.channel(ch).direction(), Direction::Stopped);
        }
    }

    #[test]
    fn test_duty_clamped_to_100() {
        let mut state = MotorState::new();
        state.channel_mut(MotorChannel::Left).set_duty(250);
        assert_eq!(state.left.duty(), 100);
        state.channel_mut(MotorChannel::Left).set_duty(0);
        assert_eq!(state.left.duty(), 0);
    }
}
