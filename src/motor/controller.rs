// Drive-command interpreter for the two-channel skid-steer base
//
// Maps each directional command to a (duty cycle, direction) pair per channel
// and writes them through the hardware sink. Turning is asymmetric duty on
// same-direction motors; stop clears the direction lines and leaves duty
// alone. Any command may follow any other and every write is unconditional,
// so re-applying a command is idempotent.

use tracing::{info, warn};

use crate::config::{DEFAULT_DUTY, PWM_FREQUENCY_HZ, TURN_DUTY_FAST, TURN_DUTY_SLOW};
use crate::messages::DriveCommand;
use crate::motor::l298n::{MotorHardware, Result};
use crate::motor::state::{Direction, MotorChannel, MotorState};

/// What a command asks of one channel. `duty: None` leaves the channel's
/// duty cycle untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSettings {
    pub duty: Option<u8>,
    pub direction: Direction,
}

/// Resolve a command to its (left, right) channel settings.
pub fn command_settings(cmd: DriveCommand) -> (ChannelSettings, ChannelSettings) {
    use crate::motor::state::Direction::{Forward, Reverse, Stopped};

    let set = |duty, direction| ChannelSettings {
        duty: Some(duty),
        direction,
    };

    match cmd {
        DriveCommand::Stop => {
            let keep_duty = ChannelSettings {
                duty: None,
                direction: Stopped,
            };
            (keep_duty, keep_duty)
        }
        DriveCommand::Forward => (set(DEFAULT_DUTY, Forward), set(DEFAULT_DUTY, Forward)),
        DriveCommand::TurnRight => (set(TURN_DUTY_FAST, Forward), set(TURN_DUTY_SLOW, Forward)),
        DriveCommand::TurnLeft => (set(TURN_DUTY_SLOW, Forward), set(TURN_DUTY_FAST, Forward)),
        DriveCommand::Reverse => (set(DEFAULT_DUTY, Reverse), set(DEFAULT_DUTY, Reverse)),
        DriveCommand::ReverseRight => (set(TURN_DUTY_FAST, Reverse), set(TURN_DUTY_SLOW, Reverse)),
        DriveCommand::ReverseLeft => (set(TURN_DUTY_SLOW, Reverse), set(TURN_DUTY_FAST, Reverse)),
    }
}

/// Owns the hardware sink and the in-memory actuation state. The server
/// wraps it in a mutex; every `apply` is one read-modify-write of state plus
/// hardware under a single lock acquisition.
pub struct MotorController {
    hw: Box<dyn MotorHardware>,
    state: MotorState,
}

impl MotorController {
    pub fn new(hw: Box<dyn MotorHardware>) -> Self {
        Self {
            hw,
            state: MotorState::new(),
        }
    }

    /// Enable PWM on both channels at the fixed carrier frequency with the
    /// default duty cycle, direction lines cleared.
    pub fn initialize(&mut self) -> Result<()> {
        info!(
            "Initializing motor channels: {}% duty, {} Hz PWM",
            DEFAULT_DUTY, PWM_FREQUENCY_HZ
        );
        for ch in MotorChannel::BOTH {
            self.hw.enable_pwm(ch, PWM_FREQUENCY_HZ, DEFAULT_DUTY)?;
            self.hw.set_direction(ch, Direction::Stopped)?;
        }
        Ok(())
    }

    /// Apply a directional command and return the resulting state.
    ///
    /// Writes go out duty cycles first (left, right), then direction lines
    /// (left, right), the sequence the H-bridge wiring expects. The in-memory
    /// state is committed only once all writes have succeeded, so a failed
    /// write leaves the recorded state at its previous value.
    pub fn apply(&mut self, cmd: DriveCommand) -> Result<MotorState> {
        let (left, right) = command_settings(cmd);
        info!("Applying command: {}", cmd);

        let mut next = self.state;
        if let Some(duty) = left.duty {
            self.hw.set_duty_cycle(MotorChannel::Left, duty)?;
            next.channel_mut(MotorChannel::Left).set_duty(duty);
        }
        if let Some(duty) = right.duty {
            self.hw.set_duty_cycle(MotorChannel::Right, duty)?;
            next.channel_mut(MotorChannel::Right).set_duty(duty);
        }
        self.hw.set_direction(MotorChannel::Left, left.direction)?;
        next.channel_mut(MotorChannel::Left)
            .set_direction(left.direction);
        self.hw.set_direction(MotorChannel::Right, right.direction)?;
        next.channel_mut(MotorChannel::Right)
            .set_direction(right.direction);

        self.state = next;
        Ok(next)
    }

    /// Current actuation state.
    pub fn state(&self) -> MotorState {
        self.state
    }

    /// Stop both channels and release their outputs.
    pub fn shutdown(&mut self) -> Result<()> {
        info!("Stopping motors and releasing outputs");
        self.apply(DriveCommand::Stop)?;
        for ch in MotorChannel::BOTH {
            self.hw.release(ch)?;
        }
        Ok(())
    }
}

impl Drop for MotorController {
    fn drop(&mut self) {
        // Safety measure if the graceful shutdown path was skipped
        if let Err(e) = self.shutdown() {
            warn!("Failed to release motors on drop: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motor::l298n::{HardwareError, SimWrite, SimulatedDriver};
    use crate::motor::state::Direction::{Forward, Reverse, Stopped};
    use crate::motor::state::MotorChannel::{Left, Right};

    fn controller() -> (MotorController, SimulatedDriver) {
        let sim = SimulatedDriver::new();
        (MotorController::new(Box::new(sim.clone())), sim)
    }

    fn channels(state: &MotorState) -> [(u8, Direction); 2] {
        [
            (state.left.duty(), state.left.direction()),
            (state.right.duty(), state.right.direction()),
        ]
    }

    #[test]
    fn test_mapping_table() {
        // (command, duty L, duty R, dir L, dir R); stop rows start from the
        // initial 50/50 duty
        let table = [
            (DriveCommand::Stop, 50, 50, Stopped, Stopped),
            (DriveCommand::Forward, 50, 50, Forward, Forward),
            (DriveCommand::TurnRight, 90, 10, Forward, Forward),
            (DriveCommand::TurnLeft, 10, 90, Forward, Forward),
            (DriveCommand::Reverse, 50, 50, Reverse, Reverse),
            (DriveCommand::ReverseRight, 90, 10, Reverse, Reverse),
            (DriveCommand::ReverseLeft, 10, 90, Reverse, Reverse),
        ];
        for (cmd, dc_l, dc_r, dir_l, dir_r) in table {
            let (mut controller, _) = controller();
            let state = controller.apply(cmd).unwrap();
            assert_eq!(
                channels(&state),
                [(dc_l, dir_l), (dc_r, dir_r)],
                "wrong mapping for {cmd}"
            );
        }
    }

    #[test]
    fn test_idempotent_reapply() {
        for cmd in DriveCommand::ALL {
            let (mut controller, _) = controller();
            let first = controller.apply(cmd).unwrap();
            let second = controller.apply(cmd).unwrap();
            assert_eq!(first, second, "{cmd} not idempotent");
        }
    }

    #[test]
    fn test_forward_then_turn_right() {
        let (mut controller, _) = controller();
        controller.apply(DriveCommand::Forward).unwrap();
        let state = controller.apply(DriveCommand::TurnRight).unwrap();
        assert_eq!(channels(&state), [(90, Forward), (10, Forward)]);
    }

    #[test]
    fn test_stop_keeps_turn_duty() {
        let (mut controller, sim) = controller();
        controller.apply(DriveCommand::TurnRight).unwrap();
        let before = sim.log().len();
        let state = controller.apply(DriveCommand::Stop).unwrap();
        // Duty survives the stop; only direction lines are written
        assert_eq!(channels(&state), [(90, Stopped), (10, Stopped)]);
        assert_eq!(
            sim.log()[before..],
            [SimWrite::Dir(Left, Stopped), SimWrite::Dir(Right, Stopped)]
        );
    }

    #[test]
    fn test_stop_duty_not_sticky() {
        let (mut controller, _) = controller();
        controller.apply(DriveCommand::TurnLeft).unwrap();
        controller.apply(DriveCommand::Stop).unwrap();
        let state = controller.apply(DriveCommand::Forward).unwrap();
        assert_eq!(channels(&state), [(50, Forward), (50, Forward)]);
    }

    #[test]
    fn test_reverse_left() {
        let (mut controller, _) = controller();
        let state = controller.apply(DriveCommand::ReverseLeft).unwrap();
        assert_eq!(channels(&state), [(10, Reverse), (90, Reverse)]);
    }

    #[test]
    fn test_write_order_duty_before_direction() {
        let (mut controller, sim) = controller();
        controller.apply(DriveCommand::Forward).unwrap();
        assert_eq!(
            sim.log(),
            [
                SimWrite::Duty(Left, 50),
                SimWrite::Duty(Right, 50),
                SimWrite::Dir(Left, Forward),
                SimWrite::Dir(Right, Forward),
            ]
        );
    }

    #[test]
    fn test_duty_stays_in_range() {
        let (mut controller, _) = controller();
        let sequence = [
            DriveCommand::Forward,
            DriveCommand::TurnRight,
            DriveCommand::Stop,
            DriveCommand::ReverseLeft,
            DriveCommand::Reverse,
            DriveCommand::Stop,
            DriveCommand::TurnLeft,
        ];
        for cmd in sequence {
            let state = controller.apply(cmd).unwrap();
            assert!(state.left.duty() <= 100);
            assert!(state.right.duty() <= 100);
        }
    }

    #[test]
    fn test_initialize_enables_both_channels() {
        let (mut controller, sim) = controller();
        controller.initialize().unwrap();
        assert_eq!(
            sim.log(),
            [
                SimWrite::EnablePwm(Left, 50),
                SimWrite::Dir(Left, Stopped),
                SimWrite::EnablePwm(Right, 50),
                SimWrite::Dir(Right, Stopped),
            ]
        );
    }

    #[test]
    fn test_shutdown_releases_outputs() {
        let (mut controller, sim) = controller();
        controller.apply(DriveCommand::Forward).unwrap();
        controller.shutdown().unwrap();
        let log = sim.log();
        assert_eq!(
            log[log.len() - 4..],
            [
                SimWrite::Dir(Left, Stopped),
                SimWrite::Dir(Right, Stopped),
                SimWrite::Release(Left),
                SimWrite::Release(Right),
            ]
        );
        assert_eq!(controller.state().left.direction(), Stopped);
    }

    /// Fails every write once `remaining` hits zero.
    struct FailingDriver {
        remaining: usize,
    }

    impl FailingDriver {
        fn fail(&mut self) -> Result<()> {
            if self.remaining == 0 {
                return Err(HardwareError::Gpio(rppal::gpio::Error::Io(
                    std::io::Error::other("injected"),
                )));
            }
            self.remaining -= 1;
            Ok(())
        }
    }

    impl MotorHardware for FailingDriver {
        fn enable_pwm(&mut self, _: MotorChannel, _: f64, _: u8) -> Result<()> {
            self.fail()
        }
        fn set_duty_cycle(&mut self, _: MotorChannel, _: u8) -> Result<()> {
            self.fail()
        }
        fn set_direction(&mut self, _: MotorChannel, _: Direction) -> Result<()> {
            self.fail()
        }
        fn release(&mut self, _: MotorChannel) -> Result<()> {
            self.fail()
        }
    }

    #[test]
    fn test_failed_write_leaves_state_unchanged() {
        // First command succeeds in full (4 writes), the second fails on its
        // third write, after both duty cycles went out.
        let mut controller = MotorController::new(Box::new(FailingDriver { remaining: 6 }));
        let before = controller.apply(DriveCommand::Forward).unwrap();
        assert!(controller.apply(DriveCommand::TurnRight).is_err());
        assert_eq!(controller.state(), before);
    }
}
