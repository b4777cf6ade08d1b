// Motor control module for the skid-steer car base
//
// Provides:
// - The actuation state model (per-channel duty cycle and direction)
// - The drive-command interpreter (directional command -> channel settings)
// - The L298N GPIO/PWM output sink, plus a simulated sink for tests and
//   off-hardware runs

mod controller;
pub mod l298n;
pub mod state;

pub use controller::{ChannelSettings, MotorController, command_settings};
pub use l298n::{HardwareError, L298nDriver, MotorHardware, SimulatedDriver};
pub use state::{ChannelState, Direction, MotorChannel, MotorState};
