// Pin assignments, PWM settings, server defaults

// BCM pin numbers for the L298N dual H-bridge.
// ENA/ENB are the PWM enable lines, IN1..IN4 the direction line pairs.
pub const PIN_ENA: u8 = 22;
pub const PIN_IN1: u8 = 27;
pub const PIN_IN2: u8 = 17;
pub const PIN_ENB: u8 = 18;
pub const PIN_IN3: u8 = 23;
pub const PIN_IN4: u8 = 24;

// PWM carrier frequency on the enable lines
pub const PWM_FREQUENCY_HZ: f64 = 200.0;

// Duty cycle both channels start at and drive straight with
pub const DEFAULT_DUTY: u8 = 50;

// Duty cycle split across the two channels during a skid-steer turn
pub const TURN_DUTY_FAST: u8 = 90;
pub const TURN_DUTY_SLOW: u8 = 10;

// HTTP surface defaults
pub const DEFAULT_LISTEN: &str = "0.0.0.0:5000";

// Frame rate for the replay camera unless overridden on the command line
pub const DEFAULT_FPS: u32 = 15;
