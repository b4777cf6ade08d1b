// L298N dual H-bridge output sink over Raspberry Pi GPIO
//
// ENA/ENB carry a software-PWM enable signal per channel; IN1/IN2 and IN3/IN4
// are the direction line pairs. Exactly one line of a pair is high while
// driving; both low means stopped.

use rppal::gpio::{Gpio, OutputPin};
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::config::{PIN_ENA, PIN_ENB, PIN_IN1, PIN_IN2, PIN_IN3, PIN_IN4, PWM_FREQUENCY_HZ};
use crate::motor::state::{Direction, MotorChannel};

/// Error types for hardware writes
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    #[error("gpio error: {0}")]
    Gpio(#[from] rppal::gpio::Error),
}

pub type Result<T> = std::result::Result<T, HardwareError>;

/// Output sink the command interpreter writes through. All calls are
/// synchronous and assumed idempotent at the register level.
pub trait MotorHardware: Send {
    /// Start PWM on a channel's enable line at the given carrier frequency.
    fn enable_pwm(&mut self, channel: MotorChannel, freq_hz: f64, percent: u8) -> Result<()>;

    /// Change the PWM duty cycle of a channel's enable line.
    fn set_duty_cycle(&mut self, channel: MotorChannel, percent: u8) -> Result<()>;

    /// Drive a channel's direction line pair.
    fn set_direction(&mut self, channel: MotorChannel, direction: Direction) -> Result<()>;

    /// Release a channel: PWM off, direction lines low.
    fn release(&mut self, channel: MotorChannel) -> Result<()>;
}

struct ChannelPins {
    enable: OutputPin,
    forward: OutputPin,
    reverse: OutputPin,
}

/// Real GPIO-backed driver for the L298N board.
pub struct L298nDriver {
    left: ChannelPins,
    right: ChannelPins,
    freq_hz: f64,
}

impl L298nDriver {
    /// Claim the six BCM pins from `config` and pull everything into the
    /// stopped state. Fails off a Raspberry Pi or without GPIO permissions.
    pub fn open() -> Result<Self> {
        let gpio = Gpio::new()?;
        Ok(Self {
            left: ChannelPins {
                enable: gpio.get(PIN_ENA)?.into_output_high(),
                forward: gpio.get(PIN_IN1)?.into_output_low(),
                reverse: gpio.get(PIN_IN2)?.into_output_low(),
            },
            // The right H-bridge half is wired mirrored: IN4 is the forward
            // line, IN3 the reverse line.
            right: ChannelPins {
                enable: gpio.get(PIN_ENB)?.into_output_high(),
                forward: gpio.get(PIN_IN4)?.into_output_low(),
                reverse: gpio.get(PIN_IN3)?.into_output_low(),
            },
            freq_hz: PWM_FREQUENCY_HZ,
        })
    }

    fn pins_mut(&mut self, channel: MotorChannel) -> &mut ChannelPins {
        match channel {
            MotorChannel::Left => &mut self.left,
            MotorChannel::Right => &mut self.right,
        }
    }
}

impl MotorHardware for L298nDriver {
    fn enable_pwm(&mut self, channel: MotorChannel, freq_hz: f64, percent: u8) -> Result<()> {
        self.freq_hz = freq_hz;
        debug!(
            "Enable PWM on {:?} channel: {} Hz at {}%",
            channel, freq_hz, percent
        );
        let pins = self.pins_mut(channel);
        pins.enable
            .set_pwm_frequency(freq_hz, f64::from(percent.min(100)) / 100.0)?;
        Ok(())
    }

    fn set_duty_cycle(&mut self, channel: MotorChannel, percent: u8) -> Result<()> {
        let freq_hz = self.freq_hz;
        debug!("Duty cycle on {:?} channel: {}%", channel, percent);
        let pins = self.pins_mut(channel);
        pins.enable
            .set_pwm_frequency(freq_hz, f64::from(percent.min(100)) / 100.0)?;
        Ok(())
    }

    fn set_direction(&mut self, channel: MotorChannel, direction: Direction) -> Result<()> {
        debug!("Direction on {:?} channel: {:?}", channel, direction);
        let pins = self.pins_mut(channel);
        // Drop the opposing line before raising the active one so the pair
        // never passes through forward+reverse.
        match direction {
            Direction::Forward => {
                pins.reverse.set_low();
                pins.forward.set_high();
            }
            Direction::Reverse => {
                pins.forward.set_low();
                pins.reverse.set_high();
            }
            Direction::Stopped => {
                pins.forward.set_low();
                pins.reverse.set_low();
            }
        }
        Ok(())
    }

    fn release(&mut self, channel: MotorChannel) -> Result<()> {
        debug!("Releasing {:?} channel", channel);
        let pins = self.pins_mut(channel);
        pins.enable.clear_pwm()?;
        pins.forward.set_low();
        pins.reverse.set_low();
        Ok(())
    }
}

/// A single recorded hardware write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimWrite {
    EnablePwm(MotorChannel, u8),
    Duty(MotorChannel, u8),
    Dir(MotorChannel, Direction),
    Release(MotorChannel),
}

/// Records writes instead of touching GPIO. Selected with `--sim` and used by
/// the interpreter tests; the log handle stays valid after the driver is
/// handed to the controller.
#[derive(Debug, Clone, Default)]
pub struct SimulatedDriver {
    log: Arc<Mutex<Vec<SimWrite>>>,
}

impl SimulatedDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every write so far, in order.
    pub fn log(&self) -> Vec<SimWrite> {
        self.log.lock().unwrap().clone()
    }

    fn record(&self, write: SimWrite) {
        debug!("Simulated write: {:?}", write);
        self.log.lock().unwrap().push(write);
    }
}

impl MotorHardware for SimulatedDriver {
    fn enable_pwm(&mut self, channel: MotorChannel, _freq_hz: f64, percent: u8) -> Result<()> {
        self.record(SimWrite::EnablePwm(channel, percent));
        Ok(())
    }

    fn set_duty_cycle(&mut self, channel: MotorChannel, percent: u8) -> Result<()> {
        self.record(SimWrite::Duty(channel, percent));
        Ok(())
    }

    fn set_direction(&mut self, channel: MotorChannel, direction: Direction) -> Result<()> {
        self.record(SimWrite::Dir(channel, direction));
        Ok(())
    }

    fn release(&mut self, channel: MotorChannel) -> Result<()> {
        self.record(SimWrite::Release(channel));
        Ok(())
    }
}
