// Motor check: step through each drive command on real hardware
//
// Usage: cargo run --bin motor_check
//
// Safety features:
// - Explicit confirmation before any output is driven
// - Every command is followed by a stop
// - Outputs are released on exit (and on drop if aborted mid-run)

use std::io::{self, Write};
use std::thread::sleep;
use std::time::Duration;

use picar_runtime::messages::DriveCommand;
use picar_runtime::motor::{L298nDriver, MotorController};

fn confirm(prompt: &str) -> bool {
    print!("{} [y/N]: ", prompt);
    io::stdout().flush().unwrap();
    let mut input = String::new();
    io::stdin().read_line(&mut input).unwrap();
    input.trim().eq_ignore_ascii_case("y")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("info".parse().unwrap()),
        )
        .init();

    println!("picar motor check (WITH OUTPUT WRITES)");
    println!("This tool WILL drive the motors. Put the car on a stand so the");
    println!("wheels are off the ground before proceeding.");
    println!();

    if !confirm("Wheels off the ground and motor power connected?") {
        println!("Aborted.");
        return Ok(());
    }

    let mut controller = MotorController::new(Box::new(L298nDriver::open()?));
    controller.initialize()?;

    for cmd in DriveCommand::ALL {
        if cmd == DriveCommand::Stop {
            continue;
        }
        if !confirm(&format!("Apply '{}' for 2 seconds?", cmd)) {
            break;
        }
        let state = controller.apply(cmd)?;
        println!(
            "  left: {}% {:?} | right: {}% {:?}",
            state.left.duty(),
            state.left.direction(),
            state.right.duty(),
            state.right.direction()
        );
        sleep(Duration::from_secs(2));
        controller.apply(DriveCommand::Stop)?;
    }

    controller.shutdown()?;
    println!("Done.");
    Ok(())
}
