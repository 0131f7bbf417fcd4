use flight_instruments::{Panel, PanelCommand, PanelConfig};
use rand::Rng;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configure the panel with the bon-generated builder
    let config = PanelConfig::builder()
        .title("Flight Instruments Demo".to_string())
        .window_width(800)
        .window_height(800)
        .smoothing(0.15)
        .build();

    let panel = Panel::new(config)?;

    // Create a channel for streaming flight data
    let (sender, receiver) = mpsc::channel();

    // Spawn a thread that flies a gentle random walk
    thread::spawn(move || {
        let mut rng = rand::rng();
        let mut pitch: f64 = 0.0;
        let mut roll: f64 = 0.0;
        let mut heading: f64 = 45.0;
        let mut speed: f64 = 100.0;
        loop {
            pitch = (pitch + rng.random_range(-1.0..1.0)).clamp(-20.0, 20.0);
            roll = (roll + rng.random_range(-2.0..2.0)).clamp(-40.0, 40.0);
            heading = (heading + rng.random_range(-0.5..1.5)).rem_euclid(360.0);
            speed = (speed + rng.random_range(-3.0..3.0)).clamp(40.0, 220.0);
            let commands = [
                PanelCommand::SetAttitude { pitch, roll },
                PanelCommand::SetHeading(heading),
                PanelCommand::SetDrift(roll * 0.3),
                PanelCommand::SetSpeed(speed),
            ];
            if commands.iter().any(|cmd| sender.send(cmd.clone()).is_err()) {
                break;
            }
            thread::sleep(Duration::from_millis(100));
        }
    });

    println!("Displaying the four-instrument panel with a simulated flight:");
    println!("- Attitude: pitch and roll wander within gentle limits");
    println!("- Heading: slow right-hand turn");
    println!("- Drift: follows a fraction of the bank angle");
    println!("- Speed: random walk through the advisory zones");
    println!("Press Ctrl+C to exit");

    panel.show_with_commands(receiver)
}
