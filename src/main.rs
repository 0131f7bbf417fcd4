use flight_instruments::{Panel, PanelCommand, PanelConfig};
use rand::Rng;
use std::env;
use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

// Reads flight data from stdin, one line per sample:
//   <pitch> <roll> <heading> <drift> <speed>
// With --simulate, a background thread produces a smooth random flight
// instead. --font supplies dial text; without it the dials render unlabeled.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut window_title = "Flight Instruments".to_string();
    let mut font_path: Option<String> = None;
    let mut simulate = false;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--title" => {
                if let Some(title) = args.next() {
                    window_title = title;
                }
            }
            "--font" => {
                font_path = args.next();
            }
            "--simulate" => {
                simulate = true;
            }
            other => {
                eprintln!("unknown argument: {other}");
                eprintln!("usage: flight-instruments [--title TITLE] [--font PATH] [--simulate]");
                std::process::exit(2);
            }
        }
    }

    let font_data = match font_path {
        Some(path) => Some(std::fs::read(path)?),
        None => None,
    };

    let config = PanelConfig::builder()
        .title(window_title)
        .maybe_font_data(font_data)
        .build();

    let (sender, receiver) = mpsc::channel();

    if simulate {
        thread::spawn(move || {
            let mut rng = rand::rng();
            let mut pitch: f64 = 0.0;
            let mut roll: f64 = 0.0;
            let mut heading: f64 = 90.0;
            let mut drift: f64 = 0.0;
            let mut speed: f64 = 120.0;
            loop {
                pitch = (pitch + rng.random_range(-0.8..0.8)).clamp(-25.0, 25.0);
                roll = (roll + rng.random_range(-1.5..1.5)).clamp(-45.0, 45.0);
                heading = (heading + rng.random_range(-1.0..2.0)).rem_euclid(360.0);
                drift = (drift + rng.random_range(-0.5..0.5)).clamp(-30.0, 30.0);
                speed = (speed + rng.random_range(-2.0..2.0)).clamp(0.0, 240.0);
                let command = PanelCommand::SetAll {
                    pitch,
                    roll,
                    heading,
                    drift,
                    speed,
                };
                if sender.send(command).is_err() {
                    break;
                }
                thread::sleep(Duration::from_millis(50));
            }
        });
    } else {
        thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines().map_while(Result::ok) {
                let fields: Vec<f64> = line
                    .split_whitespace()
                    .filter_map(|field| field.parse().ok())
                    .collect();
                if let [pitch, roll, heading, drift, speed] = fields[..] {
                    let command = PanelCommand::SetAll {
                        pitch,
                        roll,
                        heading,
                        drift,
                        speed,
                    };
                    if sender.send(command).is_err() {
                        break;
                    }
                } else {
                    eprintln!("expected 5 numbers per line, got: {line}");
                }
            }
        });
    }

    Panel::new(config)?.show_with_commands(receiver)
}
