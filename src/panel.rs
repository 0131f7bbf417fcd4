// ============================================================================
// PANEL WINDOW
// ============================================================================
//
// Hosts the four instruments in one window: attitude top-left, heading
// top-right, speed bottom-left, drift bottom-right. The panel owns the only
// stateful resource (the framebuffer); the engine side only ever hands it
// RenderCommands. Readings arrive over an mpsc channel and are eased toward
// their targets each frame.

use pixels::{Pixels, SurfaceTexture};
use rusttype::Font;
use std::sync::mpsc::Receiver;
use std::time::Instant;
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::config::{InstrumentConfig, PanelConfig};
use crate::error::ConfigError;
use crate::instrument::{Instrument, InstrumentKind, Reading};
use crate::render::{render_scene, Canvas, Viewport};
use crate::scene::Scene;

/// Reading updates accepted over the panel's command channel.
#[derive(Debug, Clone)]
pub enum PanelCommand {
    SetAttitude { pitch: f64, roll: f64 },
    SetHeading(f64),
    SetDrift(f64),
    SetSpeed(f64),
    SetAll {
        pitch: f64,
        roll: f64,
        heading: f64,
        drift: f64,
        speed: f64,
    },
}

#[derive(Debug, Clone, Copy, Default)]
struct FlightReadings {
    pitch: f64,
    roll: f64,
    heading: f64,
    drift: f64,
    speed: f64,
}

impl FlightReadings {
    fn approach(&mut self, target: &FlightReadings, factor: f64) {
        let factor = factor.clamp(0.0, 1.0);
        for (current, target) in [
            (&mut self.pitch, target.pitch),
            (&mut self.roll, target.roll),
            (&mut self.heading, target.heading),
            (&mut self.drift, target.drift),
            (&mut self.speed, target.speed),
        ] {
            *current += (target - *current) * factor;
        }
    }
}

/// One instrument plus its retained scene.
struct Station {
    instrument: Instrument,
    scene: Scene,
}

impl Station {
    fn new(kind: InstrumentKind) -> Result<Self, ConfigError> {
        let instrument = Instrument::new(kind, InstrumentConfig::default())?;
        let scene = Scene::new(instrument.scene_template());
        Ok(Self { instrument, scene })
    }

    fn refresh(&mut self, reading: Reading) {
        match self.instrument.update(reading) {
            Ok(command) => self.scene.apply(&command),
            // Recoverable: keep the last valid state and skip the frame.
            Err(err) => eprintln!("{} instrument: {err}", self.instrument.kind()),
        }
    }
}

pub struct Panel {
    config: PanelConfig,
    attitude: Station,
    heading: Station,
    drift: Station,
    speed: Station,
    target: FlightReadings,
}

impl Panel {
    pub fn new(config: PanelConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            config,
            attitude: Station::new(InstrumentKind::Attitude)?,
            heading: Station::new(InstrumentKind::Heading)?,
            drift: Station::new(InstrumentKind::Drift)?,
            speed: Station::new(InstrumentKind::Speed)?,
            target: FlightReadings::default(),
        })
    }

    /// Opens the window with static readings.
    pub fn show(self) -> Result<(), Box<dyn std::error::Error>> {
        self.run_window(None)
    }

    /// Opens the window and feeds it readings from the channel.
    pub fn show_with_commands(
        self,
        receiver: Receiver<PanelCommand>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.run_window(Some(receiver))
    }

    fn accept(&mut self, command: PanelCommand) {
        let finite = |values: &[f64]| values.iter().all(|v| v.is_finite());
        match command {
            PanelCommand::SetAttitude { pitch, roll } if finite(&[pitch, roll]) => {
                self.target.pitch = pitch;
                self.target.roll = roll;
            }
            PanelCommand::SetHeading(heading) if finite(&[heading]) => {
                self.target.heading = heading;
            }
            PanelCommand::SetDrift(drift) if finite(&[drift]) => {
                self.target.drift = drift;
            }
            PanelCommand::SetSpeed(speed) if finite(&[speed]) => {
                self.target.speed = speed;
            }
            PanelCommand::SetAll {
                pitch,
                roll,
                heading,
                drift,
                speed,
            } if finite(&[pitch, roll, heading, drift, speed]) => {
                self.target = FlightReadings {
                    pitch,
                    roll,
                    heading,
                    drift,
                    speed,
                };
            }
            other => eprintln!("dropping non-finite panel command: {other:?}"),
        }
    }

    fn run_window(
        mut self,
        receiver: Option<Receiver<PanelCommand>>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let font = match self.config.font_data.take() {
            Some(data) => {
                Some(Font::try_from_vec(data).ok_or("font data is not a valid TTF/OTF")?)
            }
            None => None,
        };

        let logical_width = self.config.window_width;
        let logical_height = self.config.window_height;

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(
                logical_width as f64,
                logical_height as f64,
            ))
            .with_resizable(false)
            .build(&event_loop)?;
        let window = std::sync::Arc::new(window);
        let window_clone = window.clone();

        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

        let frame_duration = std::time::Duration::from_secs_f64(1.0 / self.config.max_framerate);
        let mut last_frame = Instant::now();
        let mut current = self.target;

        event_loop.run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::Poll);
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        fb_width = new_size.width as usize;
                        fb_height = new_size.height as usize;
                        let _ = pixels.resize_buffer(new_size.width, new_size.height);
                        let _ = pixels.resize_surface(new_size.width, new_size.height);
                    }
                    WindowEvent::RedrawRequested => {
                        if let Some(ref receiver) = receiver {
                            while let Ok(command) = receiver.try_recv() {
                                self.accept(command);
                            }
                        }
                        current.approach(&self.target, self.config.smoothing);

                        self.attitude.refresh(Reading::Attitude {
                            pitch: current.pitch,
                            roll: current.roll,
                        });
                        self.heading.refresh(Reading::Heading(current.heading));
                        self.drift.refresh(Reading::Drift(current.drift));
                        self.speed.refresh(Reading::Speed(current.speed));

                        let mut canvas = Canvas::new(pixels.frame_mut(), fb_width, fb_height);
                        canvas.clear(self.config.background_color);

                        let half_w = fb_width as f64 / 2.0;
                        let half_h = fb_height as f64 / 2.0;
                        let stations = [
                            (&self.attitude, 0.0, 0.0),
                            (&self.heading, half_w, 0.0),
                            (&self.speed, 0.0, half_h),
                            (&self.drift, half_w, half_h),
                        ];
                        for (station, left, top) in stations {
                            let viewport = Viewport::fit(
                                left,
                                top,
                                half_w,
                                half_h,
                                station.instrument.dial_radius(),
                            );
                            render_scene(&mut canvas, &station.scene, &viewport, font.as_ref());
                        }
                        let _ = pixels.render();
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if last_frame.elapsed() >= frame_duration {
                        window_clone.request_redraw();
                        last_frame = Instant::now();
                    }
                }
                _ => {}
            }
        })?;

        Ok(())
    }
}
