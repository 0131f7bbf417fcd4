// End-to-end flow through the public API: build instruments, feed them
// readings, apply the resulting commands to retained scenes, and rasterize
// into an offscreen framebuffer. No window is opened.

use flight_instruments::{
    render_scene, Canvas, Instrument, InstrumentConfig, InstrumentKind, Reading, Scene, Viewport,
    ZoneTag,
};

fn framebuffer(width: usize, height: usize) -> Vec<u8> {
    vec![0u8; width * height * 4]
}

#[test]
fn full_panel_update_and_rasterize() {
    let kinds = [
        InstrumentKind::Attitude,
        InstrumentKind::Heading,
        InstrumentKind::Drift,
        InstrumentKind::Speed,
    ];
    let readings = [
        Reading::Attitude {
            pitch: 5.0,
            roll: -15.0,
        },
        Reading::Heading(237.0),
        Reading::Drift(-12.0),
        Reading::Speed(173.5),
    ];

    let mut frame = framebuffer(200, 200);
    for (kind, reading) in kinds.into_iter().zip(readings) {
        let mut instrument = Instrument::new(kind, InstrumentConfig::default()).unwrap();
        let mut scene = Scene::new(instrument.scene_template());
        let command = instrument.update(reading).unwrap();
        scene.apply(&command);

        let viewport = Viewport::fit(0.0, 0.0, 200.0, 200.0, instrument.dial_radius());
        let mut canvas = Canvas::new(&mut frame, 200, 200);
        render_scene(&mut canvas, &scene, &viewport, None);
    }
    // Something was drawn.
    assert!(frame.iter().any(|&byte| byte != 0));
}

#[test]
fn speed_reading_drives_zone_and_readout() {
    let mut speed = Instrument::new(InstrumentKind::Speed, InstrumentConfig::default()).unwrap();

    speed.update(Reading::Speed(173.5)).unwrap();
    assert_eq!(speed.current_zone(), ZoneTag::Caution);
    assert_eq!(speed.display_string(), Some("Speed: 173.5 km/h"));

    speed.update(Reading::Speed(42.0)).unwrap();
    assert_eq!(speed.current_zone(), ZoneTag::Neutral);
    assert_eq!(speed.display_string(), Some("Speed: 42.0 km/h"));
}

#[test]
fn heading_readout_wraps_and_pads() {
    let mut heading = Instrument::new(InstrumentKind::Heading, InstrumentConfig::default()).unwrap();
    for (input, expected) in [(237.0, "237°"), (5.0, "005°"), (365.0, "005°")] {
        heading.update(Reading::Heading(input)).unwrap();
        assert_eq!(heading.display_string(), Some(expected));
    }
}

#[test]
fn repeated_identical_readings_are_stable() {
    let mut drift = Instrument::new(InstrumentKind::Drift, InstrumentConfig::default()).unwrap();
    let first = drift.update(Reading::Drift(8.0)).unwrap();
    let second = drift.update(Reading::Drift(8.0)).unwrap();
    assert_eq!(first, second);

    let mut scene = Scene::new(drift.scene_template());
    scene.apply(&first);
    let after_once: Vec<_> = scene.drawables().to_vec();
    scene.apply(&second);
    assert_eq!(scene.drawables(), &after_once[..]);
}
