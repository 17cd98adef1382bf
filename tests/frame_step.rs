//! Drive the frame step without a window, the way the game loop does.

use letterbox::{Canvas, Config, Display, Input, KeyCode, Letterbox, Scene};

/// Default configuration without touching the monitor.
fn setup() -> (Config, Display, Input, Scene, Canvas) {
    let config = Config::default();
    let display = Display::new(&config, Some((1920, 1080)));
    let scene = Scene::new(&config);
    let canvas = Canvas::new(config.render_width, config.render_height);

    (config, display, Input::new(), scene, canvas)
}

#[test]
fn rectangle_wraps_after_leaving_the_surface() {
    let (_config, mut display, input, mut scene, _canvas) = setup();

    let expected = [50.0, 100.0, 150.0, 200.0, 250.0, 300.0, -10.0];
    for x in expected {
        scene.step(&mut display, &input, 1.0);

        assert_eq!(scene.rectangle.x, x);
    }

    // After wrapping it moves again from the reset position
    scene.step(&mut display, &input, 1.0);
    assert_eq!(scene.rectangle.x, 40.0);
}

#[test]
fn fullscreen_hotkeys_toggle_once_per_press() {
    let (_config, mut display, mut input, mut scene, _canvas) = setup();
    assert!(display.fullscreen);

    input.handle_key(KeyCode::F11, true);
    let outcome = scene.step(&mut display, &input, 0.0);
    input.update();
    assert!(outcome.fullscreen_toggled);
    assert!(!display.fullscreen);

    // Holding the key doesn't toggle again
    let outcome = scene.step(&mut display, &input, 0.0);
    input.update();
    assert!(!outcome.fullscreen_toggled);
    assert!(!display.fullscreen);

    input.handle_key(KeyCode::F11, false);
    input.update();

    input.handle_key(KeyCode::AltLeft, true);
    input.handle_key(KeyCode::Enter, true);
    let outcome = scene.step(&mut display, &input, 0.0);
    assert!(outcome.fullscreen_toggled);
    assert!(display.fullscreen);

    // Toggling doesn't move anything
    assert_eq!(scene.rectangle.x, 0.0);
}

#[test]
fn enter_without_alt_does_nothing() {
    let (_config, mut display, mut input, mut scene, _canvas) = setup();

    input.handle_key(KeyCode::Enter, true);
    let outcome = scene.step(&mut display, &input, 0.0);

    assert!(!outcome.fullscreen_toggled);
    assert!(display.fullscreen);
}

#[test]
fn frame_is_drawn_and_letterboxed() {
    let (config, display, _input, scene, mut canvas) = setup();

    scene.draw(&display, 60.0, &mut canvas);

    // Rectangle at its starting position
    assert_eq!(canvas.pixel(0, 20), Some(config.foreground_color));
    assert_eq!(canvas.pixel(9, 29), Some(config.foreground_color));
    assert_eq!(canvas.pixel(10, 20), Some(config.background_color));
    assert_eq!(canvas.pixel(0, 30), Some(config.background_color));

    // FPS readout in the top left corner
    let has_text = (0..16).any(|y| {
        (0..64).any(|x| canvas.pixel(x, y) == Some(config.foreground_color))
    });
    assert!(has_text);

    // 320x180 fits 1920x1080 exactly six times
    let letterbox = Letterbox::fit(canvas.size(), display.screen_size());
    assert_eq!(letterbox.scale, 6.0);
    assert_eq!(letterbox.dest.x, 0.0);
    assert_eq!(letterbox.dest.y, 0.0);
    assert_eq!(letterbox.dest.width, 1920.0);
    assert_eq!(letterbox.dest.height, 1080.0);
}

#[test]
fn fps_readout_can_be_hidden() {
    let config = Config::default().with_show_fps(false);
    let display = Display::new(&config, None);
    let scene = Scene::new(&config);
    let mut canvas = Canvas::new(config.render_width, config.render_height);

    scene.draw(&display, 60.0, &mut canvas);

    // Only the rectangle is drawn
    for y in 0..20 {
        for x in 0..config.render_width as usize {
            assert_eq!(canvas.pixel(x, y), Some(config.background_color));
        }
    }
}
