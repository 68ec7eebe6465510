//! VOID ENGINE desktop simulator
//!
//! Runs the engine in a window at an integer multiple of the panel size.
//!
//! Keys: arrows = d-pad, Z = A, X = B, Tab = next render mode, Esc = quit.
//! Pass a RON config path as the first argument to override the defaults.
//! Log level comes from `RUST_LOG` (default `void_engine=info`).

use std::path::PathBuf;

use macroquad::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use void_engine::input::InputPublisher;
use void_engine::rasterizer::{Fix16, Framebuffer, HEIGHT, WIDTH};
use void_engine::{create_scene, Buttons, Display, DisplayError, Engine, EngineConfig, SharedInput, VERSION};

/// Initial window scale over the panel resolution
const WINDOW_SCALE: i32 = 4;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("VOID ENGINE v{}", VERSION),
        window_width: WIDTH as i32 * WINDOW_SCALE,
        window_height: HEIGHT as i32 * WINDOW_SCALE,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

/// Presents frames as a nearest-filtered texture scaled to the window
struct WindowDisplay {
    texture: Texture2D,
    width: usize,
    height: usize,
}

impl WindowDisplay {
    fn new(width: usize, height: usize) -> Self {
        let texture = Texture2D::from_rgba8(width as u16, height as u16, &vec![0; width * height * 4]);
        texture.set_filter(FilterMode::Nearest);
        Self { texture, width, height }
    }
}

impl Display for WindowDisplay {
    fn present(&mut self, fb: &Framebuffer) -> Result<(), DisplayError> {
        if (fb.width, fb.height) != (self.width, self.height) {
            return Err(DisplayError::SizeMismatch {
                expected: (self.width, self.height),
                actual: (fb.width, fb.height),
            });
        }

        self.texture.update(&Image {
            bytes: fb.to_rgba8(),
            width: fb.width as u16,
            height: fb.height as u16,
        });

        // Largest whole-number scale that fits, centered
        let scale = (screen_width() / fb.width as f32)
            .min(screen_height() / fb.height as f32)
            .floor()
            .max(1.0);
        let (draw_w, draw_h) = (fb.width as f32 * scale, fb.height as f32 * scale);
        let draw_x = ((screen_width() - draw_w) * 0.5).floor();
        let draw_y = ((screen_height() - draw_h) * 0.5).floor();

        clear_background(Color::from_rgba(10, 10, 12, 255));
        draw_texture_ex(
            &self.texture,
            draw_x,
            draw_y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(draw_w, draw_h)),
                ..Default::default()
            },
        );
        Ok(())
    }
}

/// Keyboard state as a button snapshot
fn poll_keyboard() -> Buttons {
    let mut buttons = Buttons::empty();
    let map = [
        (KeyCode::Up, Buttons::UP),
        (KeyCode::Down, Buttons::DOWN),
        (KeyCode::Left, Buttons::LEFT),
        (KeyCode::Right, Buttons::RIGHT),
        (KeyCode::Z, Buttons::A),
        (KeyCode::X, Buttons::B),
    ];
    for (key, button) in map {
        if is_key_down(key) {
            buttons |= button;
        }
    }
    buttons
}

fn load_config() -> Option<EngineConfig> {
    let Some(path) = std::env::args().nth(1).map(PathBuf::from) else {
        return Some(EngineConfig::default());
    };
    match EngineConfig::load(&path) {
        Ok(config) => {
            info!(path = %path.display(), "loaded config");
            Some(config)
        }
        Err(e) => {
            error!(path = %path.display(), "failed to load config: {}", e);
            None
        }
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("void_engine=info")),
        )
        .init();

    let Some(config) = load_config() else {
        return;
    };

    // The keyboard poller publishes, the engine reads
    let input = SharedInput::new();
    let publisher: InputPublisher = input.publisher();

    let display = WindowDisplay::new(config.width, config.height);
    let scene = create_scene(config.scene);
    let max_dt = config.max_dt;

    let mut engine = match Engine::init(config, scene, display, input) {
        Ok(engine) => engine,
        Err(e) => {
            error!("failed to start engine: {}", e);
            return;
        }
    };

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        if is_key_pressed(KeyCode::Tab) {
            engine.set_mode(engine.mode().next());
        }

        publisher.publish(poll_keyboard());

        let dt = get_frame_time().min(max_dt);
        engine.update(Fix16::from_f32(dt));
        engine.draw();
        engine.present();

        draw_text(
            &format!("{}  {}  {} fps", engine.scene_name(), engine.mode().label(), get_fps()),
            8.0,
            20.0,
            18.0,
            Color::from_rgba(120, 120, 130, 255),
        );

        next_frame().await;
    }

    info!(
        frames = engine.frames_drawn(),
        dropped = engine.dropped_frames(),
        "simulator closed"
    );
}
