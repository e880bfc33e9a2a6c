mod game;

use anyhow::Result;

use maingine_engine::surface::HeadlessSurface;
use maingine_engine::window::WindowSettings;
use maingine_engine::{EngineSettings, Maingine};

use game::Game;

/// Frames presented before a `--headless` run closes itself.
const HEADLESS_FRAMES: u64 = 180;

fn main() -> Result<()> {
    let headless = std::env::args().skip(1).any(|arg| arg == "--headless");
    let debug = std::env::args().skip(1).any(|arg| arg == "--debug");

    let settings = EngineSettings::new()
        .tick_rate(120.0)
        .frame_rate(60.0)
        .sleep_when_idle(true)
        .debug(debug);

    let window = WindowSettings::new()
        .title("Maingine example")
        .size(720, 480)
        .resizable(false)
        .visible(true)
        .clear_color(wgpu::Color { r: 0.05, g: 0.07, b: 0.12, a: 1.0 });

    let mut engine = Maingine::new(settings, window)?;

    let game = Game::new(engine.handle());
    engine.add_mode("game", game);
    engine.set_main_mode("game");

    if headless {
        engine.init_with(HeadlessSurface::new().close_after_frames(HEADLESS_FRAMES))?;
    } else {
        engine.init()?;
    }

    engine.run()?;
    Ok(())
}
