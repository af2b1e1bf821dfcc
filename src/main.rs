//! Serpent Swarm headless runner
//!
//! Plays a scripted run with a kiting player and auto-picked upgrades, then
//! prints the final HUD snapshot as JSON.
//!
//! Usage: `serpent-swarm [settings.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::io::Result<()> {
    use glam::Vec2;
    use serpent_swarm::Settings;
    use serpent_swarm::consts::SIM_DT;
    use serpent_swarm::renderer::{MeshSurface, draw_frame};
    use serpent_swarm::sim::{Engine, GameMode, TickInput};

    // Two minutes of play at 60 Hz
    const MAX_TICKS: u32 = 60 * 120;
    // Mesh a frame every second to keep the draw path honest
    const DRAW_EVERY: u32 = 60;

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let settings_json = match args.get(1) {
        Some(path) => Some(std::fs::read_to_string(path)?),
        None => None,
    };
    let settings = Settings::load_or_default(settings_json.as_deref());
    let seed = args
        .get(2)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(rand::random);
    log::info!("Serpent Swarm (native) starting with seed {}", seed);

    let mut engine = Engine::new(seed, settings);
    engine.on_level_up(|| log::debug!("Level-up menu opened"));
    engine.on_game_over(|| log::debug!("Game over hook fired"));
    engine.start();

    let mut mesh = MeshSurface::new(engine.settings().quality);
    let mut ticks = 0;
    while ticks < MAX_TICKS {
        match engine.mode() {
            GameMode::LevelUp => {
                let Some(&choice) = engine.choices().first() else {
                    break;
                };
                log::info!("Auto-picking {}", choice.title());
                engine.choose(choice);
                continue;
            }
            GameMode::GameOver => break,
            _ => {}
        }

        // Circle-strafe so the swarm trails behind
        let theta = ticks as f32 * 0.01;
        let input = TickInput {
            movement: Vec2::new(theta.cos(), theta.sin()),
        };
        engine.tick(&input, SIM_DT);
        ticks += 1;

        if ticks % DRAW_EVERY == 0 {
            mesh.reset();
            draw_frame(&engine, &mut mesh);
            log::debug!("Frame at tick {}: {} vertices", ticks, mesh.vertex_count());
        }
    }

    log::info!("Run finished after {} ticks in {:?}", ticks, engine.mode());
    let hud = serde_json::to_string_pretty(&engine.hud()).map_err(std::io::Error::other)?;
    println!("{}", hud);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is embedded by a host page; nothing to run here
}
