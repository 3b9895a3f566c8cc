//! Paintball entry point
//!
//! The browser build is driven from JavaScript through `platform::web`. The
//! native binary runs a short headless session and logs what happens, which is
//! handy for checking level files: `paintball [levels.json]`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    paintball::platform::init_logging();
    log::info!("Paintball (native) starting...");

    if let Err(e) = demo::run(std::env::args().nth(1)) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::error::Error;

    use glam::Vec2;
    use paintball::Settings;
    use paintball::persistence::MemoryStore;
    use paintball::sim::{Simulation, TickInput, builtin_levels, load_levels};

    const FRAMES: usize = 600;

    pub fn run(levels_path: Option<String>) -> Result<(), Box<dyn Error>> {
        let levels = match levels_path {
            Some(path) => {
                log::info!("Loading levels from {}", path);
                load_levels(&std::fs::read_to_string(path)?)?
            }
            None => builtin_levels()?,
        };

        let mut store = MemoryStore::new();
        let settings = Settings::load(&store);
        let mut sim = Simulation::new(levels)?;
        sim.select_level(settings.start_level);

        for frame_no in 0..FRAMES {
            let input = scripted_input(frame_no, sim.player().pos);
            let frame = sim.tick(&input);

            if frame_no % 60 == 0 {
                let weapon = &frame.weapons[frame.selected_weapon];
                log::info!(
                    "t={:>4} level={} player=({:.0}, {:.0}) entities={} {} {}/{}{}",
                    frame_no,
                    frame.level,
                    frame.player.x,
                    frame.player.y,
                    frame.entities.len(),
                    weapon.name,
                    weapon.magazine,
                    weapon.reserve,
                    if weapon.reloading { " (reloading)" } else { "" }
                );
            }
        }

        settings.save(&mut store)?;
        log::info!("Demo finished after {} frames", FRAMES);
        Ok(())
    }

    /// Wander right and down, firing to the right and cycling paint now and then
    fn scripted_input(frame_no: usize, player: Vec2) -> TickInput {
        let phase = frame_no % 240;
        TickInput {
            right: phase < 120,
            down: (120..180).contains(&phase),
            left: phase >= 180,
            mouse: player + Vec2::new(100.0, 0.0),
            fire_down: frame_no % 20 == 0,
            secondary_down: frame_no % 200 == 100,
            select_weapon: (frame_no % 300 == 150).then_some(1),
            ..Default::default()
        }
    }
}
