//! Heart Toss entry point
//!
//! Web builds mount through `HeartToss` (see `platform::web`). Natively this
//! runs a headless session, `heart-toss [tuning.json] [seed]`: a burst of
//! spawns, five seconds of 60 Hz frames, and a summary in the log.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use heart_toss::Viewport;
    use heart_toss::platform::{Host, ManualScheduler};
    use heart_toss::renderer::TransformBuffer;
    use heart_toss::settings::Tuning;
    use heart_toss::sim::{ShapeBounds, Simulation};

    const VIEWPORT: Viewport = Viewport {
        width: 1000.0,
        height: 800.0,
    };
    const BURST: usize = 12;
    const SECONDS: f64 = 5.0;
    const FRAME_MS: f64 = 1000.0 / 60.0;
    const EPS: f32 = 1e-2;
    const DEFAULT_SEED: u64 = 2024;

    fn load_tuning() -> Tuning {
        let Some(path) = std::env::args().nth(1) else {
            return Tuning::default();
        };
        let loaded = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()));
        match loaded {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning file {}: {}", path, e);
                Tuning::default()
            }
        }
    }

    pub fn run() {
        let tuning = load_tuning();
        let seed = std::env::args()
            .nth(2)
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_SEED);
        log::info!("Seed {}", seed);
        let sim = Simulation::new(seed, tuning, ShapeBounds::heart());
        let mut host = Host::new(sim, ManualScheduler::new(), TransformBuffer::new());
        host.mount();

        for _ in 0..BURST {
            let hint = host.sim_mut().random_spawn_center(VIEWPORT);
            host.spawn(VIEWPORT, Some(hint));
        }
        log::info!(
            "Spawned {} tokens, {} live: {:?}",
            BURST,
            host.sim().bodies().len(),
            host.sink().ids()
        );

        let frames = (SECONDS * 1000.0 / FRAME_MS).round() as u32;
        let mut floor_hits = 0;
        let mut contacts = 0;
        let mut escaped = 0;
        for i in 0..frames {
            let Some(report) = host.on_frame(i as f64 * FRAME_MS, VIEWPORT) else {
                break;
            };
            floor_hits += report.floor_hits;
            contacts += report.contacts;

            let sim = host.sim();
            escaped += sim
                .bodies()
                .iter()
                .map(|b| sim.bounds.box_for(b))
                .filter(|bx| {
                    bx.left < -EPS
                        || bx.top < -EPS
                        || bx.right > VIEWPORT.width + EPS
                        || bx.bottom > VIEWPORT.height + EPS
                })
                .count();
        }
        host.unmount();

        log::info!(
            "{} frames: {} live, {} floor bounces, {} contacts, {} out-of-bounds samples",
            host.frames(),
            host.sim().bodies().len(),
            floor_hits,
            contacts,
            escaped
        );
        for body in host.sim().bodies().iter() {
            log::debug!(
                "{} size {:.0} at ({:.1}, {:.1}) angle {:.2}",
                body.id,
                body.size(),
                body.pos.x,
                body.pos.y,
                body.angle
            );
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Heart Toss (native, headless) starting...");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
