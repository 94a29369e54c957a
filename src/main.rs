//! Headless gallery runner.
//!
//! Drives the rotation scheduler against the simulated host at the
//! configured tick rate and logs swaps and tick rate. The rotation state is
//! saved each time a new scene settles on screen and again on exit, so the
//! next run resumes where this one stopped.
//!
//! Usage: `splat-gallery [options.toml] [seconds]`

use std::path::{Path, PathBuf};

use splat_gallery::host::SimulatedHost;
use splat_gallery::options::Options;
use splat_gallery::rotation::{
    RotationScheduler, RotationState, StateCheckpoint, TickInput,
};
use splat_gallery::scene::SceneCatalog;
use splat_gallery::util::cycle_timer::CycleTimer;
use splat_gallery::util::tick_pacer::TickPacer;
use web_time::{Duration, Instant};

const DEFAULT_OPTIONS_PATH: &str = "splat-gallery.toml";
const RATE_LOG_INTERVAL: Duration = Duration::from_secs(10);

struct GalleryApp {
    scheduler: RotationScheduler,
    host: SimulatedHost,
    timer: CycleTimer,
    pacer: TickPacer,
    checkpoint: Option<StateCheckpoint>,
}

impl GalleryApp {
    fn new(options: &Options) -> Self {
        let catalog = SceneCatalog::from_options(&options.gallery);
        let snapshot = options.gallery.state_file.as_deref().and_then(|path| {
            RotationState::load(path).unwrap_or_else(|e| {
                log::warn!("ignoring rotation state {}: {e}", path.display());
                None
            })
        });

        let mut host = SimulatedHost::new();
        let (scheduler, _reader) =
            RotationScheduler::resume(catalog, options, snapshot, &mut host);

        Self {
            scheduler,
            host,
            timer: CycleTimer::new(options.rotation.cycle_period()),
            pacer: TickPacer::new(options.rotation.target_fps),
            checkpoint: options
                .gallery
                .state_file
                .as_ref()
                .map(StateCheckpoint::new),
        }
    }

    fn run(&mut self, limit: Option<Duration>) {
        let mut last_rate_log = Instant::now();
        let mut scene = self.scheduler.last_output().scene_index;

        loop {
            let now = self.pacer.wait();
            let elapsed = self.pacer.elapsed(now);
            if limit.is_some_and(|limit| elapsed >= limit.as_secs_f64()) {
                break;
            }

            let input = TickInput::new(elapsed, self.timer.position(now));
            let frame = self.scheduler.tick(input, &mut self.host);
            self.host.observe(&frame);

            if frame.scene_index != scene {
                scene = frame.scene_index;
                log::info!(
                    "scene {} on screen, {} next",
                    frame.scene_index,
                    frame.next_scene_index
                );
                self.checkpoint();
            }
            if now.duration_since(last_rate_log) >= RATE_LOG_INTERVAL {
                last_rate_log = now;
                log::info!(
                    "{:.1} ticks/s, cycle {}, host {:?}",
                    self.pacer.rate(now),
                    self.timer.completed_cycles(now),
                    self.host.stats()
                );
            }
        }
    }

    /// Save if the scene changed since the last save.
    fn checkpoint(&mut self) {
        let Some(checkpoint) = &mut self.checkpoint else {
            return;
        };
        match checkpoint.update(self.scheduler.state()) {
            Ok(true) => log::debug!(
                "rotation state saved to {}",
                checkpoint.path().display()
            ),
            Ok(false) => {}
            Err(e) => log::error!("failed to save rotation state: {e}"),
        }
    }

    fn save_state(&mut self) {
        let Some(checkpoint) = &mut self.checkpoint else {
            return;
        };
        match checkpoint.save(self.scheduler.state()) {
            Ok(()) => log::info!(
                "rotation state saved to {}",
                checkpoint.path().display()
            ),
            Err(e) => log::error!("failed to save rotation state: {e}"),
        }
    }
}

fn parse_args() -> Result<(PathBuf, Option<Duration>), String> {
    let mut args = std::env::args().skip(1);
    let options_path = args
        .next()
        .map_or_else(|| PathBuf::from(DEFAULT_OPTIONS_PATH), PathBuf::from);
    let limit = match args.next() {
        Some(seconds) => {
            let seconds: f64 = seconds
                .parse()
                .map_err(|e| format!("invalid run time {seconds:?}: {e}"))?;
            if !(seconds.is_finite() && seconds >= 0.0) {
                return Err(format!("invalid run time {seconds}"));
            }
            Some(Duration::from_secs_f64(seconds))
        }
        None => None,
    };
    Ok((options_path, limit))
}

fn load_options(path: &Path) -> Options {
    match Options::load_or_default(path) {
        Ok(options) => options,
        Err(e) => {
            log::error!("{}: {e}", path.display());
            std::process::exit(1);
        }
    }
}

fn main() {
    env_logger::init();

    let (options_path, limit) = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            log::error!("{e}");
            log::error!("Usage: splat-gallery [options.toml] [seconds]");
            std::process::exit(1);
        }
    };

    let options = load_options(&options_path);
    let mut app = GalleryApp::new(&options);
    app.run(limit);
    app.save_state();
}
