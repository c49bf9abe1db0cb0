//! SkyCanvas driver: runs the atmosphere updater headless against in-memory
//! sky and cloud materials.
//!
//! Run with: `cargo run -p skycanvas-app -- --cloud-speed 6 --frames 120`

mod game_loop;
mod host;

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::Parser;
use skycanvas_atmosphere::{
    AtmosphereTargets, AtmosphereUpdater, FrameHooks, HostEnvironment, LightSource, OVERRIDE_SUN,
    OVERRIDE_TIME, ParameterBlock,
};
use skycanvas_config::{CliArgs, Config, default_config_dir};
use tracing::{debug, info, warn};

use crate::game_loop::{FRAME_INTERVAL, GameLoop};
use crate::host::{SceneHost, ViewerWalk, shared_light};

fn main() {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().map(Ok).unwrap_or_else(default_config_dir);
    let (mut config, load_error) = match &config_dir {
        Ok(dir) => match Config::load_or_create(dir) {
            Ok(config) => (config, None),
            Err(e) => (Config::default(), Some(e)),
        },
        Err(_) => (Config::default(), None),
    };
    config.apply_cli_overrides(&args);
    let config = config.validated();

    let log_dir = config_dir.as_ref().ok().map(|dir| dir.join("logs"));
    skycanvas_log::init_logging(
        log_dir.as_deref(),
        cfg!(debug_assertions) && config.debug.file_logging,
        Some(&config),
    );

    if let Some(e) = load_error {
        warn!("Using default config: {e}");
    }
    match &config_dir {
        Ok(dir) => info!("Config directory: {}", dir.display()),
        Err(e) => warn!("{e}; hot-reload disabled"),
    }

    run(config, config_dir.ok());
}

/// Drive the updater until the configured frame count is reached.
fn run(mut config: Config, config_dir: Option<PathBuf>) {
    let clouds = ParameterBlock::shared("atmosphere_clouds");
    let sky = ParameterBlock::shared("atmosphere_sky");
    let targets = AtmosphereTargets {
        clouds: clouds.clone(),
        sky: sky.clone(),
    };

    let host = SceneHost::new(&config.environment);
    let mut updater = AtmosphereUpdater::new(targets, config.atmosphere.settings());
    if let Some(angles) = config.atmosphere.sun_override {
        updater.set_sun(Some(shared_light(angles) as Rc<dyn LightSource>));
    }
    updater.on_start(&host);
    info!(
        cloud_speed = config.atmosphere.cloud_speed,
        sun = ?updater.sun_vector(),
        "Atmosphere updater started"
    );

    let mut walk = ViewerWalk::new(&config.simulation);
    let mut game_loop = GameLoop::new();
    let acquire_step = u64::from(config.simulation.viewer_acquire_frame);
    let mut steps = 0u64;

    loop {
        let frames = u64::from(config.simulation.frames);
        if frames != 0 && game_loop.frame_count() >= frames {
            break;
        }
        let reload_interval = u64::from(config.simulation.reload_interval_frames);

        game_loop.tick(
            |dt, _| {
                let head = walk.step(dt as f32);
                steps += 1;
                if steps >= acquire_step {
                    if !host.viewer_tracked() {
                        info!(
                            "Viewer tracking acquired at ({:.2}, {:.2}, {:.2})",
                            head.x, head.y, head.z
                        );
                    }
                    host.track_viewer(head);
                }
            },
            |frame| {
                updater.on_frame(&host);
                if let Some(dir) = &config_dir
                    && reload_interval != 0
                    && frame > 0
                    && frame % reload_interval == 0
                {
                    apply_reload(&mut config, dir, &mut updater, &host);
                }
            },
        );
        std::thread::sleep(FRAME_INTERVAL);
    }

    info!(
        frames = game_loop.frame_count(),
        steps = game_loop.update_count(),
        "Simulated {:.2}s",
        game_loop.total_sim_time()
    );
    report(&clouds, &sky, &host, &updater);
}

/// Pick up edits to `config.ron` and re-publish with the new settings.
fn apply_reload(
    config: &mut Config,
    dir: &Path,
    updater: &mut AtmosphereUpdater,
    host: &SceneHost,
) {
    match config.reload(dir) {
        Ok(Some(new_config)) => {
            updater.set_settings(new_config.atmosphere.settings());
            if new_config.atmosphere.sun_override != config.atmosphere.sun_override {
                let light = match new_config.atmosphere.sun_override {
                    Some(angles) => Some(shared_light(angles) as Rc<dyn LightSource>),
                    None => host.default_sun(),
                };
                updater.set_sun(light);
            }
            updater.on_config_changed(host);
            info!(
                cloud_speed = new_config.atmosphere.cloud_speed,
                "Applied config changes"
            );
            *config = new_config;
        }
        Ok(None) => debug!("Config unchanged"),
        Err(e) => warn!("Config reload failed, keeping current settings: {e}"),
    }
}

fn report(
    clouds: &Rc<RefCell<ParameterBlock>>,
    sky: &Rc<RefCell<ParameterBlock>>,
    host: &SceneHost,
    updater: &AtmosphereUpdater,
) {
    let uniform = updater.uniform();
    info!(
        camera = ?uniform.camera_position_offset,
        sun = ?uniform.override_sun,
        time = ?uniform.override_time,
        "Final atmosphere parameters"
    );

    let registry = host.registry();
    for name in [OVERRIDE_SUN, OVERRIDE_TIME] {
        let Some(id) = registry.lookup_by_name(name) else {
            warn!("{name} was never resolved");
            continue;
        };
        let (c, s) = (clouds.borrow().get_vector(id), sky.borrow().get_vector(id));
        if c != s {
            warn!("{name} diverged between materials: {c:?} vs {s:?}");
        }
    }
    info!(
        "{}: {} writes, {}: {} writes",
        clouds.borrow().label(),
        clouds.borrow().write_count(),
        sky.borrow().label(),
        sky.borrow().write_count()
    );
}
