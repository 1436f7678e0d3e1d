//! Crystal Hunt entry point
//!
//! Runs a level headless with a scripted player: walks to each crystal, shoots
//! whatever gets close, then steps into the portal. Useful for tuning configs.
//!
//! Usage: crystal-hunt [CONFIG.json] [--seed N] [--seconds S] [--dump-config]

use glam::Vec3;

use crystal_hunt::GameConfig;
use crystal_hunt::consts::*;
use crystal_hunt::sim::{FlatGround, GameEvent, LevelPhase, LevelState, PlayerPose, TickInput, tick};

/// Player walk speed for the autopilot (units/s)
const WALK_SPEED: f32 = 5.0;
/// Variable frame time the demo feeds the fixed-step loop
const FRAME_DT: f32 = 1.0 / 45.0;

struct Options {
    config_path: Option<String>,
    seed: u64,
    seconds: f32,
    dump_config: bool,
}

fn parse_args() -> Options {
    let mut options = Options {
        config_path: None,
        seed: 12345,
        seconds: 120.0,
        dump_config: false,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => match args.next().and_then(|v| v.parse().ok()) {
                Some(seed) => options.seed = seed,
                None => log::warn!("--seed needs an integer, keeping {}", options.seed),
            },
            "--seconds" => match args.next().and_then(|v| v.parse().ok()) {
                Some(secs) => options.seconds = secs,
                None => log::warn!("--seconds needs a number, keeping {}", options.seconds),
            },
            "--dump-config" => options.dump_config = true,
            _ => options.config_path = Some(arg),
        }
    }
    options
}

/// Demo instance holding the level and the frame loop state
struct Demo {
    state: LevelState,
    ground: FlatGround,
    accumulator: f32,
    input: TickInput,
    last_hud: String,
}

impl Demo {
    fn new(config: GameConfig, seed: u64) -> Self {
        let ground = FlatGround::new(0.0);
        Self {
            state: LevelState::new(config, seed, &ground),
            ground,
            accumulator: 0.0,
            input: TickInput::default(),
            last_hud: String::new(),
        }
    }

    /// Run simulation ticks for one frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.input = self.autopilot();
            tick(&mut self.state, &self.input, SIM_DT, &self.ground);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
    }

    /// Decide this tick's input from the current state
    fn autopilot(&self) -> TickInput {
        let player = &self.state.player;
        let goal = match self.state.phase {
            LevelPhase::PortalOpen => Some(self.state.portal.position),
            _ => self.state.objectives.nearest(player.position).map(|o| o.position),
        };

        let threat = self
            .state
            .population
            .enemies()
            .iter()
            .filter(|e| !e.is_dying())
            .map(|e| (e, e.position.distance(player.position)))
            .filter(|(_, d)| *d <= self.state.config.enemy.chase_radius)
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let mut position = player.position;
        let mut forward = player.forward;
        if let Some(goal) = goal {
            let to_goal = Vec3::new(goal.x - position.x, 0.0, goal.z - position.z);
            let step = WALK_SPEED * SIM_DT;
            if to_goal.length() <= step {
                position = Vec3::new(goal.x, position.y, goal.z);
            } else {
                position += to_goal.normalize() * step;
            }
            forward = to_goal.try_normalize().unwrap_or(forward);
        }
        if let Some((enemy, _)) = threat {
            forward = (enemy.position - position).try_normalize().unwrap_or(forward);
        }

        TickInput {
            pose: Some(PlayerPose {
                position,
                forward,
                grounded: true,
            }),
            fire: threat.is_some(),
            reload: self.state.weapon.ammo() == 0,
            damage: Vec::new(),
        }
    }

    /// Log events and HUD changes; returns true once the level is finished
    fn report(&mut self) -> bool {
        let mut finished = false;
        for event in self.state.drain_events() {
            match event {
                GameEvent::PortalOpened { position } => log::info!("Portal opened at {}", position),
                GameEvent::PlayerDied => log::info!("You died"),
                GameEvent::LoadLevel { entry } => {
                    log::info!("Scene load requested: entry {}", entry);
                    finished |= self.state.phase == LevelPhase::Exited;
                }
                other => log::debug!("{:?}", other),
            }
        }

        let hud = &self.state.hud;
        let line = format!(
            "{} | {} | ammo {}{}",
            hud.objective_text,
            hud.health.text,
            hud.ammo_text,
            if hud.death_message_visible { " | YOU DIED" } else { "" }
        );
        if line != self.last_hud {
            log::info!("{}", line);
            self.last_hud = line;
        }
        finished
    }
}

fn main() {
    env_logger::init();
    let options = parse_args();

    let config = match &options.config_path {
        Some(path) => GameConfig::load(path).unwrap_or_else(|e| {
            log::error!("Failed to load {}: {}, using defaults", path, e);
            GameConfig::default()
        }),
        None => GameConfig::default(),
    };

    if options.dump_config {
        match config.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to serialize config: {}", e),
        }
        return;
    }

    log::info!("Crystal Hunt (headless) starting with seed {}", options.seed);
    let mut demo = Demo::new(config, options.seed);

    let frames = (options.seconds / FRAME_DT).ceil() as u64;
    for _ in 0..frames {
        demo.update(FRAME_DT);
        if demo.report() {
            log::info!(
                "Level finished after {:.1}s",
                demo.state.time_ticks as f32 / SIM_HZ as f32
            );
            return;
        }
    }
    log::info!(
        "Stopped after {}s: {} crystals left, {} enemies alive, {} level loads",
        options.seconds,
        demo.state.objectives.remaining(),
        demo.state.population.len(),
        demo.state.load_count
    );
}
