use clap::Parser;
use rescue_sim_core::{
    BuildingConfig, RescueSimulation, SimEvent, SimulationConfig, VictimConfig, VictimType,
};

/// Building-fire rescue simulation demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "rescue-sim-demo")]
#[command(about = "Headless building-fire rescue simulation", long_about = None)]
struct Args {
    /// Simulation duration in seconds
    #[arg(short, long, default_value_t = 120.0)]
    duration: f32,

    /// Tick length in seconds
    #[arg(long, default_value_t = 0.1)]
    tick: f32,

    /// Number of floors
    #[arg(short, long, default_value_t = 3)]
    floors: usize,

    /// Windows per floor
    #[arg(short, long, default_value_t = 3)]
    windows: usize,

    /// Maximum simultaneous fires
    #[arg(long, default_value_t = 5)]
    max_fires: u32,

    /// Chance that a served spread request ignites a window (0-1)
    #[arg(long, default_value_t = 0.5)]
    spread_chance: f32,

    /// 0-based window indices where fires start
    #[arg(short, long, value_delimiter = ',', default_values_t = vec![0])]
    ignite: Vec<usize>,

    /// Number of occupants trapped on the top floor
    #[arg(long, default_value_t = 2)]
    victims: usize,

    /// Seconds after which the rescuer opens the exit door
    #[arg(long, default_value_t = 30.0)]
    door_open_after: f32,

    /// Water power applied per burning window per report interval
    #[arg(long, default_value_t = 0.0)]
    water_power: f32,

    /// Report interval in seconds
    #[arg(short, long, default_value_t = 5.0)]
    report_interval: f32,

    /// Random seed
    #[arg(short, long, default_value_t = 0)]
    seed: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    println!("=== Building-Fire Rescue Demo ===\n");

    let mut config =
        SimulationConfig::new(BuildingConfig::grid(args.floors, args.windows, 4.0, 3.0));
    config.spread.max_fires = args.max_fires;
    config.spread.spread_chance = args.spread_chance;
    config.spread.starting_fire_windows = args.ignite.clone();
    config.seed = args.seed;
    let archetypes = [
        VictimType::Normal,
        VictimType::Child,
        VictimType::Elderly,
        VictimType::FastResponder,
    ];
    config.victims = (0..args.victims)
        .map(|i| VictimConfig {
            victim_type: archetypes[i % archetypes.len()],
            ..VictimConfig::default()
        })
        .collect();

    let mut sim = match RescueSimulation::new(&config) {
        Ok(sim) => sim,
        Err(error) => {
            eprintln!("invalid scenario: {error}");
            std::process::exit(1);
        }
    };
    println!(
        "Building: {} floors x {} windows, {} occupants, fire cap {}\n",
        args.floors, args.windows, args.victims, args.max_fires
    );

    let mut next_report = 0.0;
    let mut door_opened = false;
    while sim.simulation_time() < args.duration {
        sim.update(args.tick);

        if !door_opened && sim.simulation_time() >= args.door_open_after {
            sim.open_exit_door();
            door_opened = true;
            println!("[{:6.1}s] exit door broken open", sim.simulation_time());
        }

        for event in sim.drain_events() {
            match event {
                SimEvent::FireStarted { window, .. } => {
                    println!("[{:6.1}s] fire started at window {window}", sim.simulation_time());
                }
                SimEvent::FireExtinguished { window } => {
                    println!("[{:6.1}s] window {window} extinguished", sim.simulation_time());
                }
                SimEvent::VictimEscaped { victim } => {
                    println!("[{:6.1}s] victim {victim} escaped!", sim.simulation_time());
                }
                SimEvent::VictimDied { victim } => {
                    println!("[{:6.1}s] victim {victim} died", sim.simulation_time());
                }
                SimEvent::FireSpread { .. } => {}
            }
        }

        if sim.simulation_time() >= next_report {
            next_report += args.report_interval;
            if args.water_power > 0.0 {
                let burning: Vec<u32> = sim
                    .building()
                    .windows()
                    .iter()
                    .filter(|w| w.burning())
                    .map(rescue_sim_core::Window::number)
                    .collect();
                for number in burning {
                    sim.apply_water(number, args.water_power);
                }
            }
            report(&sim);
        }

        if !sim.victims().is_empty()
            && sim.victims().iter().all(|v| v.has_escaped() || !v.health().is_alive())
        {
            println!("\nAll occupants accounted for.");
            break;
        }
    }

    println!("\n=== Final state ===");
    report(&sim);
}

fn report(sim: &RescueSimulation) {
    let escaped = sim.victims().iter().filter(|v| v.has_escaped()).count();
    let alive = sim
        .victims()
        .iter()
        .filter(|v| v.health().is_alive())
        .count();
    println!(
        "[{:6.1}s] fires {}/{} | occupants: {} alive, {} escaped",
        sim.simulation_time(),
        sim.active_fire_count(),
        sim.max_fires(),
        alive,
        escaped
    );
}
