use anyhow::Result;
use anyhow::bail;
use args::Cli;
use args::ModeSelect;
use args::ReplayCli;
use args::SynthCli;
use clap::Parser;
use config::default_config_toml;
use config::load_config;
use log::LevelFilter;
use log::info;
use log::warn;
use replay::replay;
use replay::write_cycles;
use sensor_log::calibrate_sea_level_pressure;
use sensor_log::read_sensor_log;
use sensor_log::write_sensor_log;
use synth::SynthProfile;
use synth::synthesize;

mod args;
mod config;
mod replay;
mod sensor_log;
mod synth;

fn main() -> Result<()> {
    let args = Cli::parse();
    let _ = env_logger::builder()
        .filter_level(if args.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .parse_default_env()
        .try_init();

    match args.mode {
        ModeSelect::Replay(args) => run_replay(args)?,
        ModeSelect::Synth(args) => run_synth(args)?,
        ModeSelect::DefaultConfig => print!("{}", default_config_toml()?),
    }

    Ok(())
}

fn run_replay(args: ReplayCli) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(dt) = args.dt {
        config.dt = dt;
    }
    if let Some(sea_level_pressure) = args.sea_level_pressure {
        config.sea_level_pressure = sea_level_pressure;
    }

    let records = read_sensor_log(&args.input)?;
    if records.is_empty() {
        bail!("{} has no rows", args.input.display());
    }
    info!("loaded {} rows from {}", records.len(), args.input.display());

    if args.calibrate > 0 {
        match calibrate_sea_level_pressure(&records, args.calibrate) {
            Some(pressure) => {
                info!("reference pressure {} Pa", pressure);
                config.sea_level_pressure = pressure;
            }
            None => warn!("no usable rows to calibrate on, keeping {} Pa", config.sea_level_pressure),
        }
    }
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid config: {e}"))?;

    let report = replay(records, config)?;

    if let Some(output) = &args.output {
        write_cycles(output, &report.cycles)?;
        info!("wrote {} cycles to {}", report.cycles.len(), output.display());
    }

    for (phase, time_s) in &report.phase_entries {
        println!("{:>14} at {:>8.2} s", phase.name(), time_s);
    }
    match report.max_altitude {
        Some(altitude) => println!("max altitude {:.1} m", altitude),
        None => println!("apogee not reached"),
    }
    println!("recovery deployments {}", report.deployments);
    if report.substituted_samples > 0 {
        warn!(
            "{} invalid rows were replaced by the previous sample",
            report.substituted_samples
        );
    }

    Ok(())
}

fn run_synth(args: SynthCli) -> Result<()> {
    let profile = SynthProfile {
        pressure_noise_pa: args.noise_pa,
        acc_noise: args.noise_acc,
        seed: args.seed,
        ..Default::default()
    };
    let flight = synthesize(&profile)?;
    write_sensor_log(&args.output, &flight.records)?;
    info!(
        "wrote {} rows to {}, apogee {:.1} m at {:.2} s",
        flight.records.len(),
        args.output.display(),
        flight.apogee_altitude,
        flight.apogee_time_s
    );
    Ok(())
}
