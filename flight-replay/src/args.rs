use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser, Debug)]
#[command(name = "Flight Replay")]
#[command(bin_name = "flight-replay")]
pub struct Cli {
    #[arg(short, long, global = true, help = "log gate decisions")]
    pub verbose: bool,

    #[clap(subcommand)]
    pub mode: ModeSelect,
}

#[derive(Subcommand, Debug)]
pub enum ModeSelect {
    #[command(about = "run a recorded sensor log through the flight computer")]
    Replay(ReplayCli),

    #[command(about = "generate a synthetic sensor log")]
    Synth(SynthCli),

    #[command(about = "print the default flight config as toml")]
    DefaultConfig,
}

#[derive(Parser, Debug)]
pub struct ReplayCli {
    #[arg(help = "csv with time_s,acc_x,acc_y,acc_z,pressure,temperature")]
    pub input: PathBuf,
    #[arg(long, help = "per cycle estimator output csv")]
    pub output: Option<PathBuf>,
    #[arg(long, help = "flight config toml")]
    pub config: Option<PathBuf>,
    #[arg(
        long,
        default_value_t = 0,
        help = "use the mean pressure of the first N rows as the altitude reference"
    )]
    pub calibrate: usize,
    #[arg(long, help = "override cycle period (s)")]
    pub dt: Option<f32>,
    #[arg(long, help = "override reference pressure (Pa)")]
    pub sea_level_pressure: Option<f32>,
}

#[derive(Parser, Debug)]
pub struct SynthCli {
    pub output: PathBuf,
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
    #[arg(long, default_value_t = 0.0, help = "pressure noise stddev (Pa)")]
    pub noise_pa: f32,
    #[arg(long, default_value_t = 0.0, help = "acceleration noise stddev (m/s^2)")]
    pub noise_acc: f32,
}
