use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "dpset",
    about = "Inspect and edit DPD particle-set files",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub set: SetOptions,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Summarize particles, temperatures and amino acids
    #[command(visible_alias = "i")]
    Inspect(InspectArgs),

    /// Show interaction values and bond length of a particle pair
    Pair(PairArgs),

    /// Show interactions of one particle with every particle
    Matrix(MatrixArgs),

    /// List probe particles, optionally those of one backbone particle
    Probes(ProbesArgs),

    /// Write a copy of the set with a particle duplicated under a new code
    #[command(visible_alias = "dup")]
    Duplicate(DuplicateArgs),

    /// Write a copy of the set without the given particles
    #[command(visible_alias = "rm")]
    Remove(RemoveArgs),

    /// Write a copy of the set with all volumes rescaled to a new minimum
    Rescale(RescaleArgs),

    /// Write a copy of the set with every probe particle incremented
    IncrementProbes(IncrementProbesArgs),
}

/// Particle-set location and output options shared by all commands.
#[derive(Args)]
#[command(next_help_heading = "Particle Set")]
pub struct SetOptions {
    /// Particle-set file to load
    #[arg(short = 'p', long = "particle-set", value_name = "FILE", global = true)]
    pub particle_set: Option<PathBuf>,

    /// Directory of bundled particle-set files (default: directory of --particle-set)
    #[arg(long = "source-dir", value_name = "DIR", global = true)]
    pub source_dir: Option<PathBuf>,

    /// Directory that receives edited particle sets (default: --source-dir)
    #[arg(long = "custom-dir", value_name = "DIR", global = true)]
    pub custom_dir: Option<PathBuf>,

    /// Naming and format conventions (TOML, built-in defaults if omitted)
    #[arg(long, value_name = "FILE", global = true)]
    pub conventions: Option<PathBuf>,

    /// Suppress banner, progress and summary tables (for scripting)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Args)]
pub struct InspectArgs {
    /// Also list every particle description
    #[arg(long)]
    pub particles: bool,
}

#[derive(Args)]
pub struct PairArgs {
    /// First particle code
    #[arg(value_name = "A")]
    pub first: String,

    /// Second particle code
    #[arg(value_name = "B")]
    pub second: String,

    /// Temperature (all temperatures if omitted)
    #[arg(short, long, value_name = "T")]
    pub temperature: Option<String>,
}

#[derive(Args)]
pub struct MatrixArgs {
    /// Particle code
    #[arg(value_name = "PARTICLE")]
    pub particle: String,

    /// Temperature (lowest temperature of the set if omitted)
    #[arg(short, long, value_name = "T")]
    pub temperature: Option<String>,
}

#[derive(Args)]
pub struct ProbesArgs {
    /// Backbone particle code (e.g. AlaBb)
    #[arg(value_name = "BACKBONE")]
    pub backbone: Option<String>,
}

/// Output filename shared by the editing commands.
#[derive(Args)]
pub struct TargetOptions {
    /// Name of the new particle-set file (ParticleSet*.txt)
    #[arg(short, long, value_name = "NAME")]
    pub output: String,
}

#[derive(Args)]
pub struct DuplicateArgs {
    #[command(flatten)]
    pub target: TargetOptions,

    /// Particle to duplicate
    #[arg(value_name = "PARTICLE")]
    pub particle: String,

    /// Code of the new particle
    #[arg(value_name = "NEW")]
    pub new_particle: String,

    /// Name of the new particle (source name if omitted)
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    #[command(flatten)]
    pub corrections: CorrectionOptions,

    #[command(flatten)]
    pub overrides: OverrideOptions,
}

/// Interaction corrections in percent.
#[derive(Args)]
#[command(next_help_heading = "Interaction Corrections (%)")]
pub struct CorrectionOptions {
    /// Correction of the new/old cross interaction
    #[arg(
        long = "old-new",
        value_name = "PCT",
        default_value = "0.0",
        allow_hyphen_values = true
    )]
    pub old_new: f64,

    /// Correction of cross interactions below the self interaction
    #[arg(
        long,
        value_name = "PCT",
        default_value = "0.0",
        allow_hyphen_values = true
    )]
    pub lower: f64,

    /// Correction of cross interactions above the self interaction
    #[arg(
        long,
        value_name = "PCT",
        default_value = "0.0",
        allow_hyphen_values = true
    )]
    pub upper: f64,
}

/// Description values of the new particle.
#[derive(Args)]
#[command(next_help_heading = "Description Overrides")]
pub struct OverrideOptions {
    /// Charge of the new particle
    #[arg(long, value_name = "Q", allow_hyphen_values = true)]
    pub charge: Option<f64>,

    /// Mass of the new particle (g/mol)
    #[arg(long, value_name = "M")]
    pub mass: Option<f64>,

    /// Volume of the new particle (Å³)
    #[arg(long, value_name = "V")]
    pub volume: Option<f64>,
}

#[derive(Args)]
pub struct RemoveArgs {
    #[command(flatten)]
    pub target: TargetOptions,

    /// Particles to remove
    #[arg(value_name = "PARTICLE", required = true, num_args = 1..)]
    pub particles: Vec<String>,
}

#[derive(Args)]
pub struct RescaleArgs {
    #[command(flatten)]
    pub target: TargetOptions,

    /// New minimum particle volume (Å³)
    #[arg(long = "min-volume", value_name = "V", default_value_t = dpd_pset::edit::DEFAULT_MIN_VOLUME)]
    pub min_volume: f64,
}

#[derive(Args)]
pub struct IncrementProbesArgs {
    #[command(flatten)]
    pub target: TargetOptions,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_duplicate_with_corrections() {
        let cli = Cli::try_parse_from([
            "dpset",
            "-p",
            "ParticleSetBase.txt",
            "duplicate",
            "OIL",
            "OIL2",
            "-o",
            "ParticleSetNew.txt",
            "--old-new",
            "10",
            "--lower",
            "-5",
        ])
        .unwrap();
        let Command::Duplicate(args) = cli.command else {
            panic!("expected duplicate command");
        };
        assert_eq!(args.particle, "OIL");
        assert_eq!(args.corrections.old_new, 10.0);
        assert_eq!(args.corrections.lower, -5.0);
        assert_eq!(args.corrections.upper, 0.0);
        assert_eq!(args.target.output, "ParticleSetNew.txt");
    }

    #[test]
    fn global_options_follow_subcommand() {
        let cli = Cli::try_parse_from(["dpset", "inspect", "-p", "ParticleSetBase.txt", "-q", "-vv"])
            .unwrap();
        assert!(cli.set.quiet);
        assert_eq!(cli.set.verbose, 2);
        assert!(cli.set.particle_set.is_some());
    }

    #[test]
    fn remove_requires_particles() {
        assert!(Cli::try_parse_from(["dpset", "remove", "-o", "ParticleSetX.txt"]).is_err());
    }
}
