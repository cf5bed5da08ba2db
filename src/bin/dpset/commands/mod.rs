mod edit;
mod inspect;
mod query;

use edit::{run_duplicate, run_increment_probes, run_remove, run_rescale};
use inspect::run_inspect;
use query::{run_matrix, run_pair, run_probes};

use std::process::ExitCode;

use anyhow::{Context, Error, Result, anyhow};
use dpd_pset::{ParticleSetPaths, Session};

use crate::cli::{Cli, Command, SetOptions};
use crate::display::{Context as DisplayContext, Progress};
use crate::io::read_conventions;

/// Exit code when the particle set cannot be loaded at startup.
const EXIT_LOAD_FAILURE: u8 = 2;

pub enum Failure {
    /// The particle set could not be loaded; nothing else can run.
    Load(Error),
    Command(Error),
}

impl Failure {
    pub fn error(&self) -> &Error {
        match self {
            Failure::Load(e) | Failure::Command(e) => e,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        match self {
            Failure::Load(_) => ExitCode::from(EXIT_LOAD_FAILURE),
            Failure::Command(_) => ExitCode::FAILURE,
        }
    }
}

pub fn run(cli: Cli, ctx: DisplayContext) -> Result<(), Failure> {
    let (title, total_steps) = plan(&cli.command);
    let mut progress = Progress::new(ctx.interactive, title, total_steps);

    let session = progress
        .run("Loading particle set", || {
            let session = open_session(&cli.set)?;
            let store = session.store();
            let details = vec![
                format!("{} particles", store.particle_count()),
                format!("{} temperatures", store.temperatures().len()),
            ];
            Ok((session, details))
        })
        .map_err(Failure::Load)?;

    dispatch(cli.command, &session, &mut progress, ctx).map_err(Failure::Command)?;
    progress.finish();
    Ok(())
}

fn plan(command: &Command) -> (&'static str, u8) {
    match command {
        Command::Inspect(_) => ("Inspection complete", 2),
        Command::Pair(_) | Command::Matrix(_) | Command::Probes(_) => ("Query complete", 2),
        Command::Duplicate(_)
        | Command::Remove(_)
        | Command::Rescale(_)
        | Command::IncrementProbes(_) => ("Edit complete", 3),
    }
}

fn open_session(options: &SetOptions) -> Result<Session> {
    let current = options.particle_set.clone().ok_or_else(|| {
        anyhow!(
            "No particle set specified.\n\nUsage: dpset --particle-set <FILE> <COMMAND>"
        )
    })?;
    let conventions = read_conventions(options.conventions.as_deref())?;

    let mut paths = ParticleSetPaths::beside(&current);
    if let Some(dir) = &options.source_dir {
        paths.source_dir = dir.clone();
        paths.custom_dir = dir.clone();
    }
    if let Some(dir) = &options.custom_dir {
        paths.custom_dir = dir.clone();
    }

    Session::open(paths, conventions)
        .with_context(|| format!("Failed to load particle set: {}", current.display()))
}

fn dispatch(
    command: Command,
    session: &Session,
    progress: &mut Progress,
    ctx: DisplayContext,
) -> Result<()> {
    match command {
        Command::Inspect(args) => run_inspect(args, session, progress),
        Command::Pair(args) => run_pair(args, session, progress),
        Command::Matrix(args) => run_matrix(args, session, progress),
        Command::Probes(args) => run_probes(args, session, progress),
        Command::Duplicate(args) => run_duplicate(args, session, progress, ctx),
        Command::Remove(args) => run_remove(args, session, progress, ctx),
        Command::Rescale(args) => run_rescale(args, session, progress, ctx),
        Command::IncrementProbes(args) => run_increment_probes(args, session, progress, ctx),
    }
}
