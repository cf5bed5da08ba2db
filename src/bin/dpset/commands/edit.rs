use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use dpd_pset::{
    DuplicateRequest, DuplicateRow, ParticleSet, ProbeIncrementRequest, RemoveRequest,
    RescaleRequest, Session,
};

use crate::cli::{DuplicateArgs, IncrementProbesArgs, RemoveArgs, RescaleArgs};
use crate::display::{Context as DisplayContext, Progress, print_set_summary};

const WRITE_STEP: &str = "Writing new particle set";
const VERIFY_STEP: &str = "Verifying new particle set";

pub fn run_duplicate(
    args: DuplicateArgs,
    session: &Session,
    progress: &mut Progress,
    ctx: DisplayContext,
) -> Result<()> {
    let mut row = DuplicateRow::new(&args.particle, &args.new_particle)
        .with_name(args.name.unwrap_or_default())
        .with_corrections(
            args.corrections.old_new,
            args.corrections.lower,
            args.corrections.upper,
        );
    row.charge = args.overrides.charge;
    row.mass_g_mol = args.overrides.mass;
    row.volume = args.overrides.volume;
    let request = DuplicateRequest::new(args.target.output, vec![row]);

    let path = progress.run(WRITE_STEP, || {
        let path = session
            .editor()
            .try_duplicate_particles(&request)
            .with_context(|| {
                format!(
                    "Failed to duplicate '{}' as '{}'",
                    args.particle, args.new_particle
                )
            })?;
        let details = vec![describe(&path)];
        Ok((path, details))
    })?;

    finish(session, &path, progress, ctx)
}

pub fn run_remove(
    args: RemoveArgs,
    session: &Session,
    progress: &mut Progress,
    ctx: DisplayContext,
) -> Result<()> {
    let request = RemoveRequest::removing(args.target.output, &args.particles);

    let path = progress.run(WRITE_STEP, || {
        let path = session
            .editor()
            .try_remove_particles(&request)
            .with_context(|| format!("Failed to remove {}", args.particles.join(", ")))?;
        let details = vec![describe(&path)];
        Ok((path, details))
    })?;

    finish(session, &path, progress, ctx)
}

pub fn run_rescale(
    args: RescaleArgs,
    session: &Session,
    progress: &mut Progress,
    ctx: DisplayContext,
) -> Result<()> {
    let request = RescaleRequest::new(args.target.output, args.min_volume);

    let path = progress.run(WRITE_STEP, || {
        let path = session
            .editor()
            .try_rescale_min_volume(&request)
            .with_context(|| format!("Failed to rescale to minimum volume {}", args.min_volume))?;
        let details = vec![describe(&path)];
        Ok((path, details))
    })?;

    finish(session, &path, progress, ctx)
}

pub fn run_increment_probes(
    args: IncrementProbesArgs,
    session: &Session,
    progress: &mut Progress,
    ctx: DisplayContext,
) -> Result<()> {
    let request = ProbeIncrementRequest::new(args.target.output);

    let path = progress.run(WRITE_STEP, || {
        let path = session
            .editor()
            .try_increment_probe_particles(&request)
            .context("Failed to increment probe particles")?;
        let details = vec![describe(&path)];
        Ok((path, details))
    })?;

    finish(session, &path, progress, ctx)
}

fn describe(path: &Path) -> String {
    match path.file_name() {
        Some(name) => format!("Saved as {}", name.to_string_lossy()),
        None => format!("Saved as {}", path.display()),
    }
}

/// Re-reads the written file, shows its summary and prints its path.
fn finish(
    session: &Session,
    path: &Path,
    progress: &mut Progress,
    ctx: DisplayContext,
) -> Result<()> {
    let written = progress.run(VERIFY_STEP, || {
        let written = ParticleSet::read_path(path, session.conventions())
            .with_context(|| format!("Written particle set does not load: {}", path.display()))?;
        let details = vec![format!("{} particles", written.particle_count())];
        Ok((written, details))
    })?;
    progress.record_written(path);

    if ctx.interactive {
        print_set_summary(&mut io::stderr().lock(), path, &written);
    }

    let mut out = io::stdout().lock();
    writeln!(out, "{}", path.display())?;
    out.flush()?;
    Ok(())
}
