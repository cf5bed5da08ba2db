use std::io::{self, Write};

use anyhow::Result;
use dpd_pset::Session;

use crate::cli::InspectArgs;
use crate::display::{Progress, print_amino_acids, print_particle_table, print_set_summary};

pub fn run_inspect(args: InspectArgs, session: &Session, progress: &mut Progress) -> Result<()> {
    let query = session.query();
    progress.run("Summarizing particle set", || {
        let probes = query.probe_particles();
        Ok(((), vec![format!("{} probe particles", probes.len())]))
    })?;

    let mut out = io::stdout().lock();
    print_set_summary(&mut out, &session.paths().current, session.store());
    if args.particles {
        print_particle_table(&mut out, &query.particle_table());
        print_amino_acids(&mut out, session.store());
    }
    out.flush()?;
    Ok(())
}
