use std::io::{self, Write};

use anyhow::{Result, anyhow, bail};
use dpd_pset::{Session, Temperature};

use crate::cli::{MatrixArgs, PairArgs, ProbesArgs};
use crate::display::{Progress, print_interaction_matrix, print_pair};

pub fn run_pair(args: PairArgs, session: &Session, progress: &mut Progress) -> Result<()> {
    let query = session.query();

    let (values, bond_length) = progress.run("Looking up interactions", || {
        let temperatures: Vec<String> = match &args.temperature {
            Some(t) if !query.has_temperature(t) => {
                bail!("Temperature {t} is not defined in the particle set")
            }
            Some(t) => vec![t.clone()],
            None => query
                .set()
                .temperatures()
                .iter()
                .map(|t| t.to_string())
                .collect(),
        };

        let mut values = Vec::with_capacity(temperatures.len());
        for t in &temperatures {
            let value = query.interaction(&args.first, &args.second, t)?;
            values.push((Temperature::parse(t)?.to_string(), value));
        }
        let bond_length = query.bond_length(&args.first, &args.second)?;
        let defined = values.iter().filter(|(_, v)| v.is_some()).count();
        let details = vec![format!("{defined} of {} temperatures defined", values.len())];
        Ok(((values, bond_length), details))
    })?;

    let mut out = io::stdout().lock();
    print_pair(&mut out, &args.first, &args.second, &values, bond_length);
    out.flush()?;
    Ok(())
}

pub fn run_matrix(args: MatrixArgs, session: &Session, progress: &mut Progress) -> Result<()> {
    let query = session.query();

    let cells = progress.run("Building interaction matrix", || {
        let temperature = match &args.temperature {
            Some(t) => t.clone(),
            None => query
                .set()
                .temperatures()
                .first()
                .map(|t| t.to_string())
                .ok_or_else(|| anyhow!("The particle set defines no temperatures"))?,
        };
        let Some(cells) = query.interaction_matrix(&args.particle, &temperature) else {
            bail!(
                "No interaction matrix for particle '{}' at temperature '{}'",
                args.particle,
                temperature
            );
        };
        let defined = cells.iter().filter(|c| c.value.is_some()).count();
        let details = vec![format!("{defined} of {} pairs defined", cells.len())];
        Ok((cells, details))
    })?;

    let mut out = io::stdout().lock();
    print_interaction_matrix(&mut out, &cells);
    out.flush()?;
    Ok(())
}

pub fn run_probes(args: ProbesArgs, session: &Session, progress: &mut Progress) -> Result<()> {
    let query = session.query();

    let probes = progress.run("Searching probe particles", || {
        let probes = match &args.backbone {
            Some(backbone) => {
                if !session.conventions().naming.is_backbone(backbone) {
                    bail!("'{backbone}' is not a backbone particle code");
                }
                query.probes_for_backbone(backbone)
            }
            None => query.probe_particles(),
        };
        let details = vec![format!("{} found", probes.len())];
        Ok((probes, details))
    })?;

    let mut out = io::stdout().lock();
    for code in probes {
        writeln!(out, "{code}")?;
    }
    out.flush()?;
    Ok(())
}
