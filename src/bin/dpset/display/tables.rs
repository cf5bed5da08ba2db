use std::io::Write;
use std::path::Path;

use dpd_pset::{InteractionCell, ParticleDescription, ParticleSet};

use crate::util::text::{list_or_none, truncate, value_cell};

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

struct Column {
    title: &'static str,
    width: usize,
    align: Align,
}

const fn left(title: &'static str, width: usize) -> Column {
    Column {
        title,
        width,
        align: Align::Left,
    }
}

const fn right(title: &'static str, width: usize) -> Column {
    Column {
        title,
        width,
        align: Align::Right,
    }
}

pub fn print_set_summary(out: &mut impl Write, path: &Path, set: &ParticleSet) {
    let temperatures: Vec<&str> = set.temperatures().iter().map(|t| t.as_str()).collect();
    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let rows = vec![
        ("File", file),
        ("Particles", set.particle_count().to_string()),
        ("Interactions", set.interaction_count().to_string()),
        ("Temperatures", list_or_none(&temperatures)),
        (
            "Amino Acids",
            if set.has_amino_acid_definitions() {
                set.amino_acids().count().to_string()
            } else {
                "not defined".to_string()
            },
        ),
        (
            "Default",
            set.default_particle().unwrap_or("-").to_string(),
        ),
    ];

    print_kv_table(out, "Particle Set Summary", &rows);
}

pub fn print_particle_table(out: &mut impl Write, particles: &[&ParticleDescription]) {
    let columns = [
        left("Code", 10),
        left("Name", 14),
        right("Charge", 6),
        right("g/mol", 8),
        right("Volume", 8),
        left("Color", 10),
    ];
    let rows: Vec<Vec<String>> = particles
        .iter()
        .map(|p| {
            vec![
                p.code.clone(),
                p.name.clone(),
                p.charge.to_string(),
                p.mass_g_mol.to_string(),
                p.volume.to_string(),
                p.color.to_string(),
            ]
        })
        .collect();
    print_table(out, "Particles", &columns, &rows);
}

pub fn print_pair(
    out: &mut impl Write,
    first: &str,
    second: &str,
    values: &[(String, Option<f64>)],
    bond_length: f64,
) {
    let mut rows: Vec<(&str, String)> = values
        .iter()
        .map(|(temperature, value)| (temperature.as_str(), value_cell(*value)))
        .collect();
    let bond = format!("{bond_length:.4} Å");
    rows.push(("Bond Length", bond));
    print_kv_table(out, &format!("Pair {first}_{second}"), &rows);
}

pub fn print_interaction_matrix(out: &mut impl Write, cells: &[InteractionCell]) {
    let Some(head) = cells.first() else {
        return;
    };
    let columns = [left("Pair", 24), right("Value", 12)];
    let rows: Vec<Vec<String>> = cells
        .iter()
        .map(|c| vec![format!("{}_{}", c.first, c.second), value_cell(c.value)])
        .collect();
    print_table(
        out,
        &format!("{} at {}", head.first, head.temperature),
        &columns,
        &rows,
    );
}

pub fn print_amino_acids(out: &mut impl Write, set: &ParticleSet) {
    if !set.has_amino_acid_definitions() {
        return;
    }
    let columns = [left("Code", 4), left("Abbr", 4), left("Name", 14), left("Fragments", 22)];
    let rows: Vec<Vec<String>> = set
        .amino_acids()
        .map(|a| {
            vec![
                a.one_letter_code.clone(),
                a.three_letter_code.clone(),
                a.name.clone(),
                a.fragment_spec.clone(),
            ]
        })
        .collect();
    print_table(out, "Amino Acids", &columns, &rows);
}

fn rule(columns: &[Column], open: char, join: char, close: char) -> String {
    let inner: Vec<String> = columns.iter().map(|c| "─".repeat(c.width + 2)).collect();
    format!("{INDENT}{open}{}{close}", inner.join(&join.to_string()))
}

fn cells_line(columns: &[Column], values: &[&str]) -> String {
    let cells: Vec<String> = columns
        .iter()
        .zip(values)
        .map(|(c, v)| {
            let v = truncate(v, c.width);
            match c.align {
                Align::Left => format!(" {:<w$} ", v, w = c.width),
                Align::Right => format!(" {:>w$} ", v, w = c.width),
            }
        })
        .collect();
    format!("{INDENT}│{}│", cells.join("│"))
}

fn print_table(out: &mut impl Write, title: &str, columns: &[Column], rows: &[Vec<String>]) {
    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(out, "{}", rule(columns, '┌', '┬', '┐'));
    let titles: Vec<&str> = columns.iter().map(|c| c.title).collect();
    let _ = writeln!(out, "{}", cells_line(columns, &titles));
    let _ = writeln!(out, "{}", rule(columns, '├', '┼', '┤'));
    for row in rows {
        let values: Vec<&str> = row.iter().map(String::as_str).collect();
        let _ = writeln!(out, "{}", cells_line(columns, &values));
    }
    let _ = writeln!(out, "{}", rule(columns, '└', '┴', '┘'));
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) {
    let key_w = 16usize;
    let sep_overhead = 6;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + sep_overhead);
    let columns = [left("Metric", key_w), right("Value", val_w)];
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|(k, v)| vec![k.to_string(), v.clone()])
        .collect();
    print_table(out, title, &columns, &rows);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut Vec<u8>)) -> String {
        let mut buf = Vec::new();
        f(&mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn table_rows_share_width() {
        let columns = [left("Code", 6), right("Value", 8)];
        let rows = vec![
            vec!["H2O".to_string(), "25.0000".to_string()],
            vec!["VeryLongCode".to_string(), "-".to_string()],
        ];
        let text = render(|out| print_table(out, "Test", &columns, &rows));
        let widths: Vec<usize> = text
            .lines()
            .skip(1)
            .map(|l| l.chars().count())
            .collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
        assert!(text.contains("VeryL…"));
    }

    #[test]
    fn pair_table_lists_temperatures_and_bond_length() {
        let values = vec![
            ("300.00".to_string(), Some(25.0)),
            ("350.00".to_string(), None),
        ];
        let text = render(|out| print_pair(out, "H2O", "OIL", &values, 4.8));
        assert!(text.contains("Pair H2O_OIL"));
        assert!(text.contains("25.0000"));
        assert!(text.contains("4.8000 Å"));
    }
}
