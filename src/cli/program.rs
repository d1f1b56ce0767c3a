use std::path::Path;

use serde::Deserialize;

use crate::store::Store;
use crate::types::Program;

use super::init_store;

#[derive(Debug, Deserialize)]
struct ProgramRow {
    universitas: String,
    prodi: String,
}

/// Reads `universitas,prodi` rows. Blank rows are skipped.
fn read_programs(path: &Path) -> anyhow::Result<Vec<Program>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;

    let mut programs = Vec::new();
    for (index, row) in reader.deserialize::<ProgramRow>().enumerate() {
        // Header is line 1.
        let row = row.map_err(|e| anyhow::anyhow!("line {}: {e}", index + 2))?;
        if row.universitas.is_empty() || row.prodi.is_empty() {
            continue;
        }
        programs.push(Program {
            name: row.prodi,
            university_name: row.universitas,
        });
    }
    Ok(programs)
}

pub fn run_program_import(data_dir: String, file: &Path) -> anyhow::Result<()> {
    let store = init_store(&data_dir)?;
    let programs = read_programs(file)?;

    let mut inserted = 0;
    for program in &programs {
        if store.upsert_program(program)? {
            inserted += 1;
        }
    }

    tracing::info!(rows = programs.len(), inserted, "imported programs");
    println!(
        "Imported {inserted} new program(s) ({} already present)",
        programs.len() - inserted
    );
    Ok(())
}
