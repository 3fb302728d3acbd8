use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::{CellValue, MethodCatalog};

/// Write the records at `indices` as CSV, columns in catalogue order.
/// Null cells are written empty.
pub fn write_csv<W: Write>(writer: W, catalog: &MethodCatalog, indices: &[usize]) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(&catalog.column_names)
        .context("writing CSV header")?;

    for rec in catalog.select(indices) {
        let row = catalog.column_names.iter().map(|col| match rec.get(col) {
            CellValue::Null => String::new(),
            other => other.to_string(),
        });
        out.write_record(row).context("writing CSV row")?;
    }
    out.flush().context("flushing CSV")?;
    Ok(())
}

/// Export the visible methods to a CSV file.
pub fn save_csv(path: &Path, catalog: &MethodCatalog, indices: &[usize]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(file, catalog, indices)?;
    log::info!("Exported {} method(s) to {}", indices.len(), path.display());
    Ok(())
}

/// Save a rendered Sankey fragment as a standalone HTML page.
pub fn save_sankey_html(path: &Path, fragment: &str) -> Result<()> {
    let page = format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\" /></head>\n<body>\n{fragment}</body>\n</html>\n"
    );
    std::fs::write(path, page).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Saved Sankey diagram to {}", path.display());
    Ok(())
}
