// src/loader.rs

use std::{collections::BTreeMap, fs::File, io::Read, path::Path};

use crate::record::Record;

/// Read a headered CSV file into records.
pub fn load_csv(path: &Path) -> Result<Vec<Record>, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let records = read_csv(file)?;
    tracing::info!(path = %path.display(), rows = records.len(), "loaded csv");
    Ok(records)
}

/// Parse CSV text with a header row. Short rows are padded with empty cells,
/// blank lines are skipped, and columns past the header are ignored. A header
/// that repeats keeps the cell of its first occurrence.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Record>, Box<dyn std::error::Error>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut out = Vec::new();
    for row in rdr.records() {
        let row = row?;
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let mut fields = BTreeMap::new();
        for (i, h) in headers.iter().enumerate() {
            fields
                .entry(h.clone())
                .or_insert_with(|| row.get(i).unwrap_or_default().to_string());
        }
        out.push(Record::new(fields));
    }
    Ok(out)
}
