//! Record sink: ordering, CSV output and the per-month summary.
use crate::error::MediaPlanError;
use crate::plan::InsertionRecord;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Sorts by date, channel, show and start time. Equal records keep their
/// sheet order.
pub fn sort_records(records: &mut [InsertionRecord]) {
    records.sort_by(|a, b| {
        (a.date, &a.channel, &a.show, &a.start_time).cmp(&(b.date, &b.channel, &b.show, &b.start_time))
    });
}

/// Writes the records as CSV with a `Canal,TV_Show,Data,Horario_inicial,Horario_final`
/// header row.
pub fn write_records<W: Write>(writer: W, records: &[InsertionRecord]) -> Result<(), MediaPlanError> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_csv(path: &Path, records: &[InsertionRecord]) -> Result<(), MediaPlanError> {
    let file = File::create(path)?;
    write_records(file, records)?;
    log::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Number of records per `YYYY-MM`, in calendar order.
pub fn month_summary(records: &[InsertionRecord]) -> BTreeMap<String, usize> {
    let mut summary = BTreeMap::new();
    for record in records {
        *summary.entry(record.date.format("%Y-%m").to_string()).or_insert(0) += 1;
    }
    summary
}
