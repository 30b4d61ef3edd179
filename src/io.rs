use crate::model::{NewStaff, ShiftGroup, WeekRow};
use crate::scheduler::time_range_label;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Import du personnel depuis CSV: header `full_name[,position][,unit][,phone][,email]`
pub fn import_staff_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<NewStaff>> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let mut out = Vec::new();
    for (line, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let name = rec.get(0).context("missing full_name")?.trim();
        if name.is_empty() {
            bail!("empty full_name on row {}", line + 2);
        }
        let opt = |idx: usize| {
            rec.get(idx)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        out.push(NewStaff {
            full_name: name.to_string(),
            position: opt(1),
            unit: opt(2),
            phone: opt(3),
            email: opt(4),
        });
    }
    Ok(out)
}

/// Nom de fichier d'export par défaut, ex. `schedule_20250901.csv`.
pub fn default_export_name(start: NaiveDate, ext: &str) -> String {
    format!("schedule_{}.{ext}", start.format("%Y%m%d"))
}

/// Export CSV d'une semaine: header `date,weekday,group_a,group_a_hours,group_b,group_b_hours`
pub fn export_week_csv<P: AsRef<Path>>(path: P, rows: &[WeekRow]) -> anyhow::Result<()> {
    write_atomic(path.as_ref(), |out| {
        let mut w = WriterBuilder::new().has_headers(true).from_writer(out);
        w.write_record([
            "date",
            "weekday",
            "group_a",
            "group_a_hours",
            "group_b",
            "group_b_hours",
        ])?;
        for row in rows {
            let date = row.date.format("%Y-%m-%d").to_string();
            let weekday = row.date.format("%a").to_string();
            let hours_a = time_range_label(row.date, ShiftGroup::GroupA);
            let hours_b = time_range_label(row.date, ShiftGroup::GroupB);
            w.write_record([
                date.as_str(),
                weekday.as_str(),
                row.group_a.as_deref().unwrap_or(""),
                hours_a.as_str(),
                row.group_b.as_deref().unwrap_or(""),
                hours_b.as_str(),
            ])?;
        }
        w.flush()?;
        Ok(())
    })
}

#[derive(Serialize)]
struct WeekExport<'a> {
    week_start: NaiveDate,
    rows: &'a [WeekRow],
}

/// Export JSON d'une semaine (jolie mise en forme)
pub fn export_week_json<P: AsRef<Path>>(
    path: P,
    start: NaiveDate,
    rows: &[WeekRow],
) -> anyhow::Result<()> {
    let json = serde_json::to_vec_pretty(&WeekExport {
        week_start: start,
        rows,
    })?;
    write_atomic(path.as_ref(), |out| Ok(out.write_all(&json)?))
}

/// Écrit dans un fichier temporaire du même dossier puis renomme.
fn write_atomic<F>(path: &Path, fill: F) -> anyhow::Result<()>
where
    F: FnOnce(&mut dyn Write) -> anyhow::Result<()>,
{
    let dir = match path.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
    fill(&mut tmp)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("atomic rename to {}", path.display()))?;
    Ok(())
}
