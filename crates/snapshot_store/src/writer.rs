//! Result persistence: per-run CSV export and a daily-rotated JSONL
//! journal.

use std::fs::{create_dir_all, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use arb_core::{FamilyTable, Opportunity};
use chrono::Utc;
use common::Result;
use tracing::warn;

/// Writes evaluated opportunities to disk.
///
/// The CSV export is the per-run artifact people open in a spreadsheet;
/// the journal is the append-only history alerting and backtesting read.
#[derive(Debug)]
pub struct ResultWriter {
    dir: PathBuf,
    day_key: String,
    journal: File,
}

const CSV_HEADER: &str = "sport,family,event,market,outcome_a,outcome_b,odds_a,odds_b,arbitrage_percentage,is_arbitrage,stake_a,stake_b,profit_ratio,confidence";

fn csv_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

impl ResultWriter {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        create_dir_all(&dir)?;
        let day_key = Utc::now().format("%Y-%m-%d").to_string();
        let journal = Self::open_day_file(&dir, &day_key)?;
        Ok(Self { dir, day_key, journal })
    }

    fn open_day_file(dir: &Path, day_key: &str) -> std::io::Result<File> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(format!("results-{}.jsonl", day_key)))
    }

    fn rotate_if_needed(&mut self) -> std::io::Result<()> {
        let today = Utc::now().format("%Y-%m-%d").to_string();
        if today != self.day_key {
            self.journal = Self::open_day_file(&self.dir, &today)?;
            self.day_key = today;
        }
        Ok(())
    }

    /// Append opportunities to the daily journal. Write failures are
    /// logged, not propagated; journalling must never kill a run.
    pub fn journal(&mut self, opportunities: &[Opportunity]) {
        for opp in opportunities {
            let write_result = (|| -> std::io::Result<()> {
                self.rotate_if_needed()?;
                let line =
                    serde_json::to_string(opp).unwrap_or_else(|_| "{}".to_string());
                writeln!(self.journal, "{}", line)?;
                self.journal.flush()?;
                Ok(())
            })();
            if let Err(e) = write_result {
                warn!("result journal write failed: {}", e);
            }
        }
    }

    /// Write one run's opportunities as a timestamped CSV file and return
    /// its path.
    pub fn export_csv(&self, sport: &str, opportunities: &[Opportunity]) -> Result<PathBuf> {
        let stamp = Utc::now().format("%Y%m%dT%H%M%SZ");
        let path = self.dir.join(format!("arb-results-{}-{}.csv", sport, stamp));
        let mut out = String::with_capacity(opportunities.len() * 128 + CSV_HEADER.len());
        out.push_str(CSV_HEADER);
        out.push('\n');
        for o in opportunities {
            out.push_str(&format!(
                "{},{},{},{},{},{},{:.3},{:.3},{:.2},{},{:.2},{:.2},{:.4},{:.1}\n",
                csv_field(&o.sport),
                o.family,
                csv_field(&o.event_a),
                csv_field(&o.market),
                csv_field(&o.outcome_a),
                csv_field(&o.outcome_b),
                o.odds_a,
                o.odds_b,
                o.arbitrage_percentage,
                o.is_arbitrage,
                o.stake_a,
                o.stake_b,
                o.profit_ratio,
                o.confidence,
            ));
        }
        std::fs::write(&path, out)?;
        Ok(path)
    }

    /// Write one CSV per non-empty market family, alongside the combined
    /// export.
    pub fn export_family_csvs(
        &self,
        sport: &str,
        families: &[FamilyTable],
    ) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for table in families {
            if table.opportunities.is_empty() {
                continue;
            }
            let name = format!("{}-{}", sport, table.family.slug());
            paths.push(self.export_csv(&name, &table.opportunities)?);
        }
        Ok(paths)
    }
}
