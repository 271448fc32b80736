//! Plain-text report and the numeric series a chart renderer consumes.

use std::fmt;

use serde::Serialize;

use crate::sweep::{Sweep, SweepKind};
use crate::trial::{Status, Trial};

const PLACEHOLDER: &str = "-";
const COLUMNS: [&str; 7] =
    ["", "Data (B)", "Enc Time (s)", "Dec Time (s)", "CPU (%)", "Mem (MB)", "Status"];

/// Ordered inputs for one chart: x values with their labels and the
/// matching encryption/decryption times. Only measured trials appear.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub title: String,
    pub x_label: String,
    pub labels: Vec<String>,
    /// Numeric parameter, or the declared position for file categories.
    pub x: Vec<f64>,
    pub encryption_secs: Vec<f64>,
    pub decryption_secs: Vec<f64>,
}

impl Sweep {
    pub fn chart_series(&self) -> ChartSeries {
        let mut series = ChartSeries {
            title: format!("Performance vs {}", self.kind().title()),
            x_label: self.kind().parameter_label().to_string(),
            labels: Vec::new(),
            x: Vec::new(),
            encryption_secs: Vec::new(),
            decryption_secs: Vec::new(),
        };
        for (idx, t) in self.trials().iter().enumerate() {
            let Some(m) = t.measurement() else { continue };
            series.labels.push(t.parameter().to_string());
            series.x.push(t.parameter().numeric().unwrap_or(idx as f64));
            series.encryption_secs.push(m.encryption.as_secs_f64());
            series.decryption_secs.push(m.decryption.as_secs_f64());
        }
        series
    }
}

/// The three sweeps of one run, in fixed order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    cipher: String,
    sweeps: Vec<Sweep>,
}

impl Report {
    pub fn new(cipher: impl Into<String>, sweeps: Vec<Sweep>) -> Self {
        Self { cipher: cipher.into(), sweeps }
    }

    pub fn cipher(&self) -> &str {
        &self.cipher
    }

    pub fn sweeps(&self) -> &[Sweep] {
        &self.sweeps
    }

    pub fn chart_series(&self) -> Vec<ChartSeries> {
        self.sweeps.iter().map(Sweep::chart_series).collect()
    }

    /// Trial count per status, in [`Status::ALL`] order.
    pub fn summary(&self) -> Vec<(Status, usize)> {
        Status::ALL
            .iter()
            .map(|&s| (s, self.sweeps.iter().map(|sw| sw.count(s)).sum()))
            .collect()
    }

    pub fn total_trials(&self) -> usize {
        self.sweeps.iter().map(|s| s.trials().len()).sum()
    }
}

fn row(t: &Trial) -> [String; 7] {
    let status = match t.detail() {
        Some(d) => format!("{} ({})", t.status(), d),
        None => t.status().to_string(),
    };
    let (enc, dec, cpu, mem) = match t.measurement() {
        Some(m) => (
            format!("{:.6}", m.encryption.as_secs_f64()),
            format!("{:.6}", m.decryption.as_secs_f64()),
            format!("{:.2}", m.cpu_percent),
            format!("{:.2}", m.memory_mb),
        ),
        None => (PLACEHOLDER.into(), PLACEHOLDER.into(), PLACEHOLDER.into(), PLACEHOLDER.into()),
    };
    [t.parameter().to_string(), t.payload_len().to_string(), enc, dec, cpu, mem, status]
}

fn write_section(f: &mut fmt::Formatter<'_>, n: usize, sweep: &Sweep) -> fmt::Result {
    writeln!(f, "[ Varying Condition {} ] {} (fixed {})", n, sweep.kind().title(), sweep.pinned())?;

    let mut header = COLUMNS.map(String::from);
    header[0] = sweep.kind().parameter_label().to_string();
    let rows: Vec<[String; 7]> = sweep.trials().iter().map(row).collect();

    let mut widths = header.clone().map(|h| h.len());
    for r in &rows {
        for (w, cell) in widths.iter_mut().zip(r.iter()) {
            *w = (*w).max(cell.len());
        }
    }

    for r in std::iter::once(&header).chain(rows.iter()) {
        let mut line = String::new();
        for (i, cell) in r.iter().enumerate() {
            if i + 1 == r.len() {
                line.push_str(cell);
            } else {
                line.push_str(&format!("{:<width$}  ", cell, width = widths[i]));
            }
        }
        writeln!(f, "{}", line.trim_end())?;
    }

    if sweep.kind() == SweepKind::KeyStrength {
        let keygen: Vec<String> = sweep
            .trials()
            .iter()
            .filter_map(|t| t.keygen().map(|d| format!("{}={:.4}", t.parameter(), d.as_secs_f64())))
            .collect();
        if !keygen.is_empty() {
            writeln!(f, "Key generation (s): {}", keygen.join("  "))?;
        }
    }
    Ok(())
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} performance report", self.cipher)?;
        for (i, sweep) in self.sweeps.iter().enumerate() {
            writeln!(f)?;
            write_section(f, i + 1, sweep)?;
        }
        writeln!(f)?;
        let counts: Vec<String> = self
            .summary()
            .into_iter()
            .filter(|(_, n)| *n > 0)
            .map(|(s, n)| format!("{} {}", n, s))
            .collect();
        writeln!(f, "Trials: {} total, {}", self.total_trials(), counts.join(", "))
    }
}
