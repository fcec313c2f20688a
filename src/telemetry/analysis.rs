//! Per-column summary statistics for a telemetry table.

use std::collections::HashSet;

use serde_json::Value;

use super::{Column, Table};

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Sample standard deviation.
    pub std: f64,
    /// Adjusted Fisher-Pearson skewness; NaN below three samples.
    pub skew: f64,
    /// Bias-corrected excess kurtosis; NaN below four samples.
    pub kurtosis: f64,
    pub unique: usize,
}

impl ColumnStats {
    /// `None` for columns that are empty or hold anything besides numbers and nulls.
    pub fn from_column(column: &Column) -> Option<Self> {
        let samples = numeric_samples(&column.values)?;
        let n = samples.len() as f64;

        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = samples.iter().sum::<f64>() / n;

        let (mut s2, mut s3, mut s4) = (0.0, 0.0, 0.0);
        for x in &samples {
            let d = x - mean;
            s2 += d * d;
            s3 += d * d * d;
            s4 += d * d * d * d;
        }

        let std = if n < 2.0 { f64::NAN } else { (s2 / (n - 1.0)).sqrt() };
        let skew = if n < 3.0 {
            f64::NAN
        } else if s2 == 0.0 {
            0.0
        } else {
            let (m2, m3) = (s2 / n, s3 / n);
            (n * (n - 1.0)).sqrt() / (n - 2.0) * m3 / m2.powf(1.5)
        };
        let kurtosis = if n < 4.0 {
            f64::NAN
        } else if s2 == 0.0 {
            0.0
        } else {
            let numer = n * (n + 1.0) * (n - 1.0) * s4;
            let denom = (n - 2.0) * (n - 3.0) * s2 * s2;
            let adj = 3.0 * (n - 1.0).powi(2) / ((n - 2.0) * (n - 3.0));
            numer / denom - adj
        };

        let unique = samples.iter().map(|x| x.to_bits()).collect::<HashSet<_>>().len();

        Some(Self { name: column.name.clone(), min, max, mean, std, skew, kurtosis, unique })
    }

    pub fn notes(&self) -> Vec<&'static str> {
        let mut notes = Vec::new();
        if self.unique == 1 {
            notes.push("constant");
        } else if self.std > 2.0 * self.mean.abs() {
            notes.push("high variance");
        } else if self.std == 0.0 {
            notes.push("no variation");
        }
        if self.skew.abs() > 2.0 {
            notes.push("strongly skewed");
        }
        if self.kurtosis.abs() > 10.0 {
            notes.push("peaked or heavy tails");
        }
        notes
    }

    fn summary_line(&self) -> String {
        let mut line = format!(
            "- **{}**: min={:.2}, max={:.2}, mean={:.2}, std={:.2}, skew={:.2}, kurtosis={:.2}, unique={}",
            self.name, self.min, self.max, self.mean, self.std, self.skew, self.kurtosis, self.unique
        );
        let notes = self.notes();
        if !notes.is_empty() {
            line.push_str(&format!(" — _{}_", notes.join(" | ")));
        }
        line
    }
}

fn numeric_samples(values: &[Value]) -> Option<Vec<f64>> {
    let mut samples = Vec::with_capacity(values.len());
    for value in values {
        match value {
            Value::Null => {}
            Value::Number(n) => samples.push(n.as_f64()?),
            _ => return None,
        }
    }
    (!samples.is_empty()).then_some(samples)
}

/// Markdown summary of every numeric column in `table`.
pub fn analyse(table: &Table) -> String {
    let stats: Vec<ColumnStats> = table.columns().iter().filter_map(ColumnStats::from_column).collect();
    if stats.is_empty() {
        return format!("Table {} has no numeric telemetry data.", table.name());
    }

    let mut lines = vec![format!("Summary of `{}` Table\n", table.name())];
    lines.extend(stats.iter().map(ColumnStats::summary_line));
    lines.join("\n")
}
