//! Per-category metrics: plain counts, counts with sub-category breakdown, and duration statistics.

use std::collections::BTreeMap;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// A value accumulated per category inside a bucket.
///
/// `record` is called once per ingested record; `finalize` runs exactly once,
/// after the last record, before the report becomes readable.
pub trait Metric: Default + Serialize {
    type Sample: Clone;

    /// Column names for CSV output, after the datacenter/rack/category columns.
    const CSV_COLUMNS: &'static [&'static str];

    fn record(&mut self, sample: Self::Sample);

    fn finalize(&mut self) {}

    /// Number of records that contributed to this metric
    fn count(&self) -> u64;

    /// One-line text rendering
    fn summary(&self) -> String;

    /// Extra indented lines shown below the summary line
    fn details(&self) -> Vec<String> {
        Vec::new()
    }

    fn csv_fields(&self) -> Vec<String>;
}

/// Occurrence count
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Count(pub u64);

impl Metric for Count {
    type Sample = ();

    const CSV_COLUMNS: &'static [&'static str] = &["count"];

    fn record(&mut self, _sample: ()) {
        self.0 += 1;
    }

    fn count(&self) -> u64 {
        self.0
    }

    fn summary(&self) -> String {
        self.0.to_string()
    }

    fn csv_fields(&self) -> Vec<String> {
        vec![self.0.to_string()]
    }
}

/// Optional second-tier keys for a [`Breakdown`] record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreakdownSample {
    pub subcategory: Option<String>,
    pub vendor: Option<String>,
    /// Hardware product label of the failing device
    pub platform: Option<String>,
}

/// Count plus optional per-sub-category, per-vendor and per-platform counts.
///
/// Serializes as a bare number when no tier was populated, so records
/// without any second-tier key keep the `category: count` shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Breakdown {
    pub count: u64,
    pub subcategories: BTreeMap<String, u64>,
    pub vendors: BTreeMap<String, u64>,
    pub platforms: BTreeMap<String, u64>,
}

impl Metric for Breakdown {
    type Sample = BreakdownSample;

    const CSV_COLUMNS: &'static [&'static str] = &["count"];

    fn record(&mut self, sample: BreakdownSample) {
        self.count += 1;
        if let Some(sub) = sample.subcategory {
            *self.subcategories.entry(sub).or_insert(0) += 1;
        }
        if let Some(vendor) = sample.vendor {
            *self.vendors.entry(vendor).or_insert(0) += 1;
        }
        if let Some(platform) = sample.platform {
            *self.platforms.entry(platform).or_insert(0) += 1;
        }
    }

    fn count(&self) -> u64 {
        self.count
    }

    fn summary(&self) -> String {
        self.count.to_string()
    }

    fn details(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .subcategories
            .iter()
            .map(|(name, count)| format!("- {}: {}", name, count))
            .collect();
        if !self.vendors.is_empty() {
            let vendors: Vec<String> = self
                .vendors
                .iter()
                .map(|(name, count)| format!("{} ({})", name, count))
                .collect();
            lines.push(format!("vendors: {}", vendors.join(", ")));
        }
        if !self.platforms.is_empty() {
            let platforms: Vec<String> = self
                .platforms
                .iter()
                .map(|(name, count)| format!("{} ({})", name, count))
                .collect();
            lines.push(format!("platforms: {}", platforms.join(", ")));
        }
        lines
    }

    fn csv_fields(&self) -> Vec<String> {
        vec![self.count.to_string()]
    }
}

impl Serialize for Breakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.subcategories.is_empty() && self.vendors.is_empty() && self.platforms.is_empty() {
            return serializer.serialize_u64(self.count);
        }
        let mut state = serializer.serialize_struct("Breakdown", 4)?;
        state.serialize_field("count", &self.count)?;
        if self.subcategories.is_empty() {
            state.skip_field("subcategories")?;
        } else {
            state.serialize_field("subcategories", &self.subcategories)?;
        }
        if self.vendors.is_empty() {
            state.skip_field("vendors")?;
        } else {
            state.serialize_field("vendors", &self.vendors)?;
        }
        if self.platforms.is_empty() {
            state.skip_field("platforms")?;
        } else {
            state.serialize_field("platforms", &self.platforms)?;
        }
        state.end()
    }
}

/// Duration samples (seconds) with mean/median derived in `finalize`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Timing {
    #[serde(skip)]
    samples: Vec<f64>,
    pub count: u64,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

impl Timing {
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }
}

impl Metric for Timing {
    type Sample = f64;

    const CSV_COLUMNS: &'static [&'static str] = &["count", "mean_seconds", "median_seconds"];

    fn record(&mut self, seconds: f64) {
        self.samples.push(seconds);
        self.count += 1;
    }

    fn finalize(&mut self) {
        if self.samples.is_empty() {
            self.mean = None;
            self.median = None;
            return;
        }
        self.samples.sort_by(|a, b| a.total_cmp(b));
        self.mean = Some(mean(&self.samples));
        self.median = Some(median_of_sorted(&self.samples));
    }

    fn count(&self) -> u64 {
        self.count
    }

    fn summary(&self) -> String {
        format!(
            "{} (mean {}, median {})",
            self.count,
            self.mean.map(format_duration).unwrap_or_else(|| "-".to_string()),
            self.median.map(format_duration).unwrap_or_else(|| "-".to_string()),
        )
    }

    fn csv_fields(&self) -> Vec<String> {
        vec![
            self.count.to_string(),
            self.mean.map(|m| format!("{:.0}", m)).unwrap_or_default(),
            self.median.map(|m| format!("{:.0}", m)).unwrap_or_default(),
        ]
    }
}

fn mean(samples: &[f64]) -> f64 {
    samples.iter().sum::<f64>() / samples.len() as f64
}

fn median_of_sorted(samples: &[f64]) -> f64 {
    let mid = samples.len() / 2;
    if samples.len() % 2 == 0 {
        (samples[mid - 1] + samples[mid]) / 2.0
    } else {
        samples[mid]
    }
}

/// Render seconds as `1d 02h 03m 04s`, dropping leading zero units.
pub fn format_duration(seconds: f64) -> String {
    let duration = chrono::Duration::seconds(seconds.round() as i64);
    let days = duration.num_days();
    let hours = duration.num_hours() % 24;
    let minutes = duration.num_minutes() % 60;
    let secs = duration.num_seconds() % 60;

    if days > 0 {
        format!("{}d {:02}h {:02}m {:02}s", days, hours, minutes, secs)
    } else if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {:02}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_records() {
        let mut count = Count::default();
        count.record(());
        count.record(());
        assert_eq!(count.count(), 2);
        assert_eq!(serde_json::to_value(count).unwrap(), serde_json::json!(2));
    }

    #[test]
    fn test_timing_without_samples_has_no_stats() {
        let mut timing = Timing::default();
        timing.finalize();
        assert_eq!(timing.count, 0);
        assert!(timing.mean.is_none());
        assert!(timing.median.is_none());
        assert_eq!(timing.summary(), "0 (mean -, median -)");
        assert_eq!(timing.csv_fields(), vec!["0", "", ""]);
    }

    #[test]
    fn test_timing_odd_sample_count() {
        let mut timing = Timing::default();
        for s in [300.0, 60.0, 120.0] {
            timing.record(s);
        }
        timing.finalize();
        assert_eq!(timing.mean, Some(160.0));
        assert_eq!(timing.median, Some(120.0));
        assert_eq!(timing.samples(), &[60.0, 120.0, 300.0]);
    }

    #[test]
    fn test_timing_even_sample_count() {
        let mut timing = Timing::default();
        for s in [10.0, 40.0, 20.0, 30.0] {
            timing.record(s);
        }
        timing.finalize();
        assert_eq!(timing.mean, Some(25.0));
        assert_eq!(timing.median, Some(25.0));
    }

    #[test]
    fn test_timing_serializes_without_samples() {
        let mut timing = Timing::default();
        timing.record(90.0);
        timing.finalize();
        let value = serde_json::to_value(&timing).unwrap();
        assert_eq!(value, serde_json::json!({"count": 1, "mean": 90.0, "median": 90.0}));
    }

    #[test]
    fn test_breakdown_plain_serializes_as_number() {
        let mut breakdown = Breakdown::default();
        breakdown.record(BreakdownSample::default());
        assert_eq!(serde_json::to_value(&breakdown).unwrap(), serde_json::json!(1));
    }

    #[test]
    fn test_breakdown_with_tiers() {
        let mut breakdown = Breakdown::default();
        breakdown.record(BreakdownSample {
            subcategory: Some("dimm-0".to_string()),
            vendor: Some("Dell".to_string()),
            platform: Some("CP-1".to_string()),
        });
        breakdown.record(BreakdownSample {
            subcategory: Some("dimm-0".to_string()),
            vendor: None,
            platform: Some("CP-1".to_string()),
        });
        let value = serde_json::to_value(&breakdown).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "count": 2,
                "subcategories": {"dimm-0": 2},
                "vendors": {"Dell": 1},
                "platforms": {"CP-1": 2}
            })
        );
        assert_eq!(
            breakdown.details(),
            vec!["- dimm-0: 2", "vendors: Dell (1)", "platforms: CP-1 (2)"]
        );
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(42.0), "42s");
        assert_eq!(format_duration(125.0), "2m 05s");
        assert_eq!(format_duration(3723.0), "1h 02m 03s");
        assert_eq!(format_duration(93784.0), "1d 02h 03m 04s");
    }
}
