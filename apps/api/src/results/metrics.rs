use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use tracing::warn;

use crate::errors::AppError;
use crate::results::repository::{MetricsInputs, PostRepository};

/// Day names indexed by day number - 1 (1 = Sunday .. 7 = Saturday).
pub const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Post counts per weekday. Always carries all seven days and serializes them as a
/// map in Sunday-first order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeeklyVolume([i64; 7]);

impl WeeklyVolume {
    /// Adds `count` to the day numbered `day_num` (1 = Sunday .. 7 = Saturday).
    pub fn add(&mut self, day_num: i32, count: i64) {
        match usize::try_from(day_num - 1).ok().and_then(|i| self.0.get_mut(i)) {
            Some(slot) => *slot += count,
            None => warn!("Discarding weekday bucket with day number {day_num}"),
        }
    }
}

impl Serialize for WeeklyVolume {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(WEEKDAY_NAMES.len()))?;
        for (name, count) in WEEKDAY_NAMES.iter().zip(self.0.iter()) {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub total_extracted: i64,
    pub total_profiles: i64,
    pub avg_engagement: f64,
    pub platform_distribution: BTreeMap<String, i64>,
    pub weekly_volume: WeeklyVolume,
}

/// `GET /metrics`: aggregates over every stored post, weekly volume over the seven
/// days ending at `now`.
pub async fn compute_metrics(
    repo: &dyn PostRepository,
    now: DateTime<Utc>,
) -> Result<MetricsReport, AppError> {
    let inputs = repo.metrics_inputs(now - Duration::days(7), now).await?;
    Ok(build_report(inputs))
}

pub fn build_report(inputs: MetricsInputs) -> MetricsReport {
    let mut weekly_volume = WeeklyVolume::default();
    for (day_num, count) in inputs.weekday_counts {
        weekly_volume.add(day_num, count);
    }

    MetricsReport {
        total_extracted: inputs.total_posts,
        total_profiles: inputs.distinct_profiles,
        avg_engagement: round_2(inputs.avg_engagement.unwrap_or(0.0)),
        platform_distribution: inputs.platform_counts.into_iter().collect(),
        weekly_volume,
    }
}

fn round_2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
