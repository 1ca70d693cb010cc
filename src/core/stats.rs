// Copyright @yucwang 2026

//! Render statistics.
//!
//! Workers count into their own [`ThreadStats`] while rendering; nothing is
//! shared on the hot path. After the join the renderer hands every worker's
//! counters to a [`StatsRegistry`], which sums them. The registry lives as
//! long as the renderer and must be cleared between renders.

use std::collections::BTreeMap;
use std::fmt;

pub const RAYS_TRACED: &str = "Integrator/Rays traced";
pub const CAMERA_RAYS: &str = "Integrator/Camera rays";
pub const SCATTERED_RAYS: &str = "Integrator/Scattered rays";
pub const ABSORBED_PATHS: &str = "Integrator/Absorbed paths";
pub const TRUNCATED_PATHS: &str = "Integrator/Depth-truncated paths";
pub const BACKGROUND_HITS: &str = "Integrator/Background hits";
pub const AVERAGE_PATH_LENGTH: &str = "Integrator/Average path length";
pub const PIXELS: &str = "Sampler/Pixels";
pub const SAMPLES_PER_PIXEL: &str = "Sampler/Samples per pixel";

/// Counters owned by a single worker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThreadStats {
    pub rays_traced: u64,
    pub camera_rays: u64,
    pub scattered_rays: u64,
    pub absorbed_paths: u64,
    pub depth_truncated_paths: u64,
    pub background_hits: u64,
    pub pixels: u64,
}

impl ThreadStats {
    pub fn merge(&mut self, other: &ThreadStats) {
        self.rays_traced += other.rays_traced;
        self.camera_rays += other.camera_rays;
        self.scattered_rays += other.scattered_rays;
        self.absorbed_paths += other.absorbed_paths;
        self.depth_truncated_paths += other.depth_truncated_paths;
        self.background_hits += other.background_hits;
        self.pixels += other.pixels;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatValue {
    Count(u64),
    Float(f64),
    Ratio { num: u64, den: u64 },
}

impl StatValue {
    pub fn merge(&mut self, other: &StatValue) {
        *self = match (*self, *other) {
            (StatValue::Count(a), StatValue::Count(b)) => StatValue::Count(a + b),
            (StatValue::Float(a), StatValue::Float(b)) => StatValue::Float(a + b),
            (StatValue::Ratio { num: a, den: b }, StatValue::Ratio { num: c, den: d }) => {
                StatValue::Ratio { num: a + c, den: b + d }
            }
            // Kinds never change for a given name; keep the newer value if they do.
            (_, newer) => newer,
        };
    }

    pub fn zeroed(&self) -> StatValue {
        match self {
            StatValue::Count(_) => StatValue::Count(0),
            StatValue::Float(_) => StatValue::Float(0.0),
            StatValue::Ratio { .. } => StatValue::Ratio { num: 0, den: 0 },
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            StatValue::Count(v) => *v == 0,
            StatValue::Float(v) => *v == 0.0,
            StatValue::Ratio { num, .. } => *num == 0,
        }
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Count(v) => write!(f, "{}", v),
            StatValue::Float(v) => write!(f, "{:.3}", v),
            StatValue::Ratio { num, den } => {
                let ratio = if *den == 0 { 0.0 } else { *num as f64 / *den as f64 };
                write!(f, "{:.3} ({} / {})", ratio, num, den)
            }
        }
    }
}

/// Named statistics keyed as `"Category/Name"`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsReport {
    entries: BTreeMap<String, StatValue>,
}

impl StatsReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: StatValue) {
        self.entries.insert(name.to_string(), value);
    }

    /// Adds `value` onto an existing entry, or creates it.
    pub fn add(&mut self, name: &str, value: StatValue) {
        match self.entries.get_mut(name) {
            Some(existing) => existing.merge(&value),
            None => {
                self.entries.insert(name.to_string(), value);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<StatValue> {
        self.entries.get(name).copied()
    }

    pub fn count(&self, name: &str) -> u64 {
        match self.entries.get(name) {
            Some(StatValue::Count(v)) => *v,
            _ => 0,
        }
    }

    pub fn merge(&mut self, other: &StatsReport) {
        for (name, value) in &other.entries {
            self.add(name, *value);
        }
    }

    pub fn clear(&mut self) {
        for value in self.entries.values_mut() {
            *value = value.zeroed();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<&ThreadStats> for StatsReport {
    fn from(stats: &ThreadStats) -> Self {
        let mut report = StatsReport::new();
        report.insert(RAYS_TRACED, StatValue::Count(stats.rays_traced));
        report.insert(CAMERA_RAYS, StatValue::Count(stats.camera_rays));
        report.insert(SCATTERED_RAYS, StatValue::Count(stats.scattered_rays));
        report.insert(ABSORBED_PATHS, StatValue::Count(stats.absorbed_paths));
        report.insert(TRUNCATED_PATHS, StatValue::Count(stats.depth_truncated_paths));
        report.insert(BACKGROUND_HITS, StatValue::Count(stats.background_hits));
        report.insert(AVERAGE_PATH_LENGTH,
                      StatValue::Ratio { num: stats.rays_traced, den: stats.camera_rays });
        report.insert(PIXELS, StatValue::Count(stats.pixels));
        report.insert(SAMPLES_PER_PIXEL,
                      StatValue::Ratio { num: stats.camera_rays, den: stats.pixels });
        report
    }
}

impl fmt::Display for StatsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Statistics:")?;
        let mut current_category: Option<&str> = None;
        for (key, value) in &self.entries {
            let (category, name) = key.split_once('/').unwrap_or(("General", key.as_str()));
            if current_category != Some(category) {
                writeln!(f, "  {}", category)?;
                current_category = Some(category);
            }
            writeln!(f, "    {:<28} {}", name, value)?;
        }
        Ok(())
    }
}

/// Process-scoped aggregate of all worker counters for one render.
#[derive(Debug, Default)]
pub struct StatsRegistry {
    totals: ThreadStats,
    extra: StatsReport,
}

impl StatsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sums the counters of every joined worker into the registry.
    pub fn accumulate_thread_stats<I>(&mut self, workers: I)
    where
        I: IntoIterator<Item = ThreadStats>,
    {
        for stats in workers {
            self.totals.merge(&stats);
        }
    }

    /// Records a value that is not a per-worker counter (e.g. wall time).
    pub fn record(&mut self, name: &str, value: StatValue) {
        self.extra.add(name, value);
    }

    pub fn totals(&self) -> &ThreadStats {
        &self.totals
    }

    pub fn report(&self) -> StatsReport {
        let mut report = StatsReport::from(&self.totals);
        report.merge(&self.extra);
        report
    }

    pub fn stats_report(&self) -> String {
        self.report().to_string()
    }

    pub fn clear_stats(&mut self) {
        self.totals = ThreadStats::default();
        self.extra.clear();
    }
}
