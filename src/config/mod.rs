// ABOUTME: Run configuration assembled once from command-line flags.
// ABOUTME: Holds dry-run, age threshold, and disk usage display settings.

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};

/// Settings shared by every cleanup step of one invocation.
///
/// Built in `main` before any engine call and only ever read afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunConfig {
    /// Report candidates without deleting anything.
    pub dry_run: bool,
    /// Minimum age for image and build cache eligibility.
    pub older_than: AgeFilter,
    /// Print a disk usage snapshot before each step.
    pub show_size: bool,
}

impl RunConfig {
    pub fn new(dry_run: bool, older_than_days: u32, show_size: bool) -> Self {
        Self {
            dry_run,
            older_than: AgeFilter::days(older_than_days),
            show_size,
        }
    }
}

/// Age threshold in whole days; zero disables age filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgeFilter {
    days: u32,
}

impl AgeFilter {
    pub const DISABLED: AgeFilter = AgeFilter { days: 0 };

    pub fn days(days: u32) -> Self {
        Self { days }
    }

    pub fn as_days(&self) -> u32 {
        self.days
    }

    pub fn is_enabled(&self) -> bool {
        self.days > 0
    }

    /// Latest creation time an item may have and still be eligible.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if !self.is_enabled() {
            return None;
        }
        let cutoff = TimeDelta::try_days(i64::from(self.days))
            .and_then(|window| now.checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Some(cutoff)
    }

    /// Value for the engine's `until` prune filter.
    pub fn until_filter(&self, now: DateTime<Utc>) -> Option<String> {
        self.cutoff(now)
            .map(|cutoff| cutoff.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    /// Whether an item created at `created` is old enough to be removed.
    pub fn admits(&self, created: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self.cutoff(now) {
            Some(cutoff) => created <= cutoff,
            None => true,
        }
    }
}

impl std::fmt::Display for AgeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_enabled() {
            write!(f, "older than {} day(s)", self.days)
        } else {
            write!(f, "any age")
        }
    }
}
