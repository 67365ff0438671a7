// ABOUTME: Human-readable rendering of cleanup progress and results.
// ABOUTME: Titles, success and error lines, candidate listings, prune results, sizes.

use crate::cleanup::CleanupSummary;
use crate::runtime::{
    BuildCacheEntry, BuildCachePruneReport, Container, DiskUsage, Image, ImagePruneReport,
    Network, NetworkPruneReport, Volume, VolumePruneReport,
};
use crate::types::{ContainerId, short_id};
use owo_colors::{OwoColorize, Stream};
use std::fmt::Display;
use std::io::{self, Stdout, Write};

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;

/// Format a byte count with binary prefixes and two decimals.
///
/// Values below 1 KB are printed exactly: `format_size(500) == "500 B"`.
pub fn format_size(size: u64) -> String {
    match size {
        s if s >= GB => format!("{:.2} GB", s as f64 / GB as f64),
        s if s >= MB => format!("{:.2} MB", s as f64 / MB as f64),
        s if s >= KB => format!("{:.2} KB", s as f64 / KB as f64),
        s => format!("{s} B"),
    }
}

#[derive(Debug, Clone, Copy)]
enum Tone {
    Title,
    Success,
    Error,
}

/// Writes the cleanup report.
///
/// Writing to stdout colours titles yellow, successes green and errors red
/// when the terminal supports it. Any other writer gets plain text.
pub struct Reporter<W: Write> {
    out: W,
    color: bool,
}

impl Reporter<Stdout> {
    pub fn stdout() -> Self {
        Self {
            out: io::stdout(),
            color: true,
        }
    }
}

impl<W: Write> Reporter<W> {
    /// Plain-text reporter over any writer.
    pub fn new(out: W) -> Self {
        Self { out, color: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, text: &str, tone: Tone) -> String {
        if !self.color {
            return text.to_string();
        }
        match tone {
            Tone::Title => text
                .if_supports_color(Stream::Stdout, |t| t.yellow())
                .to_string(),
            Tone::Success => text
                .if_supports_color(Stream::Stdout, |t| t.green())
                .to_string(),
            Tone::Error => text
                .if_supports_color(Stream::Stdout, |t| t.red())
                .to_string(),
        }
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            tracing::debug!(error = %e, "failed to write report line");
        }
    }

    fn item(&mut self, text: &str) {
        self.line(&format!(" - {text}"));
    }

    pub fn blank(&mut self) {
        self.line("");
    }

    pub fn title(&mut self, title: &str) {
        let painted = self.paint(title, Tone::Title);
        self.line(&painted);
    }

    pub fn success(&mut self, message: &str) {
        let painted = self.paint(message, Tone::Success);
        self.line(&painted);
    }

    pub fn error(&mut self, err: &dyn Display) {
        let painted = self.paint(&format!("Error: {err}"), Tone::Error);
        self.line(&painted);
    }

    pub fn disk_usage(&mut self, usage: &DiskUsage) {
        self.title("Current Docker disk usage:");
        self.line(&format!("Containers : {}", usage.containers.count));
        self.line(&format!("Images     : {}", usage.images.count));
        self.line(&format!("Volumes    : {}", usage.volumes.count));
        self.line(&format!("Builds     : {}", usage.build_cache.count));
        self.line(&format!("Total size: {}", format_size(usage.total_size())));
        self.blank();
    }

    pub fn stopped_containers(&mut self, containers: &[Container], dry_run: bool) {
        if containers.is_empty() {
            self.success("No stopped containers to remove.");
            return;
        }

        self.line(&format!("Found {} containers to remove.", containers.len()));

        if dry_run {
            self.title("[DRY RUN] The following containers would be removed:");
            for container in containers {
                self.item(&format!(
                    "{} ({})",
                    container.id.short(),
                    container.display_names()
                ));
            }
        }
    }

    pub fn container_removed(&mut self, container: &Container) {
        self.success(&format!(
            "Container removed: {} ({})",
            container.id.short(),
            container.display_names()
        ));
    }

    pub fn container_vanished(&mut self, id: &ContainerId) {
        self.line(&format!("Container {} no longer exists; skipped.", id.short()));
    }

    pub fn containers_cleanup_complete(&mut self) {
        self.success("Stopped containers successfully removed.");
    }

    /// Dry-run listing of images; `label` is "unused" or "dangling".
    pub fn image_candidates(&mut self, images: &[Image], label: &str) {
        if images.is_empty() {
            self.success(&format!("No {label} images to remove."));
            return;
        }

        self.title(&format!(
            "[DRY RUN] The following {label} images would be removed:"
        ));
        for image in images {
            self.item(&format!("{} ({})", image.id.short(), image.display_tags()));
        }
    }

    pub fn image_prune_result(&mut self, report: &ImagePruneReport, label: &str) {
        if report.images_deleted.is_empty() {
            self.success(&format!("No {label} images to remove."));
            return;
        }

        for deletion in &report.images_deleted {
            if let Some(untagged) = &deletion.untagged {
                self.success(&format!("Image untagged: {untagged}"));
            }
            if let Some(deleted) = &deletion.deleted {
                self.success(&format!("Image deleted: {}", short_id(deleted)));
            }
        }
        self.success(&format!(
            "{} images successfully removed. Space reclaimed: {}",
            capitalize(label),
            format_size(report.space_reclaimed)
        ));
    }

    pub fn volume_candidates(&mut self, volumes: &[Volume]) {
        if volumes.is_empty() {
            self.success("No unused volumes to remove.");
            return;
        }

        self.title("[DRY RUN] The following volumes would be removed:");
        for volume in volumes {
            match volume.size {
                Some(size) => self.item(&format!("{} ({})", volume.name, format_size(size))),
                None => self.item(&volume.name),
            }
        }
    }

    pub fn volume_prune_result(&mut self, report: &VolumePruneReport) {
        if report.volumes_deleted.is_empty() {
            self.success("No unused volumes to remove.");
            return;
        }

        for volume in &report.volumes_deleted {
            self.success(&format!("Volume deleted: {volume}"));
        }
        self.success(&format!(
            "Unused volumes successfully removed. Space reclaimed: {}",
            format_size(report.space_reclaimed)
        ));
    }

    pub fn network_candidates(&mut self, networks: &[Network]) {
        if networks.is_empty() {
            self.success("No unused networks to remove.");
            return;
        }

        self.title("[DRY RUN] The following networks would be removed:");
        for network in networks {
            self.item(&format!("{} ({})", network.name, network.id.short()));
        }
    }

    pub fn network_prune_result(&mut self, report: &NetworkPruneReport) {
        if report.networks_deleted.is_empty() {
            self.success("No unused networks to remove.");
            return;
        }

        for network in &report.networks_deleted {
            self.success(&format!("Network deleted: {network}"));
        }
        self.success("Unused networks successfully removed.");
    }

    pub fn build_cache_candidates(&mut self, entries: &[BuildCacheEntry]) {
        if entries.is_empty() {
            self.success("No unused build cache to remove.");
            return;
        }

        self.title(&format!(
            "[DRY RUN] The following build cache entries would be removed ({}):",
            entries.len()
        ));
        for entry in entries {
            self.item(&format!(
                "{}: {} ({})",
                entry.id.short(),
                entry.description,
                format_size(entry.size)
            ));
        }
    }

    pub fn build_cache_prune_result(&mut self, report: &BuildCachePruneReport) {
        if report.caches_deleted.is_empty() {
            self.success("No unused build cache to remove.");
            return;
        }

        for id in &report.caches_deleted {
            self.success(&format!("Build cache deleted: {}", short_id(id)));
        }
        self.success(&format!(
            "Unused build cache successfully removed. Space reclaimed: {}",
            format_size(report.space_reclaimed)
        ));
    }

    pub fn cleanup_complete(&mut self, summary: &CleanupSummary) {
        self.blank();
        if summary.is_clean() {
            self.success("Global cleanup completed successfully!");
        } else {
            let painted = self.paint(
                &format!(
                    "Global cleanup completed with {} failed step(s) and {} failed removal(s).",
                    summary.failed_steps().len(),
                    summary.removal_failures()
                ),
                Tone::Error,
            );
            self.line(&painted);
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
