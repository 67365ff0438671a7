// ABOUTME: Cleanup orchestration, one procedure per resource kind plus "all".
// ABOUTME: Applies dry-run and age policy, drives the gateway, and reports every outcome.

mod error;
pub mod usage;

pub use error::{CleanupError, CleanupErrorKind};

use crate::config::{AgeFilter, RunConfig};
use crate::output::Reporter;
use crate::runtime::{Container, FullRuntime, RuntimeError};
use crate::types::ContainerId;
use chrono::Utc;
use error::{DiskUsageSnafu, InspectSnafu, PruneSnafu, QuerySnafu, RemovalSnafu};
use snafu::ResultExt;
use std::collections::HashSet;
use std::io::Write;

/// Kinds of resources a cleanup step handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Containers,
    DanglingImages,
    Images,
    Volumes,
    Networks,
    BuildCache,
}

impl ResourceKind {
    /// Order in which the "all" procedure runs the steps.
    pub const CLEANUP_ORDER: [ResourceKind; 6] = [
        ResourceKind::Containers,
        ResourceKind::DanglingImages,
        ResourceKind::Images,
        ResourceKind::Volumes,
        ResourceKind::Networks,
        ResourceKind::BuildCache,
    ];
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResourceKind::Containers => "containers",
            ResourceKind::DanglingImages => "dangling images",
            ResourceKind::Images => "images",
            ResourceKind::Volumes => "volumes",
            ResourceKind::Networks => "networks",
            ResourceKind::BuildCache => "build cache",
        };
        f.write_str(name)
    }
}

/// What a single invocation cleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Only(ResourceKind),
    All,
}

/// A reported error and the step it happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Failure {
    pub step: ResourceKind,
    pub kind: CleanupErrorKind,
}

/// Outcome of a cleanup run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupSummary {
    /// Steps that ran, in order.
    pub attempted: Vec<ResourceKind>,
    /// Every reported error, in order.
    pub failures: Vec<Failure>,
}

impl CleanupSummary {
    /// Steps that were abandoned because of an error.
    pub fn failed_steps(&self) -> Vec<ResourceKind> {
        self.failures
            .iter()
            .filter(|f| f.kind.aborts_step())
            .map(|f| f.step)
            .collect()
    }

    /// Individual container removals that failed.
    pub fn removal_failures(&self) -> usize {
        self.failures
            .iter()
            .filter(|f| f.kind == CleanupErrorKind::RemovalFailure)
            .count()
    }

    /// No step was abandoned and no removal failed. Disk usage snapshots do not count.
    pub fn is_clean(&self) -> bool {
        self.failed_steps().is_empty() && self.removal_failures() == 0
    }
}

/// Runs cleanup procedures against a runtime and reports to a [`Reporter`].
///
/// Steps run one at a time. A failing step is reported and ends only that step.
pub struct Cleaner<'a, R, W: Write> {
    runtime: &'a R,
    config: RunConfig,
    reporter: Reporter<W>,
    failures: Vec<Failure>,
}

impl<'a, R: FullRuntime, W: Write> Cleaner<'a, R, W> {
    pub fn new(runtime: &'a R, config: RunConfig, reporter: Reporter<W>) -> Self {
        Self {
            runtime,
            config,
            reporter,
            failures: Vec::new(),
        }
    }

    pub fn into_reporter(self) -> Reporter<W> {
        self.reporter
    }

    /// Run the requested target and summarize what happened.
    pub async fn run(&mut self, target: Target) -> CleanupSummary {
        match target {
            Target::All => self.all().await,
            Target::Only(kind) => {
                // The error is already reported and recorded
                let _ = self.step(kind).await;
                CleanupSummary {
                    attempted: vec![kind],
                    failures: std::mem::take(&mut self.failures),
                }
            }
        }
    }

    /// Run every step in [`ResourceKind::CLEANUP_ORDER`], whatever the earlier ones did.
    pub async fn all(&mut self) -> CleanupSummary {
        let mut summary = CleanupSummary::default();

        for (index, kind) in ResourceKind::CLEANUP_ORDER.into_iter().enumerate() {
            if index > 0 {
                self.reporter.blank();
            }
            let _ = self.step(kind).await;
            summary.attempted.push(kind);
        }

        summary.failures = std::mem::take(&mut self.failures);
        self.reporter.cleanup_complete(&summary);
        summary
    }

    pub async fn step(&mut self, kind: ResourceKind) -> Result<(), CleanupError> {
        match kind {
            ResourceKind::Containers => self.containers().await,
            ResourceKind::DanglingImages => self.dangling_images().await,
            ResourceKind::Images => self.images().await,
            ResourceKind::Volumes => self.volumes().await,
            ResourceKind::Networks => self.networks().await,
            ResourceKind::BuildCache => self.build_cache().await,
        }
    }

    pub async fn containers(&mut self) -> Result<(), CleanupError> {
        self.show_disk_usage(ResourceKind::Containers).await;
        self.reporter.title("Removing stopped containers...");
        let result = self.remove_stopped_containers().await;
        self.reported(ResourceKind::Containers, result)
    }

    pub async fn dangling_images(&mut self) -> Result<(), CleanupError> {
        self.show_disk_usage(ResourceKind::DanglingImages).await;
        self.reporter.title("Removing dangling images...");
        let result = self.clean_dangling_images().await;
        self.reported(ResourceKind::DanglingImages, result)
    }

    pub async fn images(&mut self) -> Result<(), CleanupError> {
        self.show_disk_usage(ResourceKind::Images).await;
        self.reporter.title("Removing unused images...");
        let result = self.clean_unused_images().await;
        self.reported(ResourceKind::Images, result)
    }

    pub async fn volumes(&mut self) -> Result<(), CleanupError> {
        self.show_disk_usage(ResourceKind::Volumes).await;
        self.reporter.title("Removing unused volumes...");
        let result = self.clean_volumes().await;
        self.reported(ResourceKind::Volumes, result)
    }

    pub async fn networks(&mut self) -> Result<(), CleanupError> {
        self.show_disk_usage(ResourceKind::Networks).await;
        self.reporter.title("Removing unused networks...");
        let result = self.clean_networks().await;
        self.reported(ResourceKind::Networks, result)
    }

    pub async fn build_cache(&mut self) -> Result<(), CleanupError> {
        self.show_disk_usage(ResourceKind::BuildCache).await;
        self.reporter.title("Removing unused build cache...");
        let result = self.clean_build_cache().await;
        self.reported(ResourceKind::BuildCache, result)
    }

    fn reported(
        &mut self,
        kind: ResourceKind,
        result: Result<(), CleanupError>,
    ) -> Result<(), CleanupError> {
        if let Err(e) = &result {
            tracing::warn!(%kind, error = %e, "cleanup step failed");
            self.report_failure(kind, e);
        }
        result
    }

    fn report_failure(&mut self, step: ResourceKind, error: &CleanupError) {
        self.reporter.error(error);
        self.failures.push(Failure {
            step,
            kind: error.kind(),
        });
    }

    /// Best effort: a failure is reported and the step carries on.
    async fn show_disk_usage(&mut self, step: ResourceKind) {
        if !self.config.show_size {
            return;
        }
        match self.runtime.disk_usage().await.context(DiskUsageSnafu) {
            Ok(usage) => self.reporter.disk_usage(&usage),
            Err(e) => {
                tracing::warn!(error = %e, "disk usage unavailable");
                self.report_failure(step, &e);
            }
        }
    }

    async fn remove_stopped_containers(&mut self) -> Result<(), CleanupError> {
        let containers = self
            .runtime
            .list_stopped_containers()
            .await
            .context(QuerySnafu {
                kind: ResourceKind::Containers,
            })?;

        self.reporter
            .stopped_containers(&containers, self.config.dry_run);

        if self.config.dry_run || containers.is_empty() {
            return Ok(());
        }

        for container in &containers {
            self.remove_container(container).await;
        }
        self.reporter.containers_cleanup_complete();
        Ok(())
    }

    async fn remove_container(&mut self, container: &Container) {
        let result = self
            .runtime
            .remove_container(&container.id)
            .await
            .context(RemovalSnafu {
                container: container.id.short(),
            });

        match result {
            Ok(()) => self.reporter.container_removed(container),
            Err(e) => {
                tracing::warn!(container = %container.id, error = %e, "container removal failed");
                self.report_failure(ResourceKind::Containers, &e);
            }
        }
    }

    async fn clean_dangling_images(&mut self) -> Result<(), CleanupError> {
        let kind = ResourceKind::DanglingImages;

        if self.config.dry_run {
            let images = self
                .runtime
                .list_dangling_images()
                .await
                .context(QuerySnafu { kind })?;
            let containers = self.all_containers(kind).await?;
            // Prune skips dangling images a container still references
            let candidates = usage::unused_images(
                images,
                &containers,
                AgeFilter::DISABLED,
                Utc::now(),
            );
            self.reporter.image_candidates(&candidates, "dangling");
        } else {
            let report = self
                .runtime
                .prune_dangling_images()
                .await
                .context(PruneSnafu { kind })?;
            self.reporter.image_prune_result(&report, "dangling");
        }
        Ok(())
    }

    async fn clean_unused_images(&mut self) -> Result<(), CleanupError> {
        let kind = ResourceKind::Images;
        let older_than = self.config.older_than;
        tracing::info!(dry_run = self.config.dry_run, %older_than, "cleaning unused images");

        if self.config.dry_run {
            let images = self
                .runtime
                .list_all_images()
                .await
                .context(QuerySnafu { kind })?;
            let containers = self.all_containers(kind).await?;
            let candidates = usage::unused_images(images, &containers, older_than, Utc::now());
            self.reporter.image_candidates(&candidates, "unused");
        } else {
            let report = self
                .runtime
                .prune_images(older_than)
                .await
                .context(PruneSnafu { kind })?;
            self.reporter.image_prune_result(&report, "unused");
        }
        Ok(())
    }

    async fn clean_volumes(&mut self) -> Result<(), CleanupError> {
        let kind = ResourceKind::Volumes;

        if self.config.dry_run {
            let volumes = self
                .runtime
                .list_volumes()
                .await
                .context(QuerySnafu { kind })?;
            let containers = self.all_containers(kind).await?;

            let mut mounted = HashSet::new();
            for container in &containers {
                let result = self.runtime.inspect_container_mounts(&container.id).await;
                let mounts = self.inspect_or_skip(&container.id, result)?;
                mounted.extend(
                    mounts
                        .iter()
                        .filter_map(|m| m.volume_name())
                        .map(str::to_string),
                );
            }

            let candidates = usage::unused_volumes(volumes, &mounted);
            self.reporter.volume_candidates(&candidates);
        } else {
            let report = self
                .runtime
                .prune_volumes()
                .await
                .context(PruneSnafu { kind })?;
            self.reporter.volume_prune_result(&report);
        }
        Ok(())
    }

    async fn clean_networks(&mut self) -> Result<(), CleanupError> {
        let kind = ResourceKind::Networks;

        if self.config.dry_run {
            let networks = self
                .runtime
                .list_networks()
                .await
                .context(QuerySnafu { kind })?;
            let containers = self.all_containers(kind).await?;

            let mut attached = HashSet::new();
            for container in &containers {
                let result = self.runtime.inspect_container_networks(&container.id).await;
                let names = self.inspect_or_skip(&container.id, result)?;
                attached.extend(names);
            }

            let candidates = usage::unused_networks(networks, &attached);
            self.reporter.network_candidates(&candidates);
        } else {
            let report = self
                .runtime
                .prune_networks()
                .await
                .context(PruneSnafu { kind })?;
            self.reporter.network_prune_result(&report);
        }
        Ok(())
    }

    async fn clean_build_cache(&mut self) -> Result<(), CleanupError> {
        let kind = ResourceKind::BuildCache;
        let older_than = self.config.older_than;

        if self.config.dry_run {
            let entries = self
                .runtime
                .list_build_cache()
                .await
                .context(QuerySnafu { kind })?;
            let candidates = usage::unused_build_cache(entries, older_than, Utc::now());
            self.reporter.build_cache_candidates(&candidates);
        } else {
            let report = self
                .runtime
                .prune_build_cache(older_than)
                .await
                .context(PruneSnafu { kind })?;
            self.reporter.build_cache_prune_result(&report);
        }
        Ok(())
    }

    async fn all_containers(&self, kind: ResourceKind) -> Result<Vec<Container>, CleanupError> {
        self.runtime
            .list_all_containers()
            .await
            .context(QuerySnafu { kind })
    }

    /// A container removed since it was listed references nothing any more.
    fn inspect_or_skip<T: Default>(
        &mut self,
        id: &ContainerId,
        result: Result<T, RuntimeError>,
    ) -> Result<T, CleanupError> {
        match result {
            Err(e) if e.is_not_found() => {
                tracing::warn!(container = %id, "container vanished before inspection");
                self.reporter.container_vanished(id);
                Ok(T::default())
            }
            other => other.context(InspectSnafu {
                container: id.short(),
            }),
        }
    }
}
