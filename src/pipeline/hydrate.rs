//! Hydration pipeline.
//!
//! Pulls the full set index from upstream, enriches every set that is new or
//! still unclassified with per-item detail lookups, and writes the result
//! through the store. One run at a time: a trigger while a run is in flight
//! is dropped, not queued.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use rand::seq::SliceRandom;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::classify::{expansion_from_item_id, resolve_classes};
use crate::error::{AppError, Result};
use crate::models::config::HydrationConfig;
use crate::models::{Expansion, ItemSet, Quality, SetItem};
use crate::services::SetProvider;
use crate::services::blizzard::SetIndexEntry;
use crate::storage::SetStore;

/// Pipeline run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Idle,
    Running,
}

/// One set that could not be hydrated during a run.
#[derive(Debug, Clone, Serialize)]
pub struct ItemFailure {
    pub id: u32,
    pub reason: String,
}

/// Aggregated outcome of a hydration run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HydrationReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Size of the work set this run
    pub examined: usize,
    pub succeeded: usize,
    pub failed: Vec<ItemFailure>,
}

/// Result of triggering a run.
#[derive(Debug)]
pub enum RunOutcome {
    Completed(HydrationReport),
    /// Dropped because a run was already in flight
    AlreadyRunning,
}

/// Orchestrates index fetch, batched detail fetches, classification, and
/// periodic persistence.
pub struct Hydrator {
    provider: Arc<dyn SetProvider>,
    store: Arc<SetStore>,
    config: HydrationConfig,
    running: AtomicBool,
    last_report: RwLock<Option<HydrationReport>>,
}

impl Hydrator {
    pub fn new(
        provider: Arc<dyn SetProvider>,
        store: Arc<SetStore>,
        config: HydrationConfig,
    ) -> Self {
        Self {
            provider,
            store,
            config,
            running: AtomicBool::new(false),
            last_report: RwLock::new(None),
        }
    }

    /// Current pipeline state.
    pub fn state(&self) -> RunState {
        if self.running.load(Ordering::SeqCst) {
            RunState::Running
        } else {
            RunState::Idle
        }
    }

    /// Report of the most recently finished run, if any.
    pub async fn last_report(&self) -> Option<HydrationReport> {
        self.last_report.read().await.clone()
    }

    /// Atomic Idle -> Running transition; false when already running.
    fn try_begin(&self) -> bool {
        self.running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Trigger a hydration run.
    ///
    /// An index-fetch failure aborts the whole run and propagates; the
    /// previous cache stays untouched. Per-set failures never abort the run;
    /// they end up in the report and get retried on the next full run via
    /// the re-fetch-to-improve condition.
    pub async fn run(&self) -> Result<RunOutcome> {
        if !self.try_begin() {
            log::info!("Hydration already running, trigger dropped");
            return Ok(RunOutcome::AlreadyRunning);
        }

        let result = self.run_inner().await;
        self.running.store(false, Ordering::SeqCst);

        match result {
            Ok(report) => {
                *self.last_report.write().await = Some(report.clone());
                Ok(RunOutcome::Completed(report))
            }
            Err(e) => {
                log::error!("Hydration run failed: {}", e);
                Err(e)
            }
        }
    }

    async fn run_inner(&self) -> Result<HydrationReport> {
        let started_at = Utc::now();

        let index = self.provider.get_index().await?;
        log::info!("Index fetched: {} sets upstream", index.len());

        let refresh = self.store.refresh_state().await;
        let mut work: Vec<SetIndexEntry> = index
            .into_iter()
            .filter(|entry| refresh.get(&entry.id).copied().unwrap_or(true))
            .collect();

        // Shuffle so a run killed partway through has touched a cross-section
        // of expansions instead of only the lowest ids.
        work.shuffle(&mut rand::thread_rng());

        log::info!(
            "Work set: {} sets to hydrate ({} already settled)",
            work.len(),
            refresh.values().filter(|needs| !**needs).count()
        );

        let mut report = HydrationReport {
            started_at,
            finished_at: started_at,
            examined: work.len(),
            succeeded: 0,
            failed: Vec::new(),
        };

        let delay = Duration::from_millis(self.config.batch_delay_ms);
        let batch_count = work.chunks(self.config.batch_size).count();

        for (batch_no, batch) in work.chunks(self.config.batch_size).enumerate() {
            let results = join_all(batch.iter().map(|entry| self.hydrate_one(entry))).await;

            for (entry, result) in batch.iter().zip(results) {
                match result {
                    Ok(set) => {
                        self.store.upsert(set).await;
                        report.succeeded += 1;
                    }
                    Err(e) => {
                        log::warn!("Failed to hydrate set {}: {}", entry.id, e);
                        report.failed.push(ItemFailure {
                            id: entry.id,
                            reason: e.to_string(),
                        });
                    }
                }
            }

            log::info!(
                "Batch {}/{}: {} hydrated, {} failed so far",
                batch_no + 1,
                batch_count,
                report.succeeded,
                report.failed.len()
            );

            if (batch_no + 1) % self.config.save_every_batches == 0 {
                if let Err(e) = self.store.save().await {
                    log::warn!("Periodic cache save failed: {}", e);
                }
            }

            let last_batch = batch_no + 1 == batch_count;
            if !last_batch && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        self.store.save().await?;

        report.finished_at = Utc::now();
        log::info!(
            "Hydration complete: {} succeeded, {} failed of {} examined",
            report.succeeded,
            report.failed.len(),
            report.examined
        );
        Ok(report)
    }

    /// Fetch and classify one set.
    async fn hydrate_one(&self, entry: &SetIndexEntry) -> Result<ItemSet> {
        let detail = self
            .provider
            .get_set_detail(entry.id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("set {} not in upstream", entry.id)))?;

        let name = if detail.name.is_empty() {
            entry.name.clone()
        } else {
            detail.name
        };

        let items: Vec<SetItem> = detail
            .items
            .iter()
            .filter_map(|member| member.item.as_ref())
            .map(|item| SetItem {
                id: item.id,
                name: item.name.clone(),
            })
            .collect();

        let mut set = ItemSet {
            id: entry.id,
            name,
            classes: Vec::new(),
            expansion: Expansion::Unknown,
            quality: Quality::Unknown,
            items,
        };

        // The first member is the representative item: its id dates the set
        // and its metadata drives class/quality resolution.
        match set.items.first() {
            Some(first) => {
                set.expansion = expansion_from_item_id(first.id);

                let item = self.provider.get_item_detail(first.id).await?;
                match item {
                    Some(item) => {
                        set.quality = item
                            .quality
                            .as_ref()
                            .map(|q| Quality::from_name(&q.name))
                            .unwrap_or(Quality::Unknown);
                        set.classes = resolve_classes(
                            &item.allowed_class_names(),
                            item.armor_subclass(),
                            &set.name,
                        );
                    }
                    None => {
                        let empty: [&str; 0] = [];
                        set.classes = resolve_classes(&empty, None, &set.name);
                    }
                }
            }
            None => {
                // No member items upstream: name keywords are the only
                // signal left.
                let empty: [&str; 0] = [];
                set.classes = resolve_classes(&empty, None, &set.name);
            }
        }

        Ok(set)
    }
}
