// src/remote/poller.rs

//! Fixed-interval polling loop over the release feed.
//!
//! Every tick lists the configured project's releases, downloads each
//! attached asset, and appends one observation record per asset. Any
//! failure is logged and skipped; the loop itself never stops.

use std::time::Duration;

use anyhow::Context as _;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::fingerprint::compute_fingerprint;
use crate::remote::api::{ReleaseAsset, ReleaseClient};
use crate::store::{FingerprintStore, Observation, ObservationSource, RecordId};

/// Run one poll tick: list releases, fingerprint every asset, append records.
///
/// Returns the number of records appended. A failed listing abandons the
/// whole tick; a failed asset abandons only that asset. Neither is retried
/// before the next tick.
pub async fn poll_once(client: &ReleaseClient, store: &FingerprintStore) -> usize {
    let releases = match client.list_releases().await {
        Ok(releases) => releases,
        Err(err) => {
            warn!(error = %err, "release listing failed; no records this tick");
            return 0;
        }
    };

    let asset_count: usize = releases.iter().map(|r| r.assets.len()).sum();
    debug!(
        releases = releases.len(),
        assets = asset_count,
        "release listing fetched"
    );

    let mut appended = 0;
    for release in &releases {
        let tag = release.tag_name.as_deref().unwrap_or("<untagged>");
        for asset in &release.assets {
            match observe_asset(client, store, asset).await {
                Ok(id) => {
                    info!(record_id = id, release = %tag, asset = %asset.name, "logged remote asset");
                    appended += 1;
                }
                Err(err) => {
                    warn!(release = %tag, asset = %asset.name, error = %err, "asset observation failed; skipping");
                }
            }
        }
    }
    appended
}

/// Download, fingerprint and append a single asset.
async fn observe_asset(
    client: &ReleaseClient,
    store: &FingerprintStore,
    asset: &ReleaseAsset,
) -> anyhow::Result<RecordId> {
    let body = client.download_asset(asset).await?;

    // Hash and insert away from the async threads; bodies can be large.
    let store = store.clone();
    let name = asset.name.clone();
    let id = tokio::task::spawn_blocking(move || {
        let fingerprint = compute_fingerprint(&body);
        let obs = Observation::now(
            fingerprint,
            ObservationSource::RemoteAsset { name },
            body.len() as u64,
        );
        store.append(&obs)
    })
    .await
    .context("fingerprint task panicked")??;

    Ok(id)
}

/// Spawn the polling loop with a fixed period.
///
/// The first tick fires immediately; later ticks come every `period`. A
/// tick that overruns its period pushes the next one a full period out
/// instead of bunching up to catch up.
pub fn spawn_poller(
    client: ReleaseClient,
    store: FingerprintStore,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(period_secs = period.as_secs(), "release poller started");

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let appended = poll_once(&client, &store).await;
            debug!(appended, "poll tick finished");
        }
    })
}
