//! One harvest run: acquire the browser, collect, persist, release.

use std::path::PathBuf;

use quickdraw_common::{QuickdrawError, Result, SampleSet};
use quickdraw_config::QuickdrawConfig;
use quickdraw_drivers::lotto_browser::driver::QuickdrawDriver;
use quickdraw_sampling::{run_session, Cadence};
use quickdraw_store::{next_sample_path, write_sample};
use tracing::{info, warn};
use uuid::Uuid;

/// What one run did, for the caller's summary.
pub struct HarvestReport {
    pub requested: u32,
    pub collected: usize,
    pub output: Option<PathBuf>,
    pub interrupted: bool,
}

/// Run one collection session end to end.
///
/// The browser session is released and any collected samples are persisted
/// on every exit path, interruption included.
pub async fn run(cfg: &QuickdrawConfig) -> Result<HarvestReport> {
    let session_id = Uuid::new_v4();
    let cadence = Cadence::new(
        cfg.sampling.count,
        cfg.sampling.wait_min,
        cfg.sampling.wait_max,
    )
    .map_err(|e| QuickdrawError::Config(e.to_string()))?;

    info!(
        %session_id,
        count = cfg.sampling.count,
        url = %cfg.site.url,
        "harvest starting"
    );

    let mut driver = QuickdrawDriver::new(
        &cfg.site.webdriver_url,
        cfg.site.headless,
        cfg.site.stealth.clone(),
    )
    .await?;

    // Collect with the session held open, then release it no matter how
    // collection ended.
    let outcome = collect(&mut driver, cfg, cadence).await;
    if let Err(err) = driver.close().await {
        warn!(%session_id, error = %err, "browser session did not close cleanly");
    }
    let (samples, interrupted) = outcome?;

    let output = persist(cfg, &samples)?;
    info!(
        %session_id,
        collected = samples.len(),
        interrupted,
        "harvest finished"
    );

    Ok(HarvestReport {
        requested: cfg.sampling.count,
        collected: samples.len(),
        output,
        interrupted,
    })
}

async fn collect(
    driver: &mut QuickdrawDriver,
    cfg: &QuickdrawConfig,
    cadence: Cadence,
) -> anyhow::Result<(SampleSet, bool)> {
    let mut page = driver.goto(&cfg.site.url).await?;
    page.accept_cookies().await;
    page.wait_for_field().await?;

    let mut interrupted = false;
    tokio::select! {
        _ = run_session(&mut page, cadence) => {}
        _ = tokio::signal::ctrl_c() => {
            interrupted = true;
            warn!("interrupted; persisting what was collected");
        }
    }

    Ok((page.into_samples(), interrupted))
}

fn persist(cfg: &QuickdrawConfig, samples: &SampleSet) -> Result<Option<PathBuf>> {
    if samples.is_empty() {
        info!("no samples collected; nothing to persist");
        return Ok(None);
    }

    std::fs::create_dir_all(&cfg.storage.data_dir)
        .map_err(|e| QuickdrawError::Storage(e.to_string()))?;
    let path = next_sample_path(&cfg.storage.data_dir)
        .map_err(|e| QuickdrawError::Storage(e.to_string()))?;
    write_sample(samples, &path).map_err(|e| QuickdrawError::Storage(e.to_string()))?;
    Ok(Some(path))
}
