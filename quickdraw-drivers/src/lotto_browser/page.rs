use std::time::Duration;

use crate::lotto_browser::{behavioral::BehavioralEngine, stealth::StealthScripts};
use anyhow::{bail, Result};
use async_trait::async_trait;
use fantoccini::{Client, Locator};
use quickdraw_common::{Sample, SampleSet, StealthLevel};
use quickdraw_sampling::PickSurface;
use tracing::{debug, info, warn};

/// The first lottery field: carries the "Feld 1 von ..." label.
const FIRST_FIELD: &str =
    r#"//div[contains(@class, "lotteryfield-container")][.//div[contains(text(), "Feld 1 von")]]"#;

/// Any lottery field; used to await initial page readiness.
const FIELD_CONTAINER: &str = ".lotteryfield-container";

const QUICK_TIP_BUTTON: &str = "button.control-btn.btn-quicktip";
const NUMBER_CELLS: &str = "li";
const ACTIVE_MARKER: &str = "is-active";

const COOKIE_BANNER: &str = r#"//div[contains(@class, "cookie-banner")]"#;
const COOKIE_OK_BUTTON: &str = r#".//button[@type="button" and @aria-label="Okay"]"#;

const WAIT_TIMEOUT: Duration = Duration::from_secs(10);

/// High-level wrapper around the lottery page.
///
/// Owns the sample set the collection loop fills: every successful quick tip
/// is appended here before it is handed back.
pub struct LottoPage {
    client: Client,
    stealth_level: StealthLevel,
    behavioral_engine: BehavioralEngine,
    samples: SampleSet,
}

impl LottoPage {
    /// Construct a page wrapper around an existing WebDriver client.
    pub fn new(
        client: Client,
        stealth_level: StealthLevel,
        behavioral_engine: BehavioralEngine,
    ) -> Self {
        Self {
            client,
            stealth_level,
            behavioral_engine,
            samples: SampleSet::default(),
        }
    }

    /// Navigate to `url` and apply the evasion scripts.
    pub async fn goto(&mut self, url: &str) -> Result<()> {
        self.behavioral_engine.random_delay(300, 1200).await;
        self.client.goto(url).await?;
        self.apply_evasions().await?;
        Ok(())
    }

    async fn apply_evasions(&mut self) -> Result<()> {
        self.client
            .execute(StealthScripts::core_evasions(), vec![])
            .await?;

        match self.stealth_level {
            StealthLevel::Lightweight => {
                // No additional scripts for the lightest level
            }
            StealthLevel::Balanced => {
                self.client
                    .execute(StealthScripts::canvas_evasions(), vec![])
                    .await?;
            }
            StealthLevel::Maximum => {
                self.client
                    .execute(StealthScripts::canvas_evasions(), vec![])
                    .await?;
                self.client
                    .execute(StealthScripts::webgl_evasions(), vec![])
                    .await?;
            }
        }
        Ok(())
    }

    /// Dismiss the cookie banner if it shows up.
    ///
    /// Failure here is logged and swallowed: a banner that never appeared is
    /// the common case on replayed sessions.
    pub async fn accept_cookies(&mut self) {
        match self.click_cookie_ok().await {
            Ok(()) => info!(target: "browser.page", "cookie banner accepted"),
            Err(err) => warn!(
                target: "browser.page",
                error = %err,
                "could not accept cookie banner"
            ),
        }
    }

    async fn click_cookie_ok(&mut self) -> Result<()> {
        let banner = self
            .client
            .wait()
            .at_most(WAIT_TIMEOUT)
            .for_element(Locator::XPath(COOKIE_BANNER))
            .await?;
        let ok_button = banner.find(Locator::XPath(COOKIE_OK_BUTTON)).await?;
        ok_button.click().await?;
        Ok(())
    }

    /// Await presence of the lottery field after navigation.
    pub async fn wait_for_field(&mut self) -> Result<()> {
        self.client
            .wait()
            .at_most(WAIT_TIMEOUT)
            .for_element(Locator::Css(FIELD_CONTAINER))
            .await?;
        debug!(target: "browser.page", "lottery field present");
        Ok(())
    }

    /// Click the quick-tip button of field 1 and read back the marked
    /// numbers as 1-based slot positions.
    async fn quick_tip(&mut self) -> Result<Sample> {
        let field = self.client.find(Locator::XPath(FIRST_FIELD)).await?;
        let button = field.find(Locator::Css(QUICK_TIP_BUTTON)).await?;
        button.click().await?;

        // Give the field time to re-render its marks
        self.behavioral_engine.settle_after_click().await;

        let cells = field.find_all(Locator::Css(NUMBER_CELLS)).await?;
        if cells.is_empty() {
            bail!("no number cells under the lottery field");
        }

        let mut numbers = Vec::new();
        for (index, cell) in cells.iter().enumerate() {
            let class = cell.attr("class").await?.unwrap_or_default();
            if class.split_whitespace().any(|c| c == ACTIVE_MARKER) {
                numbers.push((index + 1) as u8);
            }
        }
        if numbers.is_empty() {
            bail!("quick tip left no cell marked");
        }

        Ok(Sample::new(numbers))
    }

    /// Samples collected so far.
    pub fn samples(&self) -> &SampleSet {
        &self.samples
    }

    /// Hand the accumulated samples to the caller, consuming the page.
    pub fn into_samples(self) -> SampleSet {
        self.samples
    }
}

#[async_trait]
impl PickSurface for LottoPage {
    async fn collect_pick(&mut self) -> Option<Sample> {
        match self.quick_tip().await {
            Ok(sample) => {
                self.samples.push(sample.clone());
                info!(
                    target: "browser.page",
                    numbers = ?sample.numbers(),
                    "collected quick tip"
                );
                Some(sample)
            }
            Err(err) => {
                warn!(target: "browser.page", error = %err, "quick tip failed");
                None
            }
        }
    }
}
