use crate::lotto_browser::{
    behavioral::BehavioralEngine,
    fingerprint::UserAgentManager,
    page::LottoPage,
    stealth::build_stealth_arguments,
};
use anyhow::Result;
use fantoccini::{Client, ClientBuilder};
use quickdraw_common::StealthLevel;
use serde_json::json;
use std::collections::HashMap;
use tracing::info;
use webdriver::capabilities::Capabilities;

/// Thin wrapper around a `fantoccini` WebDriver client with stealth and
/// behavioral helpers.
///
/// One driver owns one browser session; call [`QuickdrawDriver::close`] on
/// every exit path so the session does not linger.
pub struct QuickdrawDriver {
    pub client: Client,
    pub behavioral_engine: BehavioralEngine,
    pub user_agent_manager: UserAgentManager,
    pub stealth_level: StealthLevel,
}

impl QuickdrawDriver {
    /// Create a new driver connected to a running WebDriver service
    /// (typically chromedriver on `http://localhost:9515`).
    pub async fn new(
        webdriver_url: &str,
        headless: bool,
        stealth_level: StealthLevel,
    ) -> Result<Self> {
        let mut user_agent_manager = UserAgentManager::new();
        let user_agent_profile = user_agent_manager.session_profile();

        let mut args = build_stealth_arguments(&stealth_level, user_agent_profile);
        if headless {
            args.push("--headless".to_string());
            args.push("--disable-gpu".to_string());
        }

        let mut chrome_opts = HashMap::new();
        chrome_opts.insert("args".to_string(), json!(args));

        let mut caps = Capabilities::new();
        caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(webdriver_url)
            .await?;

        info!(
            target: "browser.driver",
            webdriver_url,
            headless,
            stealth = ?stealth_level,
            "browser session established"
        );

        Ok(Self {
            client,
            behavioral_engine: BehavioralEngine::new(),
            user_agent_manager,
            stealth_level,
        })
    }

    /// Navigate to `url` and return a [`LottoPage`] with stealth scripts
    /// applied.
    pub async fn goto(&mut self, url: &str) -> Result<LottoPage> {
        let mut page = LottoPage::new(
            self.client.clone(),
            self.stealth_level.clone(),
            self.behavioral_engine.clone(),
        );
        // Navigate via LottoPage so evasion scripts are applied consistently
        page.goto(url).await?;
        Ok(page)
    }

    /// Close the underlying browser session.
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }
}
