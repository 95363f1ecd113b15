use rand::prelude::SliceRandom;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Snapshot of user agent, viewport, and locale characteristics.
pub struct UserAgentProfile {
    pub user_agent: String,
    pub viewport: (u32, u32),
    pub platform: String,
    pub languages: Vec<String>,
}

impl Default for UserAgentProfile {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36".to_string(),
            viewport: (1920, 1080),
            platform: "Win32".to_string(),
            languages: vec!["de-DE".to_string(), "de".to_string(), "en-US".to_string()],
        }
    }
}

#[derive(Debug, Clone)]
/// Maintains a small pool of plausible desktop profiles and pins one for the
/// lifetime of a session.
pub struct UserAgentManager {
    desktop_profiles: Vec<UserAgentProfile>,
    current_session_profile: Option<UserAgentProfile>,
}

impl UserAgentManager {
    /// Create a new manager with built-in desktop profiles.
    pub fn new() -> Self {
        Self {
            desktop_profiles: vec![
                UserAgentProfile::default(),
                UserAgentProfile {
                    user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36".to_string(),
                    viewport: (1440, 900),
                    platform: "MacIntel".to_string(),
                    languages: vec!["de-DE".to_string(), "de".to_string(), "en-US".to_string()],
                },
                UserAgentProfile {
                    user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36".to_string(),
                    viewport: (1920, 1200),
                    platform: "Linux x86_64".to_string(),
                    languages: vec!["de-DE".to_string(), "en-US".to_string()],
                },
            ],
            current_session_profile: None,
        }
    }

    /// The profile pinned for this session, chosen at random on first use.
    pub fn session_profile(&mut self) -> &UserAgentProfile {
        let pool = &self.desktop_profiles;
        self.current_session_profile.get_or_insert_with(|| {
            let mut rng = OsRng;
            pool.choose(&mut rng).cloned().unwrap_or_default()
        })
    }
}

impl Default for UserAgentManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_profile_is_pinned() {
        let mut manager = UserAgentManager::new();
        let first = manager.session_profile().user_agent.clone();
        let second = manager.session_profile().user_agent.clone();
        assert_eq!(first, second);
    }
}
