use quickdraw_common::StealthLevel;

use super::fingerprint::UserAgentProfile;

/// Construct Chrome command-line arguments for a given stealth level and
/// fingerprint.
pub fn build_stealth_arguments(
    level: &StealthLevel,
    user_profile: &UserAgentProfile,
) -> Vec<String> {
    let mut args = vec![
        "--disable-blink-features=AutomationControlled".to_string(),
        "--disable-infobars".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--no-sandbox".to_string(),
        "--disable-extensions".to_string(),
        "--disable-plugins-discovery".to_string(),
        format!("--user-agent={}", user_profile.user_agent),
        format!(
            "--window-size={},{}",
            user_profile.viewport.0, user_profile.viewport.1
        ),
        format!("--lang={}", user_profile.languages.join(",")),
    ];
    if let StealthLevel::Maximum = level {
        args.push("--disable-gpu".to_string());
    }
    args
}

/// JavaScript evasions applied at page load to reduce automation signals.
pub struct StealthScripts;

impl StealthScripts {
    pub fn core_evasions() -> &'static str {
        r#"
            Object.defineProperty(navigator, 'webdriver', { get: () => undefined });
            Object.defineProperty(navigator, 'plugins', { get: () => [1,2,3] });
            Object.defineProperty(navigator, 'languages', {
                get: () => ['de-DE', 'de', 'en-US']
            });
            if (!window.chrome) window.chrome = { runtime: {} };
        "#
    }

    pub fn canvas_evasions() -> &'static str {
        r#"
            const toDataURL = HTMLCanvasElement.prototype.toDataURL;
            HTMLCanvasElement.prototype.toDataURL = function(...args) {
                const ctx = this.getContext('2d');
                if (ctx) {
                    ctx.fillStyle = 'rgba(0,0,0,0.01)';
                    ctx.fillRect(this.width - 1, this.height - 1, 1, 1);
                }
                return toDataURL.apply(this, args);
            };
        "#
    }

    pub fn webgl_evasions() -> &'static str {
        r#"
            const getParameter = WebGLRenderingContext.prototype.getParameter;
            WebGLRenderingContext.prototype.getParameter = function(parameter) {
                if (parameter === 37445) return 'Intel Inc.';
                if (parameter === 37446) return 'Intel Iris OpenGL Engine';
                return getParameter.apply(this, [parameter]);
            };
        "#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maximum_level_disables_gpu() {
        let profile = UserAgentProfile::default();
        let balanced = build_stealth_arguments(&StealthLevel::Balanced, &profile);
        assert!(!balanced.iter().any(|a| a == "--disable-gpu"));

        let maximum = build_stealth_arguments(&StealthLevel::Maximum, &profile);
        assert!(maximum.iter().any(|a| a == "--disable-gpu"));
    }

    #[test]
    fn arguments_carry_the_fingerprint() {
        let profile = UserAgentProfile::default();
        let args = build_stealth_arguments(&StealthLevel::Lightweight, &profile);
        assert!(args.iter().any(|a| a.starts_with("--user-agent=")));
        assert!(args.iter().any(|a| a == "--window-size=1920,1080"));
    }
}
