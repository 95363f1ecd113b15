//! Loader for harvest configuration with YAML + environment overlays.
//!
//! A `quickdraw.yaml` file describes the target site, the sampling plan, and
//! where sample tables land. `QUICKDRAW`-prefixed environment variables
//! override file values, and `${VAR}` placeholders inside values are
//! expanded before the strongly typed config materialises.
use config::{Config, ConfigError, Environment, File};
use quickdraw_common::StealthLevel;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

#[derive(Debug, Deserialize)]
pub struct QuickdrawConfig {
    pub version: Option<String>,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub sampling: SamplingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Where and how the browser session runs.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Lottery page carrying the quick-tip field.
    pub url: String,
    /// WebDriver endpoint the driver connects to.
    pub webdriver_url: String,
    /// Run the browser without a visible window.
    pub headless: bool,
    /// Stealth level applied to the session.
    pub stealth: StealthLevel,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: "https://www.lottohelden.de/lotto/".into(),
            webdriver_url: "http://localhost:9515".into(),
            headless: true,
            stealth: StealthLevel::default(),
        }
    }
}

/// How many picks to harvest and how the pauses between bursts are bounded.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub count: u32,
    pub wait_min: f64,
    pub wait_max: f64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            count: 25,
            wait_min: 4.0,
            wait_max: 10.0,
        }
    }
}

/// Where sample tables are written.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
        }
    }
}

impl QuickdrawConfig {
    /// Reject configurations the harvester cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.site.url)
            .map_err(|e| ConfigError::Message(format!("invalid site url {:?}: {e}", self.site.url)))?;
        url::Url::parse(&self.site.webdriver_url).map_err(|e| {
            ConfigError::Message(format!(
                "invalid webdriver url {:?}: {e}",
                self.site.webdriver_url
            ))
        })?;
        if self.sampling.wait_min <= 0.0 || self.sampling.wait_min >= self.sampling.wait_max {
            return Err(ConfigError::Message(format!(
                "invalid sampling bounds {}..{}: require 0 < wait_min < wait_max",
                self.sampling.wait_min, self.sampling.wait_max
            )));
        }
        Ok(())
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) if s.contains('$') => *s = expand_env_string(std::mem::take(s)),
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

// Re-expand until the value stops changing; the depth cap keeps cyclic
// definitions from looping forever.
fn expand_env_string(mut cur: String) -> String {
    for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
        let expanded = match shellexpand::env(&cur) {
            Ok(cow) => cow.into_owned(),
            Err(_) => break,
        };
        if expanded == cur {
            break;
        }
        cur = expanded;
    }
    cur
}

/// Builder hiding the `config` crate wiring (YAML + env overrides).
pub struct QuickdrawConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for QuickdrawConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl QuickdrawConfigLoader {
    /// Start with the defaults: `QUICKDRAW`-prefixed env overrides on top of
    /// whatever file or inline sources are attached.
    ///
    /// ```
    /// use quickdraw_config::QuickdrawConfigLoader;
    ///
    /// let config = QuickdrawConfigLoader::new()
    ///     .with_yaml_str("version: '1'")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert_eq!(config.sampling.count, 25);
    /// assert!(config.site.headless);
    /// ```
    pub fn new() -> Self {
        let builder =
            Config::builder().add_source(Environment::with_prefix("QUICKDRAW").separator("__"));
        Self { builder }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by
    /// suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use quickdraw_config::QuickdrawConfigLoader;
    ///
    /// let config = QuickdrawConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// sampling:
    ///   count: 5
    ///   wait_min: 2.0
    ///   wait_max: 6.0
    /// storage:
    ///   data_dir: "./tables"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.sampling.count, 5);
    /// assert_eq!(config.storage.data_dir.to_str(), Some("./tables"));
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// Values pass through recursive `${VAR}` expansion before the typed
    /// config materialises, so secrets and paths can reference the
    /// environment from YAML.
    pub fn load(self) -> Result<QuickdrawConfig, ConfigError> {
        let cfg = self.builder.build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: QuickdrawConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("TIP_DIR", Some("/srv/tips"), || {
            let mut v = json!("${TIP_DIR}/current");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("/srv/tips/current"));
        });
    }

    #[test]
    fn expands_recursively_across_env_values() {
        temp_env::with_vars(
            [
                ("LEAF", Some("deep")),
                ("MID", Some("mid-${LEAF}")),
                ("ROOT", Some("start-${MID}-end")),
            ],
            || {
                let mut v = json!("X=${ROOT}");
                expand_env_in_value(&mut v);
                assert_eq!(v, json!("X=start-mid-deep-end"));
            },
        );
    }

    #[test]
    fn stops_on_cycles_and_leaves_value_reasonable() {
        temp_env::with_vars([("A", Some("${B}")), ("B", Some("${A}"))], || {
            let mut v = json!("x=${A}-y");
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("x=") && s.ends_with("-y"));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${DOES_NOT_EXIST}"));
    }

    #[test]
    fn defaults_cover_an_empty_document() {
        let config = QuickdrawConfigLoader::new()
            .with_yaml_str("version: 'test'")
            .load()
            .unwrap();

        assert_eq!(config.sampling.count, 25);
        assert_eq!(config.sampling.wait_min, 4.0);
        assert_eq!(config.sampling.wait_max, 10.0);
        assert!(config.site.url.contains("lotto"));
        config.validate().unwrap();
    }

    #[test]
    fn file_values_override_defaults() {
        let config = QuickdrawConfigLoader::new()
            .with_yaml_str(
                r#"
site:
  headless: false
sampling:
  count: 3
"#,
            )
            .load()
            .unwrap();

        assert!(!config.site.headless);
        assert_eq!(config.sampling.count, 3);
        // Untouched sections keep their defaults.
        assert_eq!(config.sampling.wait_max, 10.0);
    }

    #[test]
    fn validation_rejects_inverted_bounds() {
        let config = QuickdrawConfigLoader::new()
            .with_yaml_str(
                r#"
sampling:
  wait_min: 9.0
  wait_max: 4.0
"#,
            )
            .load()
            .unwrap();

        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_rejects_unparseable_urls() {
        let config = QuickdrawConfigLoader::new()
            .with_yaml_str("site:\n  url: 'not a url'\n")
            .load()
            .unwrap();

        assert!(config.validate().is_err());
    }
}
