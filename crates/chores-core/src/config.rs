use std::fs;
use std::path::{
  Path,
  PathBuf
};
use std::time::Duration;

use anyhow::{
  Context,
  anyhow
};
use chores_shared::{
  AppSettingsDto,
  DEFAULT_COMPLETED_BY
};
use serde::Deserialize;
use tracing::{
  debug,
  info,
  warn
};

pub const CONFIG_ENV: &str =
  "CHORES_CONFIG";
pub const STORE_URL_ENV: &str =
  "CHORES_STORE_URL";
pub const STORE_KEY_ENV: &str =
  "CHORES_STORE_KEY";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(
  Debug,
  Clone,
  Default,
  Deserialize,
  PartialEq,
  Eq,
)]
#[serde(default)]
pub struct Config {
  pub store:       StoreConfig,
  pub completion:  CompletionConfig,
  #[serde(skip)]
  pub loaded_file: Option<PathBuf>
}

#[derive(
  Debug, Clone, Deserialize, PartialEq, Eq,
)]
#[serde(default)]
pub struct StoreConfig {
  pub url:              Option<String>,
  pub key:              Option<String>,
  pub tasks_table:      String,
  pub categories_table: String,
  pub timeout_secs:     u64
}

#[derive(
  Debug, Clone, Deserialize, PartialEq, Eq,
)]
#[serde(default)]
pub struct CompletionConfig {
  pub default_by: String,
  pub choices:    Vec<String>
}

/// Connection details for the external
/// store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEndpoint {
  pub url:     String,
  pub key:     String,
  pub timeout: Duration
}

impl Default for StoreConfig {
  fn default() -> Self {
    Self {
      url:              None,
      key:              None,
      tasks_table:      "tasks".to_string(),
      categories_table: "categories"
        .to_string(),
      timeout_secs:     DEFAULT_TIMEOUT_SECS
    }
  }
}

impl Default for CompletionConfig {
  fn default() -> Self {
    Self {
      default_by: DEFAULT_COMPLETED_BY
        .to_string(),
      choices:    vec![
        "Nick".to_string(),
        "Krista".to_string(),
        DEFAULT_COMPLETED_BY.to_string(),
      ]
    }
  }
}

impl Config {
  /// Loads the TOML file (if any), then
  /// layers the environment on top.
  #[tracing::instrument(skip(
    override_path
  ))]
  pub fn load(
    override_path: Option<&Path>
  ) -> anyhow::Result<Self> {
    let mut cfg = match resolve_config_path(
      override_path
    ) {
      | Some(path) => {
        info!(config = %path.display(), "loading config file");
        Self::from_file(&path)?
      }
      | None => {
        warn!(
          "no config file found; using \
           defaults"
        );
        Self::default()
      }
    };

    cfg.apply_env(|key| {
      std::env::var(key).ok()
    });
    cfg.normalize();
    Ok(cfg)
  }

  pub fn from_file(
    path: &Path
  ) -> anyhow::Result<Self> {
    let text = fs::read_to_string(path)
      .with_context(|| {
        format!(
          "failed to read {}",
          path.display()
        )
      })?;
    let mut cfg = Self::from_toml_str(&text)
      .with_context(|| {
        format!(
          "failed to parse TOML {}",
          path.display()
        )
      })?;
    cfg.loaded_file = Some(path.to_path_buf());
    Ok(cfg)
  }

  pub fn from_toml_str(
    text: &str
  ) -> anyhow::Result<Self> {
    let mut cfg: Self = toml::from_str(text)
      .map_err(anyhow::Error::new)?;
    cfg.normalize();
    Ok(cfg)
  }

  /// Applies `CHORES_STORE_URL` and
  /// `CHORES_STORE_KEY` through `lookup`.
  pub fn apply_env<F>(&mut self, lookup: F)
  where
    F: Fn(&str) -> Option<String>
  {
    if let Some(url) =
      non_blank(lookup(STORE_URL_ENV))
    {
      debug!(env = STORE_URL_ENV, "store url from environment");
      self.store.url = Some(url);
    }
    if let Some(key) =
      non_blank(lookup(STORE_KEY_ENV))
    {
      debug!(env = STORE_KEY_ENV, "store key from environment");
      self.store.key = Some(key);
    }
  }

  /// Command-line values win over every
  /// other layer.
  pub fn apply_overrides(
    &mut self,
    url: Option<String>,
    key: Option<String>
  ) {
    if let Some(url) = non_blank(url) {
      self.store.url = Some(url);
    }
    if let Some(key) = non_blank(key) {
      self.store.key = Some(key);
    }
  }

  pub fn settings(&self) -> AppSettingsDto {
    AppSettingsDto {
      completed_by_choices: self
        .completion
        .choices
        .clone(),
      default_completed_by: self
        .completion
        .default_by
        .clone()
    }
  }

  fn normalize(&mut self) {
    self.store.url = non_blank(
      self.store.url.take()
    )
    .map(|url| {
      url.trim_end_matches('/').to_string()
    });
    self.store.key =
      non_blank(self.store.key.take());
    self.store.timeout_secs =
      self.store.timeout_secs.max(1);

    self
      .completion
      .choices
      .retain(|choice| !choice.trim().is_empty());
    if self.completion.default_by.trim().is_empty()
    {
      self.completion.default_by =
        DEFAULT_COMPLETED_BY.to_string();
    }
    if !self
      .completion
      .choices
      .contains(&self.completion.default_by)
    {
      self
        .completion
        .choices
        .push(self.completion.default_by.clone());
    }
  }
}

impl StoreConfig {
  pub fn endpoint(
    &self
  ) -> anyhow::Result<StoreEndpoint> {
    let url = self.url.clone().ok_or_else(|| {
      anyhow!(
        "store url is not configured; set \
         {STORE_URL_ENV} or [store].url"
      )
    })?;
    let key = self.key.clone().ok_or_else(|| {
      anyhow!(
        "store key is not configured; set \
         {STORE_KEY_ENV} or [store].key"
      )
    })?;
    Ok(StoreEndpoint {
      url,
      key,
      timeout: Duration::from_secs(
        self.timeout_secs
      )
    })
  }
}

fn resolve_config_path(
  override_path: Option<&Path>
) -> Option<PathBuf> {
  if let Some(path) = override_path {
    return Some(path.to_path_buf());
  }

  if let Ok(path) = std::env::var(CONFIG_ENV)
  {
    let trimmed = path.trim();
    if trimmed.is_empty()
      || trimmed == "/dev/null"
    {
      return None;
    }
    return Some(PathBuf::from(trimmed));
  }

  let candidate = dirs::config_dir()?
    .join("chores")
    .join("config.toml");
  candidate.is_file().then_some(candidate)
}

fn non_blank(
  value: Option<String>
) -> Option<String> {
  value
    .map(|v| v.trim().to_string())
    .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;
  use std::io::Write;

  use super::*;

  #[test]
  fn defaults_match_the_household_setup() {
    let cfg = Config::default();
    assert_eq!(cfg.store.tasks_table, "tasks");
    assert_eq!(
      cfg.store.categories_table,
      "categories"
    );
    assert_eq!(cfg.completion.default_by, "Team");
    assert_eq!(
      cfg.completion.choices,
      vec!["Nick", "Krista", "Team"]
    );
  }

  #[test]
  fn toml_sections_override_defaults() {
    let cfg = Config::from_toml_str(
      r#"
        [store]
        url = "https://example.test/"
        key = "anon"
        timeout_secs = 0

        [completion]
        default_by = "Sam"
        choices = ["Alex"]
      "#
    )
    .unwrap();

    assert_eq!(
      cfg.store.url.as_deref(),
      Some("https://example.test")
    );
    assert_eq!(cfg.store.tasks_table, "tasks");
    assert_eq!(cfg.store.timeout_secs, 1);
    assert_eq!(
      cfg.completion.choices,
      vec!["Alex", "Sam"]
    );
  }

  #[test]
  fn environment_then_flags_take_precedence() {
    let mut cfg = Config::from_toml_str(
      "[store]\nurl = \"https://file.test\"\nkey = \"file-key\"\n"
    )
    .unwrap();

    let env: HashMap<&str, &str> = HashMap::from([
      (STORE_URL_ENV, "https://env.test"),
      (STORE_KEY_ENV, "  ")
    ]);
    cfg.apply_env(|key| {
      env.get(key).map(|v| v.to_string())
    });
    assert_eq!(
      cfg.store.url.as_deref(),
      Some("https://env.test")
    );
    assert_eq!(
      cfg.store.key.as_deref(),
      Some("file-key")
    );

    cfg.apply_overrides(
      None,
      Some("flag-key".to_string())
    );
    let endpoint = cfg.store.endpoint().unwrap();
    assert_eq!(endpoint.url, "https://env.test");
    assert_eq!(endpoint.key, "flag-key");
    assert_eq!(endpoint.timeout, Duration::from_secs(30));
  }

  #[test]
  fn missing_endpoint_is_reported() {
    let err = Config::default()
      .store
      .endpoint()
      .unwrap_err();
    assert!(err.to_string().contains(STORE_URL_ENV));
  }

  #[test]
  fn reads_a_config_file() {
    let mut file =
      tempfile::NamedTempFile::new().unwrap();
    writeln!(
      file,
      "[store]\ntasks_table = \"chores\""
    )
    .unwrap();

    let cfg = Config::from_file(file.path()).unwrap();
    assert_eq!(cfg.store.tasks_table, "chores");
    assert_eq!(
      cfg.loaded_file.as_deref(),
      Some(file.path())
    );
  }
}
