use std::collections::HashMap;
use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use tracing::{
  debug,
  info,
  trace,
  warn
};

#[derive(Debug, Clone)]
pub struct Config {
  map: HashMap<String, String>,
  pub loaded_files: Vec<PathBuf>
}

impl Default for Config {
  fn default() -> Self {
    let mut map = HashMap::new();
    map.insert(
      "default.screen".to_string(),
      "explore".to_string()
    );
    map.insert(
      "default.view".to_string(),
      "list".to_string()
    );
    map.insert(
      "color".to_string(),
      "on".to_string()
    );
    map.insert(
      "notifications".to_string(),
      "on".to_string()
    );

    Self {
      map,
      loaded_files: vec![]
    }
  }
}

impl Config {
  #[tracing::instrument(skip(
    roamrc_override
  ))]
  pub fn load(
    roamrc_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let mut cfg = Config::default();

    let roamrc = resolve_roamrc_path(
      roamrc_override
    )?;
    if let Some(path) = roamrc {
      info!(roamrc = %path.display(), "loading roamrc");
      cfg.load_file(
        &path,
        &mut Vec::new()
      )?;
    } else {
      debug!(
        "no roamrc found; using \
         defaults"
      );
    }

    Ok(cfg)
  }

  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (k, v) in overrides {
      let key = k
        .strip_prefix("rc.")
        .unwrap_or(&k)
        .to_string();
      debug!(key = %key, value = %v, "applying override");
      self.map.insert(key, v);
    }
  }

  pub fn get(
    &self,
    key: &str
  ) -> Option<String> {
    self.map.get(key).cloned()
  }

  pub fn get_bool(
    &self,
    key: &str
  ) -> Option<bool> {
    self
      .map
      .get(key)
      .map(|v| parse_bool(v))
  }

  /// `chain` holds the canonical paths of
  /// the files currently being read.
  #[tracing::instrument(skip(
    self, chain
  ))]
  fn load_file(
    &mut self,
    path: &Path,
    chain: &mut Vec<PathBuf>
  ) -> anyhow::Result<()> {
    let path = expand_tilde(path);
    let text =
      fs::read_to_string(&path)
        .with_context(|| {
          format!(
            "failed to read {}",
            path.display()
          )
        })?;

    let canonical =
      fs::canonicalize(&path)
        .unwrap_or_else(|_| path.clone());
    if chain.contains(&canonical) {
      return Err(anyhow!(
        "include cycle at {}",
        path.display()
      ));
    }
    chain.push(canonical);

    self
      .loaded_files
      .push(path.clone());

    let base_dir = path
      .parent()
      .map(|p| p.to_path_buf())
      .unwrap_or_else(|| {
        PathBuf::from(".")
      });

    for (line_num, raw_line) in
      text.lines().enumerate()
    {
      let mut line = raw_line.trim();
      if let Some((before, _)) =
        line.split_once('#')
      {
        line = before.trim();
      }

      if line.is_empty() {
        continue;
      }

      if let Some(include_rest) =
        line.strip_prefix("include ")
      {
        let include_path =
          resolve_include_path(
            &base_dir,
            include_rest.trim()
          )?;
        debug!(
            file = %path.display(),
            include = %include_path.display(),
            line = line_num + 1,
            "processing include"
        );

        if include_path.exists() {
          self.load_file(
            &include_path,
            chain
          )?;
        } else {
          warn!(include = %include_path.display(), "include file does not exist; skipping");
        }
        continue;
      }

      let (k, v) = line
        .split_once('=')
        .ok_or_else(|| {
          anyhow!(
            "invalid config line \
             {}:{}: {}",
            path.display(),
            line_num + 1,
            raw_line
          )
        })?;

      let key = k.trim().to_string();
      let value = v.trim().to_string();
      trace!(key = %key, value = %value, "loaded config key");
      self.map.insert(key, value);
    }

    chain.pop();
    Ok(())
  }
}

/// Optional catalog file: the `--data`
/// flag wins over `data.location`.
#[tracing::instrument(skip(
  cfg,
  override_file
))]
pub fn resolve_data_file(
  cfg: &Config,
  override_file: Option<&Path>
) -> anyhow::Result<Option<PathBuf>> {
  let file = if let Some(path) =
    override_file
  {
    Some(path.to_path_buf())
  } else {
    cfg
      .get("data.location")
      .filter(|v| !v.trim().is_empty())
      .map(|v| {
        expand_tilde(Path::new(v.trim()))
      })
  };

  if let Some(path) = &file
    && !path.is_file()
  {
    return Err(anyhow!(
      "data file {} does not exist",
      path.display()
    ));
  }

  Ok(file)
}

#[tracing::instrument(skip(
  override_path
))]
fn resolve_roamrc_path(
  override_path: Option<&Path>
) -> anyhow::Result<Option<PathBuf>> {
  if let Some(path) = override_path {
    return Ok(Some(path.to_path_buf()));
  }

  if let Ok(roamrc_env) =
    std::env::var("ROAMRC")
  {
    if roamrc_env == "/dev/null" {
      return Ok(None);
    }
    return Ok(Some(PathBuf::from(
      roamrc_env
    )));
  }

  let Some(home) = dirs::home_dir()
  else {
    warn!(
      "cannot determine home \
       directory; skipping ~/.roamrc"
    );
    return Ok(None);
  };
  let candidate = home.join(".roamrc");
  if candidate.exists() {
    return Ok(Some(candidate));
  }

  Ok(None)
}

fn resolve_include_path(
  base_dir: &Path,
  include: &str
) -> anyhow::Result<PathBuf> {
  if include.trim().is_empty() {
    return Err(anyhow!(
      "include path cannot be empty"
    ));
  }

  let raw = PathBuf::from(include);
  let expanded = expand_tilde(&raw);
  if expanded.is_absolute() {
    Ok(expanded)
  } else {
    Ok(base_dir.join(expanded))
  }
}

fn expand_tilde(
  path: &Path
) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}

fn parse_bool(s: &str) -> bool {
  matches!(
    s.trim()
      .to_ascii_lowercase()
      .as_str(),
    "1" | "y" | "yes" | "on" | "true"
  )
}

#[cfg(test)]
mod tests {
  use std::fs;

  use super::{
    Config,
    resolve_data_file
  };

  #[test]
  fn defaults_then_file_then_overrides()
   {
    let dir = tempfile::tempdir().unwrap();
    let extra = dir.path().join("extra.rc");
    fs::write(
      &extra,
      "color = off\n"
    )
    .unwrap();
    let rc = dir.path().join("roamrc");
    fs::write(
      &rc,
      "# comment\n\
       default.screen = trips # inline\n\
       include extra.rc\n\
       include missing.rc\n"
    )
    .unwrap();

    let mut cfg =
      Config::load(Some(&rc)).unwrap();
    assert_eq!(
      cfg.get("default.screen").as_deref(),
      Some("trips")
    );
    assert_eq!(
      cfg.get_bool("color"),
      Some(false)
    );
    assert_eq!(
      cfg.get_bool("notifications"),
      Some(true)
    );
    assert_eq!(cfg.loaded_files.len(), 2);

    cfg.apply_overrides(vec![(
      "rc.default.view".to_string(),
      "grid".to_string()
    )]);
    assert_eq!(
      cfg.get("default.view").as_deref(),
      Some("grid")
    );
  }

  #[test]
  fn malformed_line_reports_location()
   {
    let dir = tempfile::tempdir().unwrap();
    let rc = dir.path().join("roamrc");
    fs::write(&rc, "ok = 1\nbroken\n")
      .unwrap();
    let err = Config::load(Some(&rc))
      .unwrap_err()
      .to_string();
    assert!(err.contains(":2: broken"));
  }

  #[test]
  fn include_cycle_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let rc = dir.path().join("roamrc");
    fs::write(&rc, "include roamrc\n")
      .unwrap();
    let err = Config::load(Some(&rc))
      .unwrap_err()
      .to_string();
    assert!(err.contains("include cycle"));

    let a = dir.path().join("a.rc");
    let b = dir.path().join("b.rc");
    fs::write(&a, "x = 1\ninclude b.rc\n")
      .unwrap();
    fs::write(&b, "include a.rc\n")
      .unwrap();
    assert!(
      Config::load(Some(&a)).is_err()
    );
  }

  #[test]
  fn same_file_included_twice_is_fine()
   {
    let dir = tempfile::tempdir().unwrap();
    let shared =
      dir.path().join("shared.rc");
    fs::write(&shared, "color = off\n")
      .unwrap();
    let rc = dir.path().join("roamrc");
    fs::write(
      &rc,
      "include shared.rc\n\
       include shared.rc\n"
    )
    .unwrap();
    let cfg =
      Config::load(Some(&rc)).unwrap();
    assert_eq!(cfg.loaded_files.len(), 3);
    assert_eq!(
      cfg.get_bool("color"),
      Some(false)
    );
  }

  #[test]
  fn data_file_flag_must_exist() {
    let cfg = Config::default();
    assert!(
      resolve_data_file(&cfg, None)
        .unwrap()
        .is_none()
    );

    let dir = tempfile::tempdir().unwrap();
    let missing =
      dir.path().join("nope.json");
    assert!(
      resolve_data_file(
        &cfg,
        Some(&missing)
      )
      .is_err()
    );
  }
}
