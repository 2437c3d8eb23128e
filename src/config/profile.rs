use std::path::Path;

use anyhow::{bail, Context, Result};

use super::loader::{LoadedConfig, SessionDefaults};
use crate::session::SessionConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliedConfig {
    pub profile_name: Option<String>,
    pub binary: Option<String>,
    pub warnings: Vec<String>,
}

/// Applies the file's top-level values and then the selected profile to
/// `session`. Every value goes through the session's own setters.
pub fn apply_config(
    session: &mut SessionConfig,
    loaded: &LoadedConfig,
    requested_profile: Option<&str>,
) -> Result<AppliedConfig> {
    let config = &loaded.config;
    let mut applied = AppliedConfig::default();

    apply_defaults(session, &config.defaults, &loaded.dir, &mut applied)
        .with_context(|| format!("applying {}", loaded.path.display()))?;

    let profile_name = match requested_profile {
        Some(name) => Some(name.to_string()),
        None => config.default_profile.clone(),
    };

    if let Some(name) = profile_name {
        let Some(profile) = config.profiles.get(&name) else {
            bail!("Unknown profile: {}", name);
        };
        apply_defaults(session, profile, &loaded.dir, &mut applied).with_context(|| {
            format!("applying profile '{}' from {}", name, loaded.path.display())
        })?;
        applied.profile_name = Some(name);
    }

    Ok(applied)
}

fn apply_defaults(
    session: &mut SessionConfig,
    defaults: &SessionDefaults,
    dir: &Path,
    applied: &mut AppliedConfig,
) -> Result<()> {
    if let Some(binary) = &defaults.binary {
        applied.binary = Some(binary.clone());
    }
    if let Some(url) = &defaults.url {
        session.set_target_url(url)?;
    }
    if let Some(wordlist) = &defaults.wordlist {
        session.set_wordlist(&resolve_relative(dir, wordlist))?;
    }
    if let Some(method) = &defaults.method {
        session.set_method(method)?;
    }
    if let Some(timeout) = defaults.timeout {
        session.set_timeout(&timeout.to_string())?;
    }
    if let Some(options) = &defaults.extra_options {
        session.set_extra_options(options)?;
    }
    if let Some(headers) = &defaults.headers {
        applied.warnings.extend(session.set_headers(headers)?);
    }
    if let Some(cookies) = &defaults.cookies {
        applied.warnings.extend(session.set_cookies(cookies)?);
    }
    if let Some(outputs) = &defaults.outputs {
        let current = session.outputs().clone();
        let pick = |value: &Option<String>, fallback: &Path| match value {
            Some(path) => resolve_relative(dir, path),
            None => fallback.to_string_lossy().into_owned(),
        };
        session.set_outputs(
            &pick(&outputs.results, current.results.as_path()),
            &pick(&outputs.log, current.log.as_path()),
            &pick(&outputs.report, current.report.as_path()),
        )?;
    }
    Ok(())
}

fn resolve_relative(base: &Path, value: &str) -> String {
    let candidate = Path::new(value);
    if candidate.is_absolute() {
        value.to_string()
    } else {
        base.join(candidate).to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use anyhow::Result;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use tempfile::tempdir;

    const CONFIG: &str = r#"{
  "binary": "ffuf-custom",
  "wordlist": "words.txt",
  "timeout": 25,
  "outputs": { "results": "runs/results.json" },
  "defaultProfile": "api",
  "profiles": {
    "api": {
      "url": "https://api.example.com",
      "method": "post",
      "headers": "Content-Type: application/json, bogus"
    },
    "quiet": { "extraOptions": "-s", "timeout": 3 }
  }
}"#;

    fn setup() -> Result<(tempfile::TempDir, LoadedConfig)> {
        let temp = tempdir()?;
        std::fs::write(temp.path().join("wonderffuf.json"), CONFIG)?;
        std::fs::write(temp.path().join("words.txt"), "admin\n")?;
        let loaded = load_config(temp.path())?.expect("config should load");
        Ok((temp, loaded))
    }

    #[test]
    fn applies_top_level_then_default_profile() -> Result<()> {
        let (temp, loaded) = setup()?;
        let mut session = SessionConfig::new();

        let applied = apply_config(&mut session, &loaded, None)?;

        assert_eq!(applied.profile_name.as_deref(), Some("api"));
        assert_eq!(applied.binary.as_deref(), Some("ffuf-custom"));
        assert_eq!(applied.warnings.len(), 1);
        assert_eq!(session.target_url(), Some("https://api.example.com"));
        assert_eq!(session.method(), "POST");
        assert_eq!(session.timeout_secs(), 25);
        assert_eq!(session.wordlist(), Some(temp.path().join("words.txt").as_path()));
        assert_eq!(
            session.outputs().results,
            temp.path().join("runs/results.json")
        );
        assert_eq!(session.outputs().log, PathBuf::from("ffuf_output.log"));
        Ok(())
    }

    #[test]
    fn requested_profile_overrides_default() -> Result<()> {
        let (_temp, loaded) = setup()?;
        let mut session = SessionConfig::new();

        let applied = apply_config(&mut session, &loaded, Some("quiet"))?;

        assert_eq!(applied.profile_name.as_deref(), Some("quiet"));
        assert_eq!(session.timeout_secs(), 3);
        assert_eq!(session.extra_options(), "-s");
        assert_eq!(session.target_url(), None);
        Ok(())
    }

    #[test]
    fn unknown_profile_is_an_error() -> Result<()> {
        let (_temp, loaded) = setup()?;
        let mut session = SessionConfig::new();
        let err = apply_config(&mut session, &loaded, Some("missing")).unwrap_err();
        assert!(err.to_string().contains("Unknown profile: missing"));
        Ok(())
    }

    #[test]
    fn invalid_values_name_the_file() -> Result<()> {
        let temp = tempdir()?;
        std::fs::write(
            temp.path().join("wonderffuf.json"),
            r#"{ "url": "example.com" }"#,
        )?;
        let loaded = load_config(temp.path())?.expect("config should load");

        let err = apply_config(&mut SessionConfig::new(), &loaded, None).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("wonderffuf.json"));
        assert!(message.contains("Invalid URL"));
        Ok(())
    }
}
