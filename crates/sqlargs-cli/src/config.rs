use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub config_dir: PathBuf,
    pub file: ConfigFile,
}

impl ProjectConfig {
    pub fn load(config_path: PathBuf) -> anyhow::Result<Self> {
        let config_dir = config_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        let raw = std::fs::read_to_string(&config_path).map_err(|e| {
            anyhow::anyhow!(
                "failed to read config file {}: {e}",
                config_path.display()
            )
        })?;

        let mut file = ConfigFile::parse(&raw).map_err(|e| {
            anyhow::anyhow!(
                "failed to parse config file {}: {e:#}",
                config_path.display()
            )
        })?;
        file.expand_env()?;
        file.validate().map_err(|e| {
            anyhow::anyhow!("invalid config file {}: {e:#}", config_path.display())
        })?;

        Ok(Self { config_dir, file })
    }

    /// Load the config if it exists; otherwise use defaults rooted at the
    /// current directory. The config file is optional for `sqlargs check`.
    pub fn load_or_default(config_path: PathBuf) -> anyhow::Result<Self> {
        if config_path.exists() {
            return Self::load(config_path);
        }
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        Ok(Self {
            config_dir: PathBuf::from("."),
            file: ConfigFile::default(),
        })
    }

    pub fn resolve_path(&self, p: impl AsRef<Path>) -> PathBuf {
        let p = p.as_ref();
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.config_dir.join(p)
        }
    }

    /// Expand `check.facts` glob patterns (relative to the config directory),
    /// sorted and de-duplicated.
    pub fn fact_paths(&self) -> anyhow::Result<Vec<PathBuf>> {
        let mut out = Vec::new();
        for pattern in &self.file.check.facts {
            let full = self.resolve_path(pattern);
            let full = full.to_string_lossy();
            let matches = glob::glob(&full)
                .map_err(|e| anyhow::anyhow!("invalid facts pattern {pattern}: {e}"))?;
            let before = out.len();
            for entry in matches {
                let path = entry.map_err(|e| anyhow::anyhow!("failed to read {pattern}: {e}"))?;
                out.push(path);
            }
            if out.len() == before {
                tracing::warn!(pattern = %pattern, "facts pattern matched no files");
            }
        }
        out.sort();
        out.dedup();
        Ok(out)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,

    #[serde(default)]
    pub check: CheckConfig,

    #[serde(default)]
    pub ignore: IgnoreConfig,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            version: "1".to_string(),
            check: CheckConfig::default(),
            ignore: IgnoreConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckConfig {
    /// Glob patterns of package fact files.
    #[serde(default)]
    pub facts: Vec<String>,
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IgnoreConfig {
    /// Package path prefixes to skip.
    #[serde(default)]
    pub packages: Vec<String>,
}

impl IgnoreConfig {
    /// Prefix match on whole path segments: `a/b` ignores `a/b` and `a/b/c`,
    /// not `a/bc`.
    pub fn is_ignored(&self, package_path: &str) -> bool {
        self.packages.iter().any(|prefix| {
            let prefix = prefix.trim_end_matches('/');
            package_path == prefix
                || package_path
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

impl ConfigFile {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    fn expand_env(&mut self) -> anyhow::Result<()> {
        for f in &mut self.check.facts {
            *f = expand_env_vars(f)?;
        }
        for p in &mut self.ignore.packages {
            *p = expand_env_vars(p)?;
        }
        Ok(())
    }

    /// Runs after `${VAR}` expansion so expanded values are checked too.
    fn validate(&self) -> anyhow::Result<()> {
        if self.version.trim() != "1" {
            anyhow::bail!("unsupported config version: {}", self.version);
        }
        for f in &self.check.facts {
            if f.trim().is_empty() {
                anyhow::bail!("check.facts entries must not be empty");
            }
        }
        for p in &self.ignore.packages {
            if p.trim().trim_end_matches('/').is_empty() {
                anyhow::bail!("ignore.packages entries must not be empty");
            }
        }
        Ok(())
    }
}

fn expand_env_vars(input: &str) -> anyhow::Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'

            let mut key = String::new();
            let mut closed = false;
            for ch in chars.by_ref() {
                if ch == '}' {
                    closed = true;
                    break;
                }
                key.push(ch);
            }

            if !closed {
                anyhow::bail!("unterminated env var reference: ${{{key}}}");
            }
            if key.is_empty() {
                anyhow::bail!("invalid env var reference: ${{}}");
            }

            let v = std::env::var(&key)
                .map_err(|_| anyhow::anyhow!("missing env var for config expansion: {key}"))?;
            out.push_str(&v);
            continue;
        }

        out.push(c);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn make_temp_dir(tag: &str) -> PathBuf {
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("sqlargs-config-{tag}-{nonce}"));
        std::fs::create_dir_all(&dir).expect("mkdir");
        dir
    }

    #[test]
    fn parses_full_config() {
        let file = ConfigFile::parse(
            r#"
version = "1"

[check]
facts = ["target/sqlargs/*.json"]
format = "json"

[ignore]
packages = ["example.com/app/legacy"]
"#,
        )
        .unwrap();
        assert_eq!(file.check.facts, vec!["target/sqlargs/*.json"]);
        assert_eq!(file.check.format, OutputFormat::Json);
        assert_eq!(file.ignore.packages, vec!["example.com/app/legacy"]);
    }

    #[test]
    fn sections_are_optional() {
        let file = ConfigFile::parse("version = \"1\"").unwrap();
        assert!(file.check.facts.is_empty());
        assert_eq!(file.check.format, OutputFormat::Text);
    }

    #[test]
    fn rejects_unknown_version_and_format() {
        let valid = |raw: &str| ConfigFile::parse(raw).and_then(|f| f.validate());
        assert!(valid("version = \"2\"").is_err());
        assert!(valid("version = \"1\"\n[check]\nformat = \"xml\"").is_err());
        assert!(valid("version = \"1\"\n[ignore]\npackages = [\"/\"]").is_err());
        assert!(valid("version = \"1\"\n[check]\nfacts = [\" \"]").is_err());
    }

    #[test]
    fn ignore_matches_whole_segments() {
        let ignore = IgnoreConfig {
            packages: vec!["example.com/app/legacy/".to_string()],
        };
        assert!(ignore.is_ignored("example.com/app/legacy"));
        assert!(ignore.is_ignored("example.com/app/legacy/db"));
        assert!(!ignore.is_ignored("example.com/app/legacydb"));
        assert!(!ignore.is_ignored("example.com/app"));
    }

    #[test]
    fn expands_env_vars() {
        // PATH is set in any test environment.
        let path = std::env::var("PATH").unwrap();
        assert_eq!(expand_env_vars("${PATH}/x").unwrap(), format!("{path}/x"));
        assert_eq!(expand_env_vars("no vars").unwrap(), "no vars");
        assert!(expand_env_vars("${UNTERMINATED").is_err());
        assert!(expand_env_vars("${}").is_err());
    }

    #[test]
    fn resolves_relative_paths_against_config_dir() {
        let cfg = ProjectConfig {
            config_dir: PathBuf::from("ci"),
            file: ConfigFile::default(),
        };
        assert_eq!(cfg.resolve_path("facts"), PathBuf::from("ci/facts"));
        assert_eq!(cfg.resolve_path("/abs"), PathBuf::from("/abs"));
    }

    #[test]
    fn empty_env_expansion_is_rejected_on_load() {
        let dir = make_temp_dir("env");
        let config = dir.join("sqlargs.toml");
        std::fs::write(
            &config,
            "version = \"1\"\n[check]\nfacts = [\"${SQLARGS_TEST_EMPTY_FACTS}\"]\n",
        )
        .unwrap();
        // SAFETY: the variable name is unique to this test.
        unsafe { std::env::set_var("SQLARGS_TEST_EMPTY_FACTS", "") };

        let err = ProjectConfig::load(config).unwrap_err();
        assert!(format!("{err:#}").contains("check.facts entries must not be empty"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn fact_paths_are_relative_sorted_and_deduplicated() {
        let dir = make_temp_dir("globs");
        std::fs::create_dir_all(dir.join("facts")).unwrap();
        for name in ["b.json", "a.json", "notes.txt"] {
            std::fs::write(dir.join("facts").join(name), "{}").unwrap();
        }
        let config = dir.join("sqlargs.toml");
        std::fs::write(
            &config,
            "version = \"1\"\n[check]\nfacts = [\"facts/b.json\", \"facts/*.json\"]\n",
        )
        .unwrap();

        let project = ProjectConfig::load(config).unwrap();
        assert_eq!(project.config_dir, dir);
        assert_eq!(
            project.fact_paths().unwrap(),
            vec![dir.join("facts/a.json"), dir.join("facts/b.json")]
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_config_uses_defaults() {
        let dir = make_temp_dir("default");
        let project = ProjectConfig::load_or_default(dir.join("sqlargs.toml")).unwrap();
        assert_eq!(project.config_dir, PathBuf::from("."));
        assert!(project.file.check.facts.is_empty());
        assert!(project.fact_paths().unwrap().is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
