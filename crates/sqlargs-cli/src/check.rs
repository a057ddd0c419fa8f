use crate::cli::CheckArgs;
use crate::config::{IgnoreConfig, ProjectConfig};
use crate::facts::load_package;
use crate::report::write_diagnostics;
use sqlargs::{Diagnostic, Package};
use std::path::PathBuf;

pub fn run(args: CheckArgs) -> anyhow::Result<()> {
    let project = ProjectConfig::load_or_default(args.config.clone())?;
    let format = args.format.unwrap_or(project.file.check.format);
    let files = fact_inputs(&args.files, &project)?;

    let mut packages = Vec::with_capacity(files.len());
    for file in &files {
        packages.push(load_package(file)?);
    }

    let diags = check_packages(&packages, &project.file.ignore);

    let stdout = std::io::stdout();
    write_diagnostics(&mut stdout.lock(), format, &diags)?;

    if !diags.is_empty() {
        anyhow::bail!(
            "sqlargs found {} mismatch(es) in {} package(s)",
            diags.len(),
            packages.len()
        );
    }

    Ok(())
}

/// Fact files to load: explicit arguments, else the config globs, else stdin.
fn fact_inputs(files: &[PathBuf], project: &ProjectConfig) -> anyhow::Result<Vec<PathBuf>> {
    if !files.is_empty() {
        return Ok(files.to_vec());
    }
    if project.file.check.facts.is_empty() {
        return Ok(vec![PathBuf::from("-")]);
    }
    let from_config = project.fact_paths()?;
    if from_config.is_empty() {
        anyhow::bail!("no fact files matched check.facts");
    }
    Ok(from_config)
}

/// Analyze every package not matched by `ignore`, in order.
pub fn check_packages(packages: &[Package], ignore: &IgnoreConfig) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    for pkg in packages {
        if ignore.is_ignored(&pkg.path) {
            tracing::info!(package = %pkg.path, "package ignored by config");
            continue;
        }
        let before = diags.len();
        sqlargs::run(pkg, |d| diags.push(d));
        tracing::debug!(
            package = %pkg.path,
            diagnostics = diags.len() - before,
            "package analyzed"
        );
    }
    diags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use sqlargs::{PackageBuilder, Type};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn make_temp_dir(tag: &str) -> PathBuf {
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("sqlargs-check-{tag}-{nonce}"));
        std::fs::create_dir_all(&dir).expect("mkdir");
        dir
    }

    fn write_facts(dir: &std::path::Path, name: &str, pkg: &Package) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, pkg.to_json().unwrap()).expect("write facts");
        path
    }

    fn args(config: PathBuf, files: Vec<PathBuf>) -> CheckArgs {
        CheckArgs {
            config,
            format: Some(OutputFormat::Json),
            files,
        }
    }

    fn package(path: &str, sql: &str, nargs: usize) -> Package {
        let mut b = PackageBuilder::new(path).import("database/sql");
        let db = b.typed_ident("db", Type::pointer_to(Type::named("database/sql", "DB")));
        let mut args = vec![b.string_lit(sql)];
        for _ in 0..nargs {
            args.push(b.typed_ident("v", Type::basic("int")));
        }
        let call = b.method_call(db, "Exec", args).at(1, 1);
        b.add_file("db.go", vec![call]);
        b.build()
    }

    #[test]
    fn collects_across_packages() {
        let pkgs = vec![
            package("example.com/a", "SELECT ?", 0),
            package("example.com/b", "SELECT ?", 1),
            package("example.com/c", "SELECT $1, $2", 3),
        ];
        let diags = check_packages(&pkgs, &IgnoreConfig::default());
        assert_eq!(
            diags.iter().map(|d| (d.expected, d.actual)).collect::<Vec<_>>(),
            vec![(1, 0), (2, 3)]
        );
    }

    #[test]
    fn ignored_packages_produce_nothing() {
        let pkgs = vec![
            package("example.com/legacy/db", "SELECT ?", 0),
            package("example.com/app", "SELECT ?", 0),
        ];
        let ignore = IgnoreConfig {
            packages: vec!["example.com/legacy".to_string()],
        };
        let diags = check_packages(&pkgs, &ignore);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].file, "db.go");
    }

    #[test]
    fn run_fails_on_mismatch_and_passes_clean_packages() {
        let dir = make_temp_dir("run");
        let missing = dir.join("sqlargs.toml");
        let clean = write_facts(&dir, "clean.json", &package("example.com/a", "SELECT ?", 1));
        let bad = write_facts(&dir, "bad.json", &package("example.com/b", "SELECT ?", 0));

        run(args(missing.clone(), vec![clean.clone()])).unwrap();

        let err = run(args(missing, vec![clean, bad])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "sqlargs found 1 mismatch(es) in 2 package(s)"
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn run_uses_config_globs() {
        let dir = make_temp_dir("globs");
        std::fs::create_dir_all(dir.join("facts")).unwrap();
        write_facts(&dir, "facts/b.json", &package("example.com/b", "SELECT ?", 0));
        let config = dir.join("sqlargs.toml");
        std::fs::write(&config, "version = \"1\"\n[check]\nfacts = [\"facts/*.json\"]\n").unwrap();

        let err = run(args(config.clone(), vec![])).unwrap_err();
        assert!(err.to_string().contains("1 mismatch(es)"));

        std::fs::write(
            &config,
            "version = \"1\"\n[check]\nfacts = [\"facts/*.json\"]\n[ignore]\npackages = [\"example.com/b\"]\n",
        )
        .unwrap();
        run(args(config, vec![])).unwrap();

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn inputs_fall_back_to_stdin_without_config() {
        let dir = make_temp_dir("stdin");
        let project = ProjectConfig::load_or_default(dir.join("sqlargs.toml")).unwrap();
        assert_eq!(fact_inputs(&[], &project).unwrap(), vec![PathBuf::from("-")]);

        let explicit = vec![PathBuf::from("x.json")];
        assert_eq!(fact_inputs(&explicit, &project).unwrap(), explicit);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn unmatched_globs_are_an_error() {
        let dir = make_temp_dir("unmatched");
        let config = dir.join("sqlargs.toml");
        std::fs::write(&config, "version = \"1\"\n[check]\nfacts = [\"facts/*.json\"]\n").unwrap();
        let project = ProjectConfig::load(config).unwrap();

        let err = fact_inputs(&[], &project).unwrap_err();
        assert_eq!(err.to_string(), "no fact files matched check.facts");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_errors_name_the_fact_file() {
        let dir = make_temp_dir("load");
        let broken = dir.join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();

        let err = load_package(&broken).unwrap_err();
        assert!(err.to_string().contains("broken.json"));

        let err = load_package(&dir.join("absent.json")).unwrap_err();
        assert!(err.to_string().starts_with("failed to read"));
        assert!(err.to_string().contains("absent.json"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
