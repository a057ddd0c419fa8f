use sqlargs::Package;
use std::path::Path;

/// Load one package fact file; `-` reads stdin.
pub fn load_package(path: &Path) -> anyhow::Result<Package> {
    if path == Path::new("-") {
        return Package::from_reader(std::io::stdin().lock())
            .map_err(|e| anyhow::anyhow!("failed to load facts from stdin: {e}"));
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let pkg = Package::from_json(&raw)
        .map_err(|e| anyhow::anyhow!("failed to load facts from {}: {e}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        package = %pkg.path,
        files = pkg.files.len(),
        facts = pkg.types.len(),
        "loaded package facts"
    );
    Ok(pkg)
}
