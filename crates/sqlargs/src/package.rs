//! A package as handed over by the host: files, imports and the fact table.

use std::collections::HashSet;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::ast::{CallExpr, Expr, ExprId, File};
use crate::error::{CheckError, CheckResult};
use crate::types::TypesInfo;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Import path of the package itself.
    pub path: String,
    /// Import paths the package declares, as the type checker resolved them
    /// (vendored paths keep their `vendor/` prefix).
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub files: Vec<File>,
    #[serde(default)]
    pub types: TypesInfo,
}

impl Package {
    /// Decode and validate a package from its JSON fact file.
    pub fn from_json(json: &str) -> CheckResult<Self> {
        let pkg: Package = serde_json::from_str(json)?;
        pkg.validate()?;
        Ok(pkg)
    }

    pub fn from_reader(mut reader: impl Read) -> CheckResult<Self> {
        let mut buf = String::new();
        reader.read_to_string(&mut buf)?;
        Self::from_json(&buf)
    }

    pub fn to_json(&self) -> CheckResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that expression ids are unique and that every fact refers to an
    /// expression present in the tree.
    pub fn validate(&self) -> CheckResult<()> {
        if self.path.trim().is_empty() {
            return Err(CheckError::validation("package path must not be empty"));
        }

        let mut ids: HashSet<ExprId> = HashSet::new();
        let mut duplicate: Option<ExprId> = None;
        for file in &self.files {
            for node in &file.nodes {
                node.walk(&mut |e: &Expr| {
                    if !ids.insert(e.id) && duplicate.is_none() {
                        duplicate = Some(e.id);
                    }
                });
            }
        }
        if let Some(id) = duplicate {
            return Err(CheckError::validation(format!(
                "duplicate expression id {} in package {}",
                id.0, self.path
            )));
        }

        let mut dangling: Vec<u32> = self
            .types
            .types
            .keys()
            .filter(|id| !ids.contains(*id))
            .map(|id| id.0)
            .collect();
        if !dangling.is_empty() {
            dangling.sort_unstable();
            return Err(CheckError::validation(format!(
                "facts reference unknown expression ids {dangling:?} in package {}",
                self.path
            )));
        }

        Ok(())
    }

    /// Visit every call expression in every file, pre-order.
    pub fn walk_calls<'a, F>(&'a self, mut f: F)
    where
        F: FnMut(&'a File, &'a Expr, &'a CallExpr),
    {
        for file in &self.files {
            file.walk_calls(&mut |expr, call| f(file, expr, call));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "path": "example.com/app",
        "imports": ["database/sql"],
        "files": [{
            "name": "main.go",
            "nodes": [{
                "id": 1, "kind": "call",
                "fun": {"id": 2, "kind": "ident", "name": "f"},
                "args": []
            }]
        }],
        "types": {}
    }"#;

    #[test]
    fn loads_minimal_package() {
        let pkg = Package::from_json(MINIMAL).unwrap();
        assert_eq!(pkg.path, "example.com/app");
        let mut calls = 0;
        pkg.walk_calls(|file, _, _| {
            assert_eq!(file.name, "main.go");
            calls += 1;
        });
        assert_eq!(calls, 1);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let json = MINIMAL.replace(r#""id": 2"#, r#""id": 1"#);
        let err = Package::from_json(&json).unwrap_err();
        assert!(matches!(err, CheckError::Validation(_)));
        assert!(err.to_string().contains("duplicate expression id 1"));
    }

    #[test]
    fn rejects_dangling_facts() {
        let json = MINIMAL.replace(
            r#""types": {}"#,
            r#""types": {"42": {"type": {"kind": "basic", "name": "int"}}}"#,
        );
        let err = Package::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("[42]"));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = Package::from_json("{ not json").unwrap_err();
        assert!(matches!(err, CheckError::Json(_)));
    }

    #[test]
    fn json_round_trip_preserves_package() {
        let pkg = Package::from_json(MINIMAL).unwrap();
        let again = Package::from_json(&pkg.to_json().unwrap()).unwrap();
        assert_eq!(pkg, again);
    }
}
