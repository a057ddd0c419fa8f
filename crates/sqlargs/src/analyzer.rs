//! The sqlargs check: walk a package and compare placeholder and argument counts.

use crate::ast::{CallExpr, Expr};
use crate::classify::{classify, imports_database_sql};
use crate::diagnostic::Diagnostic;
use crate::extract::extract_query;
use crate::package::Package;
use crate::placeholder::count_placeholders;
use crate::types::TypeFacts;

pub const NAME: &str = "sqlargs";

pub const DOC: &str = "\
check sql query strings for correctness

The sqlargs analyser checks the parameters passed to sql queries
and the actual number of parameters written in the query string
and reports any mismatches.

This is a common occurrence when updating a sql query to add/remove
a column.";

/// Check a single call expression.
///
/// Returns a diagnostic only when the call is a recognized query with a
/// constant query string whose placeholder count differs from the number of
/// bind arguments.
pub fn check_call<F>(file: &str, expr: &Expr, call: &CallExpr, facts: &F) -> Option<Diagnostic>
where
    F: TypeFacts + ?Sized,
{
    let query = classify(call, &facts)?;
    if query.args.is_empty() {
        return None;
    }

    let Some(extracted) = extract_query(query.args, facts) else {
        tracing::trace!(
            file,
            line = expr.pos.line,
            operation = %query.operation,
            "no constant query string, skipping"
        );
        return None;
    };

    let expected = count_placeholders(extracted.sql);
    let actual = extracted.args.len();
    let diag = Diagnostic::mismatch(file, expr.pos, query.operation, expected, actual)?;
    tracing::debug!(
        file,
        line = expr.pos.line,
        operation = %query.operation,
        expected,
        actual,
        "placeholder count mismatch"
    );
    Some(diag)
}

/// Run the check over a package, handing each diagnostic to `report` as it is
/// found.
///
/// Packages that do not import `database/sql` are skipped entirely.
pub fn run(pkg: &Package, mut report: impl FnMut(Diagnostic)) {
    if !imports_database_sql(pkg) {
        tracing::debug!(package = %pkg.path, "package does not import database/sql, skipping");
        return;
    }

    pkg.walk_calls(|file, expr, call| {
        if let Some(diag) = check_call(&file.name, expr, call, &pkg.types) {
            report(diag);
        }
    });
}

/// Run the check over a package and collect the diagnostics.
pub fn check_package(pkg: &Package) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    run(pkg, |d| out.push(d));
    out
}
