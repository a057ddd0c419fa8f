//! Call-site classification: is `recv.Method(...)` a query on a database handle?
//!
//! The recognized operations, libraries and handle types are closed tables.
//! Supporting another database-access library means adding a [`Library`]
//! variant, nothing more.

use serde::{Deserialize, Serialize};

use crate::ast::{CallExpr, Expr};
use crate::package::Package;
use crate::pkgpath::strip_vendor;
use crate::types::TypeFacts;

/// Import path of the standard database package.
pub const DATABASE_SQL: &str = "database/sql";

/// Query-issuing method names, matched case-sensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Exec,
    QueryRow,
    Query,
    ExecContext,
    QueryRowContext,
    QueryContext,
    MustExec,
    Queryx,
    QueryRowx,
    NamedQuery,
    NamedExec,
    QueryxContext,
    QueryRowxContext,
    NamedQueryContext,
    NamedExecContext,
}

impl Operation {
    pub const ALL: [Operation; 15] = [
        Operation::Exec,
        Operation::QueryRow,
        Operation::Query,
        Operation::ExecContext,
        Operation::QueryRowContext,
        Operation::QueryContext,
        Operation::MustExec,
        Operation::Queryx,
        Operation::QueryRowx,
        Operation::NamedQuery,
        Operation::NamedExec,
        Operation::QueryxContext,
        Operation::QueryRowxContext,
        Operation::NamedQueryContext,
        Operation::NamedExecContext,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::Exec => "Exec",
            Operation::QueryRow => "QueryRow",
            Operation::Query => "Query",
            Operation::ExecContext => "ExecContext",
            Operation::QueryRowContext => "QueryRowContext",
            Operation::QueryContext => "QueryContext",
            Operation::MustExec => "MustExec",
            Operation::Queryx => "Queryx",
            Operation::QueryRowx => "QueryRowx",
            Operation::NamedQuery => "NamedQuery",
            Operation::NamedExec => "NamedExec",
            Operation::QueryxContext => "QueryxContext",
            Operation::QueryRowxContext => "QueryRowxContext",
            Operation::NamedQueryContext => "NamedQueryContext",
            Operation::NamedExecContext => "NamedExecContext",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Database-access packages whose handle types are recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Library {
    DatabaseSql,
    Sqlx,
}

impl Library {
    pub const ALL: [Library; 2] = [Library::DatabaseSql, Library::Sqlx];

    pub fn package_path(self) -> &'static str {
        match self {
            Library::DatabaseSql => DATABASE_SQL,
            Library::Sqlx => "github.com/jmoiron/sqlx",
        }
    }

    /// Resolve a package path, ignoring any vendoring prefix.
    pub fn from_package_path(path: &str) -> Option<Self> {
        let path = strip_vendor(path);
        Self::ALL.into_iter().find(|lib| lib.package_path() == path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    Db,
    Tx,
    Stmt,
    NamedStmt,
}

impl HandleKind {
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "DB" => Some(HandleKind::Db),
            "Tx" => Some(HandleKind::Tx),
            "Stmt" => Some(HandleKind::Stmt),
            "NamedStmt" => Some(HandleKind::NamedStmt),
            _ => None,
        }
    }

    /// Name of the declared type, e.g. `DB`.
    pub fn type_name(self) -> &'static str {
        match self {
            HandleKind::Db => "DB",
            HandleKind::Tx => "Tx",
            HandleKind::Stmt => "Stmt",
            HandleKind::NamedStmt => "NamedStmt",
        }
    }
}

/// The receiver type of a recognized call, e.g. `*sql.DB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandleType {
    pub library: Library,
    pub kind: HandleKind,
}

impl HandleType {
    /// Classify a receiver expression by its resolved type.
    ///
    /// Accepts only `*T` where `T` is one of the handle types declared in a
    /// recognized package.
    pub fn of_receiver(recv: &Expr, facts: &impl TypeFacts) -> Option<Self> {
        let ty = facts.type_of(recv.id)?;
        let (package, name) = ty.pointee_named()?;
        let library = Library::from_package_path(package?)?;
        let kind = HandleKind::from_type_name(name)?;
        Some(Self { library, kind })
    }
}

/// A call accepted by [`classify`].
#[derive(Debug, Clone, Copy)]
pub struct QueryCall<'a> {
    pub operation: Operation,
    pub handle: HandleType,
    pub args: &'a [Expr],
}

/// Decide whether a call is a query operation on a recognized handle.
///
/// Returns `None` for everything else; that is the common case and not an error.
pub fn classify<'a>(call: &'a CallExpr, facts: &impl TypeFacts) -> Option<QueryCall<'a>> {
    let (receiver, method) = call.selector()?;
    let operation = Operation::from_name(method)?;
    let Some(handle) = HandleType::of_receiver(receiver, facts) else {
        tracing::trace!(method, "receiver is not a recognized database handle");
        return None;
    };
    Some(QueryCall {
        operation,
        handle,
        args: &call.args,
    })
}

/// Whether the package imports the standard database package.
pub fn imports_database_sql(pkg: &Package) -> bool {
    pkg.imports.iter().any(|p| strip_vendor(p) == DATABASE_SQL)
}
