//! sqlargs
//!
//! Static check that the number of placeholders in a SQL query string matches
//! the number of bind arguments passed next to it.
//!
//! The check runs over a typed syntax tree supplied by a language frontend
//! ([`Package`]: files of expressions plus a [`TypesInfo`] fact table). It
//! looks for calls such as `db.Exec(query, args...)` where the receiver is a
//! `database/sql` or `sqlx` handle (`*DB`, `*Tx`, `*Stmt`, `*NamedStmt`) and
//! the query is a compile-time string constant, then compares the
//! placeholder count (`?`, `$1`, `:name`, `@name`) with the trailing
//! arguments. Queries built at runtime are skipped, not reported.
//!
//! # Example
//!
//! ```
//! use sqlargs::{PackageBuilder, Type, check_package, count_placeholders};
//!
//! assert_eq!(count_placeholders("SELECT ? FROM t -- ignore ?"), 1);
//!
//! let mut b = PackageBuilder::new("example.com/app").import("database/sql");
//! let tx = b.typed_ident("tx", Type::pointer_to(Type::named("database/sql", "Tx")));
//! let q = b.string_lit("INSERT INTO t (a, b) VALUES (?, ?)");
//! let a = b.typed_ident("a", Type::basic("int"));
//! let call = b.method_call(tx, "Exec", vec![q, a]);
//! b.add_file("insert.go", vec![call]);
//!
//! let diags = check_package(&b.build());
//! assert_eq!(diags[0].message, "expected 2 args, got 1");
//! ```

pub mod analyzer;
pub mod ast;
pub mod builder;
pub mod classify;
pub mod diagnostic;
pub mod error;
pub mod extract;
pub mod package;
pub mod pkgpath;
pub mod placeholder;
pub mod types;

pub use analyzer::{check_call, check_package, run};
pub use ast::{CallExpr, Expr, ExprId, ExprKind, File, Pos};
pub use builder::PackageBuilder;
pub use classify::{
    HandleKind, HandleType, Library, Operation, QueryCall, classify, imports_database_sql,
};
pub use diagnostic::{Diagnostic, Mismatch};
pub use error::{CheckError, CheckResult};
pub use extract::{ExtractedQuery, extract_query};
pub use package::Package;
pub use placeholder::{Placeholder, PlaceholderKind, count_placeholders, scan_placeholders};
pub use types::{ConstValue, Type, TypeAndValue, TypeFacts, TypesInfo};
