//! Separate the SQL text from the bind arguments of a query call.

use crate::ast::Expr;
use crate::types::TypeFacts;

/// The constant query string of a call and the arguments that follow it.
#[derive(Debug, Clone, Copy)]
pub struct ExtractedQuery<'a> {
    pub sql: &'a str,
    /// Arguments after the query: the bind-argument candidates.
    pub args: &'a [Expr],
}

/// Find the query text among `args`.
///
/// The first argument that is a string constant is taken as the query.
/// Arguments before it (a context, for instance) are ignored, arguments after
/// it are bind arguments. Returns `None` when no argument is a string constant,
/// i.e. the query is built at runtime and cannot be checked.
pub fn extract_query<'a, F>(args: &'a [Expr], facts: &'a F) -> Option<ExtractedQuery<'a>>
where
    F: TypeFacts + ?Sized,
{
    args.iter().enumerate().find_map(|(i, arg)| {
        let tv = facts.type_and_value(arg.id)?;
        let value = tv.value.as_ref()?;
        if !tv.ty.is_string() {
            return None;
        }
        Some(ExtractedQuery {
            sql: value.as_str()?,
            args: &args[i + 1..],
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::PackageBuilder;
    use crate::types::{ConstValue, Type, TypeAndValue};

    #[test]
    fn first_string_constant_is_the_query() {
        let mut b = PackageBuilder::new("example.com/app");
        let ctx = b.typed_ident("ctx", Type::named("context", "Context"));
        let q = b.string_lit("SELECT * FROM t WHERE a = $1 AND b = $2");
        let a = b.typed_ident("a", Type::basic("int"));
        let s = b.string_lit("literal arg");
        let args = vec![ctx, q, a, s];
        let pkg = b.build();

        let ex = extract_query(&args, &pkg.types).unwrap();
        assert_eq!(ex.sql, "SELECT * FROM t WHERE a = $1 AND b = $2");
        assert_eq!(ex.args.len(), 2);
        assert_eq!(ex.args[0].id, args[2].id);
    }

    #[test]
    fn skips_non_string_constants() {
        let mut b = PackageBuilder::new("example.com/app");
        let n = b.int_lit(5);
        let q = b.const_ident("q", "DELETE FROM t WHERE id = ?");
        let id = b.typed_ident("id", Type::basic("int"));
        let args = vec![n, q, id];
        let pkg = b.build();

        let ex = extract_query(&args, &pkg.types).unwrap();
        assert_eq!(ex.sql, "DELETE FROM t WHERE id = ?");
        assert_eq!(ex.args.len(), 1);
        assert_eq!(ex.args[0].id, args[2].id);
    }

    #[test]
    fn named_string_types_do_not_qualify() {
        let mut b = PackageBuilder::new("example.com/app");
        let q = b.ident("q");
        b.record(
            &q,
            TypeAndValue::constant(
                Type::named("example.com/app", "Query"),
                ConstValue::String("SELECT ?".to_string()),
            ),
        );
        let args = vec![q];
        let pkg = b.build();
        assert!(extract_query(&args, &pkg.types).is_none());
    }

    #[test]
    fn dynamic_queries_are_not_extracted() {
        let mut b = PackageBuilder::new("example.com/app");
        let table = b.typed_ident("table", Type::string());
        let prefix = b.string_lit("SELECT * FROM ");
        let q = b.concat(prefix, table);
        let built = b.call("buildQuery", vec![], Some(Type::string()));
        let x = b.typed_ident("x", Type::basic("int"));
        let args = vec![q, built, x];
        let pkg = b.build();
        assert!(extract_query(&args, &pkg.types).is_none());
    }

    #[test]
    fn query_as_last_argument_has_no_bind_args() {
        let mut b = PackageBuilder::new("example.com/app");
        let q = b.string_lit("SELECT 1");
        let args = vec![q];
        let pkg = b.build();
        let ex = extract_query(&args, &pkg.types).unwrap();
        assert!(ex.args.is_empty());
        assert!(extract_query(&[], &pkg.types).is_none());
    }
}
