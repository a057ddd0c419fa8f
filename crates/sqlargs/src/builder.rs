//! Programmatic construction of a [`Package`] together with its facts.
//!
//! Frontends written in Rust, and tests, use this instead of assembling
//! [`Expr`] trees and the fact table by hand. Every constructor allocates a
//! fresh [`ExprId`] and records the facts a type checker would have recorded.
//!
//! # Example
//! ```
//! use sqlargs::{PackageBuilder, Type, check_package};
//!
//! let mut b = PackageBuilder::new("example.com/app").import("database/sql");
//! let db = b.typed_ident("db", Type::pointer_to(Type::named("database/sql", "DB")));
//! let query = b.string_lit("DELETE FROM users WHERE id = ?");
//! let call = b.method_call(db, "Exec", vec![query]).at(12, 2);
//! b.add_file("users.go", vec![call]);
//!
//! let diags = check_package(&b.build());
//! assert_eq!(diags.len(), 1);
//! assert_eq!((diags[0].expected, diags[0].actual), (1, 0));
//! ```

use crate::ast::{CallExpr, Expr, ExprId, ExprKind, File, Pos};
use crate::package::Package;
use crate::types::{ConstValue, Type, TypeAndValue, TypesInfo};

#[derive(Debug, Default)]
pub struct PackageBuilder {
    path: String,
    imports: Vec<String>,
    files: Vec<File>,
    types: TypesInfo,
    next_id: u32,
}

impl PackageBuilder {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn import(mut self, path: impl Into<String>) -> Self {
        self.imports.push(path.into());
        self
    }

    pub fn add_file(&mut self, name: impl Into<String>, nodes: Vec<Expr>) {
        self.files.push(File {
            name: name.into(),
            nodes,
        });
    }

    pub fn build(self) -> Package {
        Package {
            path: self.path,
            imports: self.imports,
            files: self.files,
            types: self.types,
        }
    }

    fn alloc(&mut self, kind: ExprKind) -> Expr {
        self.next_id += 1;
        Expr {
            id: ExprId(self.next_id),
            pos: Pos::default(),
            kind,
        }
    }

    /// Record or replace the facts for an expression.
    pub fn record(&mut self, expr: &Expr, tv: TypeAndValue) {
        self.types.insert(expr.id, tv);
    }

    /// An identifier the type checker could not resolve.
    pub fn ident(&mut self, name: &str) -> Expr {
        self.alloc(ExprKind::Ident {
            name: name.to_string(),
        })
    }

    pub fn typed_ident(&mut self, name: &str, ty: Type) -> Expr {
        let e = self.ident(name);
        self.record(&e, TypeAndValue::of(ty));
        e
    }

    /// An identifier naming a string constant, e.g. `const q = "..."`.
    pub fn const_ident(&mut self, name: &str, value: &str) -> Expr {
        let e = self.ident(name);
        self.record(
            &e,
            TypeAndValue::constant(Type::string(), ConstValue::String(value.to_string())),
        );
        e
    }

    /// A string literal; its value is recorded as a string constant.
    pub fn string_lit(&mut self, value: &str) -> Expr {
        let e = self.alloc(ExprKind::BasicLit {
            value: format!("{value:?}"),
        });
        self.record(
            &e,
            TypeAndValue::constant(Type::string(), ConstValue::String(value.to_string())),
        );
        e
    }

    pub fn int_lit(&mut self, value: i64) -> Expr {
        let e = self.alloc(ExprKind::BasicLit {
            value: value.to_string(),
        });
        self.record(
            &e,
            TypeAndValue::constant(Type::basic("int"), ConstValue::Int(value)),
        );
        e
    }

    /// `x + y` on strings. Folded to a constant only when both sides are
    /// string constants, as a compiler would.
    pub fn concat(&mut self, x: Expr, y: Expr) -> Expr {
        let folded = match (self.string_value(&x), self.string_value(&y)) {
            (Some(a), Some(b)) => Some(format!("{a}{b}")),
            _ => None,
        };
        let e = self.alloc(ExprKind::Binary {
            op: "+".to_string(),
            x: Box::new(x),
            y: Box::new(y),
        });
        let tv = match folded {
            Some(s) => TypeAndValue::constant(Type::string(), ConstValue::String(s)),
            None => TypeAndValue::of(Type::string()),
        };
        self.record(&e, tv);
        e
    }

    pub fn selector(&mut self, x: Expr, sel: &str) -> Expr {
        self.alloc(ExprKind::Selector {
            x: Box::new(x),
            sel: sel.to_string(),
        })
    }

    /// `name(args...)`, optionally with the call's result type.
    pub fn call(&mut self, name: &str, args: Vec<Expr>, result: Option<Type>) -> Expr {
        let fun = self.ident(name);
        let e = self.alloc(ExprKind::Call(CallExpr {
            fun: Box::new(fun),
            args,
        }));
        if let Some(ty) = result {
            self.record(&e, TypeAndValue::of(ty));
        }
        e
    }

    /// `recv.method(args...)`
    pub fn method_call(&mut self, recv: Expr, method: &str, args: Vec<Expr>) -> Expr {
        let fun = self.selector(recv, method);
        self.alloc(ExprKind::Call(CallExpr {
            fun: Box::new(fun),
            args,
        }))
    }

    /// A node the checker does not model, wrapping the given children.
    pub fn other(&mut self, children: Vec<Expr>) -> Expr {
        self.alloc(ExprKind::Other { children })
    }

    fn string_value(&self, e: &Expr) -> Option<String> {
        use crate::types::TypeFacts;
        self.types
            .type_and_value(e.id)
            .filter(|tv| tv.ty.is_string())
            .and_then(|tv| tv.value.as_ref())
            .and_then(|v| v.as_str())
            .map(str::to_string)
    }
}
