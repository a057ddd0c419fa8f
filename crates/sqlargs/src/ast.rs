//! Host syntax tree.
//!
//! A deliberately small expression tree: enough shape for the checker to find
//! `receiver.Method(args...)` calls, with every other construct folded into
//! [`ExprKind::Other`] so nested calls remain reachable. Frontends produce this
//! tree (directly or as JSON); semantic facts live next to it in
//! [`TypesInfo`](crate::types::TypesInfo), keyed by [`ExprId`].

use serde::{Deserialize, Serialize};

/// Package-unique expression identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExprId(pub u32);

/// 1-based source position. `0` means unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pos {
    pub line: u32,
    pub column: u32,
}

impl Pos {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub id: ExprId,
    #[serde(default)]
    pub pos: Pos,
    #[serde(flatten)]
    pub kind: ExprKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExprKind {
    Ident {
        name: String,
    },
    /// `x.sel`
    Selector {
        x: Box<Expr>,
        sel: String,
    },
    Call(CallExpr),
    /// Literal token as written in source, e.g. `"SELECT 1"` or `42`.
    BasicLit {
        value: String,
    },
    Binary {
        op: String,
        x: Box<Expr>,
        y: Box<Expr>,
    },
    Paren {
        x: Box<Expr>,
    },
    /// Anything else (closures, composite literals, statements lowered to
    /// expressions). Only its children matter.
    Other {
        #[serde(default)]
        children: Vec<Expr>,
    },
}

/// A function or method invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpr {
    pub fun: Box<Expr>,
    #[serde(default)]
    pub args: Vec<Expr>,
}

impl CallExpr {
    /// Returns `(receiver, method)` when the callee has the form `receiver.Method`.
    pub fn selector(&self) -> Option<(&Expr, &str)> {
        match &self.fun.kind {
            ExprKind::Selector { x, sel } => Some((x.as_ref(), sel.as_str())),
            _ => None,
        }
    }
}

impl Expr {
    /// Set the source position.
    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.pos = Pos::new(line, column);
        self
    }

    pub fn as_call(&self) -> Option<&CallExpr> {
        match &self.kind {
            ExprKind::Call(call) => Some(call),
            _ => None,
        }
    }

    /// Visit every call expression in this subtree, pre-order.
    ///
    /// The callback receives the enclosing [`Expr`] (for id and position) and
    /// the call itself. A call is visited before the calls nested in its callee
    /// and arguments.
    pub fn walk_calls<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(&'a Expr, &'a CallExpr),
    {
        match &self.kind {
            ExprKind::Ident { .. } | ExprKind::BasicLit { .. } => {}
            ExprKind::Selector { x, .. } | ExprKind::Paren { x } => x.walk_calls(f),
            ExprKind::Call(call) => {
                f(self, call);
                call.fun.walk_calls(f);
                for arg in &call.args {
                    arg.walk_calls(f);
                }
            }
            ExprKind::Binary { x, y, .. } => {
                x.walk_calls(f);
                y.walk_calls(f);
            }
            ExprKind::Other { children } => {
                for child in children {
                    child.walk_calls(f);
                }
            }
        }
    }

    /// Visit this expression and every descendant, pre-order.
    pub fn walk<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(&'a Expr),
    {
        f(self);
        match &self.kind {
            ExprKind::Ident { .. } | ExprKind::BasicLit { .. } => {}
            ExprKind::Selector { x, .. } | ExprKind::Paren { x } => x.walk(f),
            ExprKind::Call(call) => {
                call.fun.walk(f);
                for arg in &call.args {
                    arg.walk(f);
                }
            }
            ExprKind::Binary { x, y, .. } => {
                x.walk(f);
                y.walk(f);
            }
            ExprKind::Other { children } => {
                for child in children {
                    child.walk(f);
                }
            }
        }
    }
}

/// One source file: its top-level expressions in source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct File {
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<Expr>,
}

impl File {
    pub fn walk_calls<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(&'a Expr, &'a CallExpr),
    {
        for node in &self.nodes {
            node.walk_calls(f);
        }
    }
}
