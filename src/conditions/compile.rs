//! Closure compiler for parsed conditions.
//!
//! Every list `(name arg*)` becomes a call to the primitive registered under
//! `name`. Literal arguments are handed over as text; nested lists are
//! handed over as compiled but unevaluated thunks, so the primitive decides
//! whether and when to force them. That is what lets `and`/`or` short
//! circuit.

use std::fmt;
use std::sync::Arc;

use crate::board::Board;
use crate::core::PieceId;
use crate::error::EngineError;

use super::parser::{parse, Expr, ExprNode};
use super::registry::PrimitiveRegistry;
use super::value::Value;

/// Everything a condition can look at.
#[derive(Clone, Copy, Debug)]
pub struct EvalContext<'a> {
    /// The hypothetical board under test.
    pub board: &'a Board,
    /// The piece whose behaviour is being searched.
    pub this: &'a PieceId,
    /// The piece that attacked `this` in the chain so far.
    pub attacker: Option<&'a PieceId>,
}

impl<'a> EvalContext<'a> {
    #[must_use]
    pub fn new(board: &'a Board, this: &'a PieceId) -> Self {
        Self {
            board,
            this,
            attacker: None,
        }
    }

    #[must_use]
    pub fn with_attacker(mut self, attacker: Option<&'a PieceId>) -> Self {
        self.attacker = attacker;
        self
    }
}

/// A compiled expression awaiting its context.
pub type Thunk = Arc<dyn Fn(&EvalContext<'_>) -> Value + Send + Sync>;

/// Box a closure as a [`Thunk`].
pub fn thunk<F>(f: F) -> Thunk
where
    F: Fn(&EvalContext<'_>) -> Value + Send + Sync + 'static,
{
    Arc::new(f)
}

/// An argument as a primitive receives it.
#[derive(Clone)]
pub enum Arg {
    Literal(String),
    Expr(Thunk),
}

impl Arg {
    /// Evaluate the argument.
    #[must_use]
    pub fn force(&self, ctx: &EvalContext<'_>) -> Value {
        match self {
            Arg::Literal(text) => Value::Text(text.clone()),
            Arg::Expr(thunk) => thunk(ctx),
        }
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Arg::Expr(_) => f.write_str("Expr(..)"),
        }
    }
}

/// Force every argument, left to right.
#[must_use]
pub fn force_all(args: &[Arg], ctx: &EvalContext<'_>) -> Vec<Value> {
    args.iter().map(|arg| arg.force(ctx)).collect()
}

/// A compiled condition.
#[derive(Clone)]
pub struct Predicate {
    root: Thunk,
}

impl Predicate {
    /// The raw value of the expression.
    #[must_use]
    pub fn evaluate(&self, ctx: &EvalContext<'_>) -> Value {
        (self.root)(ctx)
    }

    /// Whether the expression holds.
    #[must_use]
    pub fn test(&self, ctx: &EvalContext<'_>) -> bool {
        self.evaluate(ctx).truthy()
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// Parse and compile `code` against `primitives`.
pub fn compile(code: &str, primitives: &PrimitiveRegistry) -> Result<Predicate, EngineError> {
    let expr = parse(code).map_err(|e| EngineError::Compile {
        code: code.to_string(),
        offset: e.offset,
        reason: e.reason,
    })?;
    let root = compile_expr(&expr, primitives).map_err(|(offset, reason)| EngineError::Compile {
        code: code.to_string(),
        offset,
        reason,
    })?;
    Ok(Predicate { root })
}

fn compile_expr(expr: &Expr, primitives: &PrimitiveRegistry) -> Result<Thunk, (usize, String)> {
    let items = match &expr.node {
        ExprNode::Str(text) | ExprNode::Token(text) => {
            let text = text.clone();
            return Ok(thunk(move |_| Value::Text(text.clone())));
        }
        ExprNode::List(items) => items,
    };

    // The parser never yields an empty list.
    let Some((head, rest)) = items.split_first() else {
        return Err((expr.offset, "empty list".to_string()));
    };
    let name = head
        .literal()
        .ok_or_else(|| (head.offset, "list head must name a primitive".to_string()))?;
    let info = primitives
        .get(name)
        .ok_or_else(|| (head.offset, format!("unknown primitive `{name}`")))?;

    let args = rest
        .iter()
        .map(|arg| match arg.literal() {
            Some(text) => Ok(Arg::Literal(text.to_string())),
            None => compile_expr(arg, primitives).map(Arg::Expr),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((info.builder)(args))
}
