//! Condition expressions.
//!
//! Conditions are small prefix expressions that guard behaviour steps:
//!
//! ```text
//! (and (eq (vanilla.y (self)) "1") (is-null (vanilla.get-piece 0 2 (me))))
//! ```
//!
//! Source is parsed by a recursive-descent [`parser`] and compiled into a
//! tree of closures ([`compile`]). Every list head names a primitive in a
//! [`PrimitiveRegistry`]; the built-ins cover logic, equality and
//! ownership, and the `vanilla.*` set adds board geometry.
//!
//! Compilation is the only fallible step. A condition that does not compile
//! has no predicate, and a behaviour step holding it blocks every branch.
//!
//! ```
//! use rust_piecework::board::{Board, Coord, Piece};
//! use rust_piecework::conditions::{compile, EvalContext, PrimitiveRegistry};
//! use rust_piecework::core::PieceId;
//!
//! let mut board = Board::new("demo", 8, 8);
//! board.add_piece(Piece::new("rook", "rook"), Some(Coord::new(0, 0)));
//!
//! let predicate = compile("(is-null (me))", &PrimitiveRegistry::with_vanilla()).unwrap();
//! let rook = PieceId::new("rook");
//! assert!(predicate.test(&EvalContext::new(&board, &rook)));
//! ```

mod builtins;
pub mod compile;
pub mod parser;
pub mod registry;
pub mod value;
mod vanilla;

pub use compile::{compile, force_all, thunk, Arg, EvalContext, Predicate, Thunk};
pub use parser::{parse, Expr, ExprNode, ParseError};
pub use registry::{PrimitiveBuilder, PrimitiveInfo, PrimitiveRegistry};
pub use value::Value;
