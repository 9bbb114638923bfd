//! Language built-ins.
//!
//! A call with the wrong number of arguments evaluates to null, which is
//! falsy, so a malformed guard blocks rather than passes.

use super::compile::{force_all, thunk, Arg, Thunk};
use super::registry::PrimitiveRegistry;
use super::value::Value;

pub(crate) fn register(registry: &mut PrimitiveRegistry) {
    registry.register("and", and, "(and <value>...)\n\ttrue if every value is truthy; stops at the first falsy one");
    registry.register("or", or, "(or <value>...)\n\ttrue if any value is truthy; stops at the first truthy one");
    registry.register("not", not, "(not <value>)\n\tlogical negation");
    registry.register("xor", xor, "(xor <value1> <value2>)\n\texactly one value is truthy");
    registry.register("eq", eq, "(eq <value1> <value2>)\n\ttest equal");
    registry.register("neq", neq, "(neq <value1> <value2>)\n\ttest not equal");
    registry.register("is-null", is_null, "(is-null <value>)\n\ttest is null");
    registry.register("self", this, "(self)\n\treturn this piece");
    registry.register("owner", owner, "(owner <piece>)\n\treturn the player controlling the piece");
    registry.register("me", me, "(me)\n\talias of `(owner (self))`");
}

fn and(args: Vec<Arg>) -> Thunk {
    thunk(move |ctx| Value::Bool(args.iter().all(|arg| arg.force(ctx).truthy())))
}

fn or(args: Vec<Arg>) -> Thunk {
    thunk(move |ctx| Value::Bool(args.iter().any(|arg| arg.force(ctx).truthy())))
}

fn not(args: Vec<Arg>) -> Thunk {
    thunk(move |ctx| match args.as_slice() {
        [value] => Value::Bool(!value.force(ctx).truthy()),
        _ => Value::Null,
    })
}

fn xor(args: Vec<Arg>) -> Thunk {
    thunk(move |ctx| match args.as_slice() {
        [a, b] => Value::Bool(a.force(ctx).truthy() != b.force(ctx).truthy()),
        _ => Value::Null,
    })
}

fn eq(args: Vec<Arg>) -> Thunk {
    thunk(move |ctx| match force_all(&args, ctx).as_slice() {
        [a, b] => Value::Bool(a.loose_eq(b)),
        _ => Value::Null,
    })
}

fn neq(args: Vec<Arg>) -> Thunk {
    thunk(move |ctx| match force_all(&args, ctx).as_slice() {
        [a, b] => Value::Bool(!a.loose_eq(b)),
        _ => Value::Null,
    })
}

fn is_null(args: Vec<Arg>) -> Thunk {
    thunk(move |ctx| match args.as_slice() {
        [value] => Value::Bool(value.force(ctx).is_null()),
        _ => Value::Bool(false),
    })
}

fn this(args: Vec<Arg>) -> Thunk {
    let arity_ok = args.is_empty();
    thunk(move |ctx| {
        if arity_ok {
            Value::Piece(ctx.this.clone())
        } else {
            Value::Null
        }
    })
}

fn owner(args: Vec<Arg>) -> Thunk {
    thunk(move |ctx| {
        let [piece] = args.as_slice() else {
            return Value::Null;
        };
        match piece.force(ctx) {
            Value::Piece(id) => ctx
                .board
                .owner_of(&id)
                .map_or(Value::Null, |player| Value::Player(player.id.clone())),
            _ => Value::Null,
        }
    })
}

fn me(args: Vec<Arg>) -> Thunk {
    let arity_ok = args.is_empty();
    thunk(move |ctx| {
        if !arity_ok {
            return Value::Null;
        }
        ctx.board
            .owner_of(ctx.this)
            .map_or(Value::Null, |player| Value::Player(player.id.clone()))
    })
}

#[cfg(test)]
mod tests {
    use crate::board::{Board, Coord, Nation, Piece, Player};
    use crate::conditions::{compile, EvalContext, PrimitiveRegistry, Value};
    use crate::core::{PieceId, PlayerId};

    fn board() -> Board {
        let mut board = Board::new("duel", 8, 8);
        board.add_player(Player::new("white", 1));
        board.add_player(Player::new("black", 3));
        board.add_piece(Piece::new("k", "king"), Some(Coord::new(0, 0)));
        board.add_piece(Piece::new("stray", "stray"), None);
        let nations = board.nations_mut();
        let root = nations.add_root(Nation::new("n1", "White").with_monarch("white"));
        nations.add_piece(root, PieceId::new("k"));
        board
    }

    fn eval(code: &str, board: &Board, this: &str) -> Value {
        let registry = PrimitiveRegistry::with_builtins();
        let this = PieceId::new(this);
        compile(code, &registry)
            .unwrap()
            .evaluate(&EvalContext::new(board, &this))
    }

    #[test]
    fn test_owner_and_me() {
        let board = board();
        assert_eq!(eval("(me)", &board, "k"), Value::Player(PlayerId::new("white")));
        assert_eq!(eval("(owner (self))", &board, "k"), Value::Player(PlayerId::new("white")));
        assert_eq!(eval("(me)", &board, "stray"), Value::Null);
        assert_eq!(eval("(owner k)", &board, "k"), Value::Null);
    }

    #[test]
    fn test_logic() {
        let board = board();
        assert_eq!(eval("(and true 1 (self))", &board, "k"), Value::Bool(true));
        assert_eq!(eval("(and true false)", &board, "k"), Value::Bool(false));
        assert_eq!(eval("(and)", &board, "k"), Value::Bool(true));
        assert_eq!(eval("(or 0 null (me))", &board, "k"), Value::Bool(true));
        assert_eq!(eval("(or)", &board, "k"), Value::Bool(false));
        assert_eq!(eval("(xor true 0)", &board, "k"), Value::Bool(true));
        assert_eq!(eval("(not (is-null (me)))", &board, "stray"), Value::Bool(false));
        assert_eq!(eval("(eq (me) (owner (self)))", &board, "k"), Value::Bool(true));
        assert_eq!(eval("(neq a b)", &board, "k"), Value::Bool(true));
    }

    #[test]
    fn test_wrong_arity_is_null() {
        let board = board();
        assert_eq!(eval("(not a b)", &board, "k"), Value::Null);
        assert_eq!(eval("(eq a)", &board, "k"), Value::Null);
        assert_eq!(eval("(self x)", &board, "k"), Value::Null);
        assert_eq!(eval("(is-null)", &board, "k"), Value::Bool(false));
    }
}
