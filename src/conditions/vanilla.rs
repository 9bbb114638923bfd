//! The `vanilla.*` primitives: geometry, move counts, attackers.

use crate::board::{global_to_local, local_to_global, Coord, Seat};

use super::compile::{force_all, thunk, Arg, EvalContext, Thunk};
use super::registry::PrimitiveRegistry;
use super::value::Value;

pub(crate) fn register(registry: &mut PrimitiveRegistry) {
    registry.register(
        "vanilla.x",
        local_x,
        "(vanilla.x <piece>)\n\treturn the X-axis of piece in piece owner's coordinate system",
    );
    registry.register(
        "vanilla.y",
        local_y,
        "(vanilla.y <piece>)\n\treturn the Y-axis of piece in piece owner's coordinate system",
    );
    registry.register(
        "vanilla.get-piece",
        get_piece,
        "(vanilla.get-piece <x> <y> <viewer>)\n\treturn piece at [x,y] in viewer's coordinate system",
    );
    registry.register(
        "vanilla.step",
        step,
        "(vanilla.step <piece>)\n\treturn the number of steps the piece has moved",
    );
    registry.register(
        "vanilla.attacker",
        attacker,
        "(vanilla.attacker)\n\treturn the piece which attack self",
    );
}

/// The piece's square in its owner's frame.
fn local_position(args: &[Arg], ctx: &EvalContext<'_>) -> Option<Coord> {
    let [piece] = args else {
        return None;
    };
    let Value::Piece(id) = piece.force(ctx) else {
        return None;
    };
    let global = ctx.board.position_of(&id)?;
    let seat = ctx.board.owner_of(&id)?.seat;
    if !seat.is_seated() {
        return None;
    }
    Some(global_to_local(ctx.board.size, global, seat, false))
}

fn local_x(args: Vec<Arg>) -> Thunk {
    thunk(move |ctx| local_position(&args, ctx).map_or(Value::Null, |p| Value::Int(i64::from(p.x))))
}

fn local_y(args: Vec<Arg>) -> Thunk {
    thunk(move |ctx| local_position(&args, ctx).map_or(Value::Null, |p| Value::Int(i64::from(p.y))))
}

fn get_piece(args: Vec<Arg>) -> Thunk {
    thunk(move |ctx| {
        let values = force_all(&args, ctx);
        let [x, y, viewer] = values.as_slice() else {
            return Value::Null;
        };
        let (Some(x), Some(y)) = (x.as_int(), y.as_int()) else {
            return Value::Null;
        };
        let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) else {
            return Value::Null;
        };
        let Some(seat) = viewer
            .as_player()
            .and_then(|id| ctx.board.player(id))
            .map(|player| player.seat)
            .filter(|seat: &Seat| seat.is_seated())
        else {
            return Value::Null;
        };
        let global = local_to_global(ctx.board.size, Coord::new(x, y), seat, false);
        ctx.board
            .piece_at(global)
            .map_or(Value::Null, |id| Value::Piece(id.clone()))
    })
}

fn step(args: Vec<Arg>) -> Thunk {
    thunk(move |ctx| {
        let [piece] = args.as_slice() else {
            return Value::Null;
        };
        match piece.force(ctx) {
            Value::Piece(id) => Value::Int(i64::from(ctx.board.step_count(&id))),
            _ => Value::Null,
        }
    })
}

fn attacker(args: Vec<Arg>) -> Thunk {
    let arity_ok = args.is_empty();
    thunk(move |ctx| match ctx.attacker {
        Some(id) if arity_ok => Value::Piece(id.clone()),
        _ => Value::Null,
    })
}
