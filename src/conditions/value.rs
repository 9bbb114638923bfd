//! Values produced while evaluating a condition.
//!
//! Literals in condition source are text; primitives that need numbers
//! parse them on demand. Equality is loose between integers and numeric
//! text so `(eq (vanilla.x (self)) 0)` and `(eq (vanilla.x (self)) "0")`
//! agree.

use crate::core::{PieceId, PlayerId};

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    Piece(PieceId),
    Player(PlayerId),
}

impl Value {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Integer view: integers, booleans as 0/1, and numeric text.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_piece(&self) -> Option<&PieceId> {
        match self {
            Value::Piece(id) => Some(id),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_player(&self) -> Option<&PlayerId> {
        match self {
            Value::Player(id) => Some(id),
            _ => None,
        }
    }

    /// Truthiness used by the logical primitives.
    #[must_use]
    pub fn truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Text(s) => match s.trim() {
                "" | "false" | "null" => false,
                "true" => true,
                other => other.parse::<f64>().map_or(true, |n| n != 0.0),
            },
            Value::Piece(_) | Value::Player(_) => true,
        }
    }

    /// Equality with integer/text coercion.
    #[must_use]
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(_), Value::Text(_)) | (Value::Text(_), Value::Int(_)) => {
                match (self.as_int(), other.as_int()) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }
            (Value::Bool(a), Value::Int(b)) | (Value::Int(b), Value::Bool(a)) => i64::from(*a) == *b,
            _ => self == other,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.truthy());
        assert!(!Value::from("false").truthy());
        assert!(!Value::from("0").truthy());
        assert!(!Value::from("null").truthy());
        assert!(!Value::from("").truthy());
        assert!(Value::from("true").truthy());
        assert!(Value::from("2").truthy());
        assert!(Value::from("king").truthy());
        assert!(Value::Piece(PieceId::new("x")).truthy());
        assert!(!Value::Int(0).truthy());
    }

    #[test]
    fn test_loose_equality() {
        assert!(Value::Int(0).loose_eq(&Value::from("0")));
        assert!(Value::from("3").loose_eq(&Value::Int(3)));
        assert!(!Value::Int(1).loose_eq(&Value::from("one")));
        assert!(Value::Bool(true).loose_eq(&Value::Int(1)));
        assert!(Value::Null.loose_eq(&Value::Null));
        assert!(!Value::Null.loose_eq(&Value::Int(0)));
        assert!(Value::Piece(PieceId::new("a")).loose_eq(&Value::Piece(PieceId::new("a"))));
        assert!(!Value::from("0").loose_eq(&Value::from("00")));
    }
}
