//! Recursive-descent parser for condition source.
//!
//! ```text
//! expr  := string | token | '(' expr expr* ')'
//! string:= '"' ( '\' any | [^"\\] )* '"'
//! token := [A-Za-z0-9_.-]+
//! ```
//!
//! Whitespace separates tokens and may surround the whole expression.
//! Anything else left over after the top-level expression is an error.

/// Parsed expression with the byte offset it started at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expr {
    pub offset: usize,
    pub node: ExprNode,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExprNode {
    /// A quoted literal, escapes already removed.
    Str(String),
    /// A bare token.
    Token(String),
    /// A parenthesized form; never empty.
    List(Vec<Expr>),
}

impl Expr {
    /// Literal text for strings and tokens.
    #[must_use]
    pub fn literal(&self) -> Option<&str> {
        match &self.node {
            ExprNode::Str(s) | ExprNode::Token(s) => Some(s),
            ExprNode::List(_) => None,
        }
    }
}

/// Where and why parsing stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub offset: usize,
    pub reason: String,
}

impl ParseError {
    fn new(offset: usize, reason: impl Into<String>) -> Self {
        Self {
            offset,
            reason: reason.into(),
        }
    }
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// Parse a complete condition.
pub fn parse(code: &str) -> Result<Expr, ParseError> {
    let mut parser = Parser { src: code, pos: 0 };
    parser.skip_ws();
    if parser.at_end() {
        return Err(ParseError::new(0, "empty condition"));
    }
    let expr = parser.expr()?;
    parser.skip_ws();
    if !parser.at_end() {
        return Err(ParseError::new(parser.pos, "unexpected trailing input"));
    }
    Ok(expr)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expr(&mut self) -> Result<Expr, ParseError> {
        let start = self.pos;
        match self.peek() {
            Some('(') => self.list(),
            Some('"') => self.string(),
            Some(c) if is_token_char(c) => {
                while self.peek().is_some_and(is_token_char) {
                    self.bump();
                }
                Ok(Expr {
                    offset: start,
                    node: ExprNode::Token(self.src[start..self.pos].to_string()),
                })
            }
            Some(c) => Err(ParseError::new(start, format!("unexpected character `{c}`"))),
            None => Err(ParseError::new(start, "unexpected end of input")),
        }
    }

    fn list(&mut self) -> Result<Expr, ParseError> {
        let start = self.pos;
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(')') => {
                    self.bump();
                    break;
                }
                None => return Err(ParseError::new(start, "unterminated list")),
                Some(_) => items.push(self.expr()?),
            }
        }
        if items.is_empty() {
            return Err(ParseError::new(start, "empty list"));
        }
        Ok(Expr {
            offset: start,
            node: ExprNode::List(items),
        })
    }

    fn string(&mut self) -> Result<Expr, ParseError> {
        let start = self.pos;
        self.bump();
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('"') => break,
                Some('\\') => match self.bump() {
                    Some(c) => text.push(c),
                    None => return Err(ParseError::new(start, "unterminated string")),
                },
                Some(c) => text.push(c),
                None => return Err(ParseError::new(start, "unterminated string")),
            }
        }
        Ok(Expr {
            offset: start,
            node: ExprNode::Str(text),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head(expr: &Expr) -> &str {
        match &expr.node {
            ExprNode::List(items) => items[0].literal().unwrap(),
            _ => panic!("not a list"),
        }
    }

    #[test]
    fn test_parse_nested() {
        let expr = parse(r#"(and (eq (vanilla.x (self)) "0") (not (is-null (me))))"#).unwrap();
        assert_eq!(head(&expr), "and");
        let ExprNode::List(items) = &expr.node else { panic!() };
        assert_eq!(items.len(), 3);
        assert_eq!(head(&items[1]), "eq");
        let ExprNode::List(eq) = &items[1].node else { panic!() };
        assert_eq!(eq[2].node, ExprNode::Str("0".into()));
    }

    #[test]
    fn test_surrounding_whitespace() {
        let expr = parse("  \n(self)\t ").unwrap();
        assert_eq!(expr.offset, 3);
    }

    #[test]
    fn test_bare_token_is_complete_expression() {
        let expr = parse("true").unwrap();
        assert_eq!(expr.node, ExprNode::Token("true".into()));
    }

    #[test]
    fn test_string_escapes() {
        let expr = parse(r#""a\"b\\c""#).unwrap();
        assert_eq!(expr.node, ExprNode::Str(r#"a"b\c"#.into()));
    }

    #[test]
    fn test_rejections() {
        assert_eq!(parse("(self) x").unwrap_err().offset, 7);
        assert_eq!(parse("(self").unwrap_err().reason, "unterminated list");
        assert_eq!(parse(r#"(eq "a 1)"#).unwrap_err().reason, "unterminated string");
        assert_eq!(parse("()").unwrap_err().reason, "empty list");
        assert_eq!(parse("").unwrap_err().reason, "empty condition");
        assert!(parse("(eq a #)").is_err());
        assert!(parse("(self))").is_err());
    }
}
