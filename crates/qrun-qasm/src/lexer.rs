//! Lexer for the `OpenQASM` subset.

use logos::Logos;

/// Tokens for `OpenQASM` 2 and 3.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")]
pub enum Token {
    // Keywords
    #[token("OPENQASM")]
    OpenQasm,

    #[token("include")]
    Include,

    #[token("qreg")]
    Qreg,

    #[token("creg")]
    Creg,

    #[token("qubit")]
    Qubit,

    #[token("bit")]
    Bit,

    #[token("gate")]
    Gate,

    #[token("opaque")]
    Opaque,

    #[token("if")]
    If,

    #[token("for")]
    For,

    #[token("measure")]
    Measure,

    #[token("reset")]
    Reset,

    #[token("barrier")]
    Barrier,

    // Constants
    #[token("pi")]
    Pi,

    #[token("tau")]
    Tau,

    #[token("euler")]
    Euler,

    // Literals
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    FloatLiteral(f64),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u64>().ok())]
    IntLiteral(u64),

    #[regex(r#""[^"]*""#, |lex| {
        let s = lex.slice();
        Some(s[1..s.len()-1].to_string())
    })]
    StringLiteral(String),

    // Identifiers
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // Operators and punctuation
    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("**")]
    Power,

    #[token("^")]
    Caret,

    #[token("=")]
    Eq,

    #[token("->")]
    Arrow,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::OpenQasm => write!(f, "OPENQASM"),
            Token::Include => write!(f, "include"),
            Token::Qreg => write!(f, "qreg"),
            Token::Creg => write!(f, "creg"),
            Token::Qubit => write!(f, "qubit"),
            Token::Bit => write!(f, "bit"),
            Token::Gate => write!(f, "gate"),
            Token::Opaque => write!(f, "opaque"),
            Token::If => write!(f, "if"),
            Token::For => write!(f, "for"),
            Token::Measure => write!(f, "measure"),
            Token::Reset => write!(f, "reset"),
            Token::Barrier => write!(f, "barrier"),
            Token::Pi => write!(f, "pi"),
            Token::Tau => write!(f, "tau"),
            Token::Euler => write!(f, "euler"),
            Token::FloatLiteral(v) => write!(f, "{v}"),
            Token::IntLiteral(v) => write!(f, "{v}"),
            Token::StringLiteral(s) => write!(f, "\"{s}\""),
            Token::Identifier(s) => write!(f, "{s}"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Power => write!(f, "**"),
            Token::Caret => write!(f, "^"),
            Token::Eq => write!(f, "="),
            Token::Arrow => write!(f, "->"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Semicolon => write!(f, ";"),
            Token::Comma => write!(f, ","),
        }
    }
}

/// A token with the source line it starts on.
#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub line: usize,
}

/// Tokenize a QASM source string.
///
/// Errors carry the 1-based line and a description of the offending slice.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, (usize, String)> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut scanned = 0;

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        line += source[scanned..span.start].matches('\n').count();
        scanned = span.start;

        match result {
            Ok(token) => tokens.push(SpannedToken { token, line }),
            Err(()) => {
                let slice = &source[span];
                return Err((line, format!("Invalid token: '{slice}'")));
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn test_header_tokens() {
        let tokens = kinds("OPENQASM 2.0;");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0], Token::OpenQasm);
        assert!(matches!(tokens[1], Token::FloatLiteral(v) if (v - 2.0).abs() < 1e-12));
        assert_eq!(tokens[2], Token::Semicolon);
    }

    #[test]
    fn test_qreg_declaration() {
        let tokens = kinds("qreg q[3];");
        assert_eq!(tokens[0], Token::Qreg);
        assert!(matches!(tokens[1], Token::Identifier(ref s) if s == "q"));
        assert_eq!(tokens[2], Token::LBracket);
        assert_eq!(tokens[3], Token::IntLiteral(3));
        assert_eq!(tokens[4], Token::RBracket);
    }

    #[test]
    fn test_power_and_arrow() {
        let tokens = kinds("2**3 -> c");
        assert_eq!(tokens[1], Token::Power);
        assert_eq!(tokens[3], Token::Arrow);
    }

    #[test]
    fn test_comments_skipped() {
        let tokens = kinds(
            r"
            // line comment
            qubit q;
            /* block
               comment */
            bit c;
        ",
        );
        assert_eq!(tokens.len(), 6);
    }

    #[test]
    fn test_lines_tracked() {
        let tokens = tokenize("qubit q;\n\nh q;").unwrap();
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[3].line, 3);
    }

    #[test]
    fn test_invalid_token_reports_line() {
        let err = tokenize("qubit q;\nh q $;").unwrap_err();
        assert_eq!(err.0, 2);
        assert!(err.1.contains('$'));
    }
}
