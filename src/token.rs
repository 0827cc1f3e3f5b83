use std::fmt;

/// - Learn more: <https://llvm.org/docs/tutorial/MyFirstLanguageFrontend/LangImpl01.html#the-lexer>
#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    EOF,

    // commands
    Def,
    Extern,

    // primary
    Identifier(String),
    Number(f64),

    /// Any other single character: operators, parentheses, commas, `;`.
    Char(char),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::EOF => write!(f, "end of input"),
            Token::Def => write!(f, "'def'"),
            Token::Extern => write!(f, "'extern'"),
            Token::Identifier(name) => write!(f, "identifier `{}`", name),
            Token::Number(n) => write!(f, "number {}", n),
            Token::Char(c) => write!(f, "'{}'", c),
        }
    }
}
