use crate::{lexer::Lexer, token::Token};

/// One token of lookahead over a [`Lexer`].
/// - `peek` is the parser's current token; `take` advances past it.
pub struct TokenSource<'stream> {
    token: Option<Token>,
    lexer: Lexer<'stream>,

    /// Number of tokens handed out by `take`.
    consumed: usize,
}

impl<'stream> TokenSource<'stream> {
    pub fn new(lexer: Lexer<'stream>) -> Self {
        Self {
            lexer,
            token: None,
            consumed: 0,
        }
    }

    pub async fn take(&mut self) -> Token {
        let token = match self.token.take() {
            Some(token) => token,
            None => self.lexer.get_token().await,
        };
        self.consumed += 1;
        token
    }

    pub async fn peek(&mut self) -> &Token {
        if self.token.is_none() {
            self.token = Some(self.lexer.get_token().await);
        }
        // The slot was just filled.
        self.token.get_or_insert(Token::EOF)
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }
}
