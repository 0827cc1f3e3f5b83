use async_recursion::async_recursion;
use futures::{Stream, StreamExt};
use tracing::trace;

use crate::token::Token;

pub type CharStream = dyn Stream<Item = char> + Unpin + Send;

/// - Learn more: <https://llvm.org/docs/tutorial/MyFirstLanguageFrontend/LangImpl01.html#the-lexer>
pub struct Lexer<'stream> {
    source: &'stream mut CharStream,

    /// The current character emitted by the source stream.
    /// - `None` once the source stream is exhausted; the stream is never polled again after that.
    char: Option<char>,
}

impl<'stream> Lexer<'stream> {
    pub fn new(source: &'stream mut CharStream) -> Self {
        Self {
            source,
            char: Some(' '),
        }
    }

    /// Never fails: characters the language does not know become [`Token::Char`].
    pub async fn get_token(&mut self) -> Token {
        let token = self.scan().await;
        trace!(?token, "lexed");
        token
    }

    #[async_recursion]
    async fn scan(&mut self) -> Token {
        // Skip any whitespace.
        while matches!(self.char, Some(c) if c.is_whitespace()) {
            self.next_char().await;
        }

        let Some(char) = self.char else {
            return Token::EOF;
        };

        // Collect the identifier.
        if char.is_alphabetic() {
            let mut identifier = String::new();
            identifier.push(char);

            loop {
                self.next_char().await;
                match self.char {
                    Some(c) if c.is_alphanumeric() => identifier.push(c),
                    _ => break,
                }
            }

            return match identifier.as_str() {
                "def" => Token::Def,
                "extern" => Token::Extern,
                _ => Token::Identifier(identifier),
            };
        }

        // Collect the number.
        if is_number_char(char) {
            let mut number = String::new();
            number.push(char);

            loop {
                self.next_char().await;
                match self.char {
                    Some(c) if is_number_char(c) => number.push(c),
                    _ => break,
                }
            }

            return Token::Number(parse_number_prefix(&number));
        }

        // Skip comments.
        if char == '#' {
            loop {
                self.next_char().await;
                match self.char {
                    Some('\r') | Some('\n') | None => break,
                    Some(_) => (),
                }
            }

            return self.scan().await;
        }

        // Collect unknown token.
        self.next_char().await;
        Token::Char(char)
    }

    async fn next_char(&mut self) {
        self.char = self.source.next().await;
    }
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

/// Parses the longest prefix of `run` that is a valid float, like C's `strtod`.
/// - `"1.2.3"` parses to `1.2`; a run without any valid prefix (e.g. `"."`) parses to `0.0`.
fn parse_number_prefix(run: &str) -> f64 {
    // `run` only holds ASCII digits and '.', so every index is a char boundary.
    (1..=run.len())
        .rev()
        .find_map(|end| run[..end].parse::<f64>().ok())
        .unwrap_or(0.0)
}
