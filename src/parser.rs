use std::collections::HashMap;

use async_recursion::async_recursion;
use lazy_static::lazy_static;
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    ast::{AnyAst, ExprAst, FunctionAst, PrototypeAst},
    lexer::{CharStream, Lexer},
    token::Token,
    token_src::TokenSource,
};

lazy_static! {
    /// - 1 is lowest precedence
    static ref BIN_OP_PRECEDENCE: HashMap<char, u8> = {
        let mut m = HashMap::new();
        m.insert('<', 10);
        m.insert('+', 20);
        m.insert('-', 30);
        m.insert('*', 40);
        m
    };
}

/// Precedence of `token` as a binary operator, or `None` if it is not one.
pub fn bin_op_precedence(token: &Token) -> Option<u8> {
    match token {
        Token::Char(op) => BIN_OP_PRECEDENCE.get(op).copied(),
        _ => None,
    }
}

pub struct Parser<'stream> {
    token_src: TokenSource<'stream>,
}

impl<'stream> Parser<'stream> {
    pub fn from_token_src(token_src: TokenSource<'stream>) -> Self {
        Self { token_src }
    }

    pub fn from_char_stream(char_stream: &'stream mut CharStream) -> Self {
        let lexer = Lexer::new(char_stream);
        Self::from_token_src(TokenSource::new(lexer))
    }

    /// Number of tokens consumed from the token stream so far.
    pub fn consumed_tokens(&self) -> usize {
        self.token_src.consumed()
    }

    /// - `numberexpr ::= number`
    async fn parse_number_expr(&mut self) -> Result<ExprAst, ParserError> {
        let Token::Number(n) = *self.peek_token().await else {
            return Err(self.expected("a number").await);
        };
        self.take_token().await;

        Ok(ExprAst::Number(n))
    }

    /// - `parenexpr ::= '(' expression ')'`
    async fn parse_paren_expr(&mut self) -> Result<ExprAst, ParserError> {
        self.eat_char('(', "'('").await?;

        let expr = self.parse_expression().await?;

        self.eat_char(')', "')'").await?;

        Ok(expr)
    }

    /// - ```text
    ///   identifierexpr
    ///     ::= identifier
    ///     ::= identifier '(' (expression (',' expression)*)? ')'
    ///   ```
    async fn parse_identifier_expr(&mut self) -> Result<ExprAst, ParserError> {
        let Token::Identifier(_) = self.peek_token().await else {
            return Err(self.expected("an identifier").await);
        };
        let Token::Identifier(id_name) = self.take_token().await else {
            unreachable!();
        };

        // Simple variable ref.
        if !matches!(self.peek_token().await, Token::Char('(')) {
            return Ok(ExprAst::Variable(id_name));
        }

        // Call.
        // eat '('
        self.take_token().await;

        let mut args = Vec::new();

        if let Token::Char(')') = self.peek_token().await {
            // eat ')'
            self.take_token().await;
        } else {
            loop {
                args.push(self.parse_expression().await?);

                match self.peek_token().await {
                    Token::Char(')') => {
                        // eat ')'
                        self.take_token().await;
                        break;
                    }
                    Token::Char(',') => {
                        // eat ','
                        self.take_token().await;
                    }
                    _ => return Err(self.expected("')' or ',' in argument list").await),
                }
            }
        }

        Ok(ExprAst::Call {
            callee: id_name,
            args,
        })
    }

    /// - ```text
    ///   primary
    ///     ::= identifierexpr
    ///     ::= numberexpr
    ///     ::= parenexpr
    ///   ```
    #[async_recursion]
    async fn parse_primary(&mut self) -> Result<ExprAst, ParserError> {
        match self.peek_token().await {
            Token::Char('(') => self.parse_paren_expr().await,
            Token::Identifier(_) => self.parse_identifier_expr().await,
            Token::Number(_) => self.parse_number_expr().await,
            _ => Err(self.expected("an expression").await),
        }
    }

    /// - ```text
    ///   expression
    ///     ::= primary binoprhs
    ///   ```
    /// - Nesting depth is bounded only by the stack: every `(` or call argument recurses once more.
    #[async_recursion]
    async fn parse_expression(&mut self) -> Result<ExprAst, ParserError> {
        let lhs = self.parse_primary().await?;

        // 0: minimal operator precedence, so that every operator can be handled by this function.
        self.parse_bin_op_rhs(0, lhs).await
    }

    /// - ```text
    ///   binoprhs
    ///     ::= (binop primary)*
    ///   ```
    /// - Algorithm: precedence climbing
    ///   - Learn more: <https://ycpcs.github.io/cs340-fall2018/lectures/lecture06.html>
    /// - e.g. 1 < 2 < 3 < 4 + 5 * 6 + 7 + 8 * 9 < 10
    ///
    ///   ```text
    ///     prec_level
    ///      ^
    ///      |
    ///   40 |          *     *
    ///      |
    ///   20 |        +   + +
    ///   10 |
    ///    0 +  < < <           <
    ///      +--------------------> time
    ///   ```
    ///
    ///   - `prec_level`: the minimal precedence accepted by the call currently handling the operator.
    ///   - All operators at the same level group into a left-skewed binary tree.
    ///   - Every time the level jumps higher, a new left-skewed tree is built by a nested call.
    ///     - The new tree becomes the right branch of the tree at the lower level.
    ///
    ///   ```text
    ///                    <
    ///        <            10
    ///      <         +
    ///    <  3      +   *
    ///   1 2    +    7 8 9
    ///         4  *
    ///           5 6
    ///   ```
    /// - Each iteration that does not return consumes the operator and its right-hand primary,
    ///   so the loop always makes progress.
    #[async_recursion]
    async fn parse_bin_op_rhs(
        &mut self,
        min_prec: u8,
        mut lhs: ExprAst,
    ) -> Result<ExprAst, ParserError> {
        loop {
            let Some((op, op_prec)) = self.try_peek_bin_op_and_prec().await else {
                // This token is not a binary operator.
                return Ok(lhs);
            };

            // The operator of every iteration handled in this function MUST have a precedence AT LEAST as high as `min_prec`.
            if op_prec < min_prec {
                // Return to the previous level of precedence.
                return Ok(lhs);
            }

            // Eat binop.
            self.take_token().await;

            let mut rhs = self.parse_primary().await?;

            // If the next operator binds tighter, it takes `rhs` as its lhs.
            if let Some((_, next_prec)) = self.try_peek_bin_op_and_prec().await {
                if op_prec < next_prec {
                    rhs = self.parse_bin_op_rhs(op_prec + 1, rhs).await?;
                }
            }

            //         /
            //        op
            //       /  \
            //     op'  rhs
            //    /   \
            //  lhs' rhs'
            //
            // - `x'`: variables of the previous iteration
            lhs = ExprAst::binary(op, lhs, rhs);
        }
    }

    async fn try_peek_bin_op_and_prec(&mut self) -> Option<(char, u8)> {
        let token = self.peek_token().await;
        match (token, bin_op_precedence(token)) {
            (Token::Char(op), Some(prec)) => Some((*op, prec)),
            _ => None,
        }
    }

    /// - ```text
    ///   prototype
    ///     ::= id '(' id* ')'
    ///   ```
    async fn parse_prototype(&mut self) -> Result<PrototypeAst, ParserError> {
        let Token::Identifier(_) = self.peek_token().await else {
            return Err(self.expected("function name in prototype").await);
        };
        let Token::Identifier(name) = self.take_token().await else {
            unreachable!();
        };

        self.eat_char('(', "'(' in prototype").await?;

        let mut params = Vec::new();

        loop {
            match self.peek_token().await {
                Token::Char(')') => {
                    // Eat ')'.
                    self.take_token().await;
                    break;
                }
                Token::Identifier(_) => {
                    let Token::Identifier(param) = self.take_token().await else {
                        unreachable!();
                    };
                    params.push(param);
                }
                _ => return Err(self.expected("')' in prototype").await),
            }
        }

        Ok(PrototypeAst { name, params })
    }

    /// - ```text
    ///   definition ::= 'def' prototype expression
    ///   ```
    pub async fn parse_definition(&mut self) -> Result<FunctionAst, ParserError> {
        self.eat_keyword(Token::Def, "'def'").await?;

        let prototype = self.parse_prototype().await?;
        let body = self.parse_expression().await?;

        Ok(FunctionAst { prototype, body })
    }

    /// - ```text
    ///   external ::= 'extern' prototype
    ///   ```
    pub async fn parse_extern(&mut self) -> Result<PrototypeAst, ParserError> {
        self.eat_keyword(Token::Extern, "'extern'").await?;

        self.parse_prototype().await
    }

    /// - ```text
    ///   toplevelexpr ::= expression
    ///   ```
    pub async fn parse_top_level_expr(&mut self) -> Result<FunctionAst, ParserError> {
        let body = self.parse_expression().await?;

        Ok(FunctionAst {
            prototype: PrototypeAst::anonymous(),
            body,
        })
    }

    /// - ```text
    ///   top ::= definition | external | expression | ';'
    ///   ```
    /// - Returns `None` at the end of input.
    pub async fn parse_any(&mut self) -> Result<Option<AnyAst>, ParserError> {
        loop {
            match self.peek_token().await {
                Token::EOF => return Ok(None),
                // Ignore top-level semicolons.
                Token::Char(';') => {
                    self.take_token().await;
                }
                Token::Def => {
                    trace!("dispatch: definition");
                    let function = self.parse_definition().await?;
                    return Ok(Some(AnyAst::Function(function)));
                }
                Token::Extern => {
                    trace!("dispatch: extern");
                    let prototype = self.parse_extern().await?;
                    return Ok(Some(AnyAst::Prototype(prototype)));
                }
                _ => {
                    trace!("dispatch: top-level expression");
                    let function = self.parse_top_level_expr().await?;
                    return Ok(Some(AnyAst::Function(function)));
                }
            }
        }
    }

    pub async fn parse_semicolon(&mut self) -> Result<(), ParserError> {
        self.eat_char(';', "';'").await
    }

    pub async fn parse_eof(&mut self) -> Result<(), ParserError> {
        self.eat_keyword(Token::EOF, "end of input").await
    }

    /// Consumes one token whatever it is.
    /// - Used by drivers to get past a token that failed to parse.
    pub async fn skip_token(&mut self) -> Token {
        self.take_token().await
    }

    async fn eat_char(&mut self, c: char, expected: &'static str) -> Result<(), ParserError> {
        match self.peek_token().await {
            Token::Char(found) if *found == c => {
                self.take_token().await;
                Ok(())
            }
            _ => Err(self.expected(expected).await),
        }
    }

    async fn eat_keyword(&mut self, keyword: Token, expected: &'static str) -> Result<(), ParserError> {
        if *self.peek_token().await != keyword {
            return Err(self.expected(expected).await);
        }
        self.take_token().await;
        Ok(())
    }

    /// Builds the error for the current token without consuming it.
    async fn expected(&mut self, expected: &'static str) -> ParserError {
        let found = self.peek_token().await.clone();
        debug!(expected, %found, "parse error");
        ParserError::Expected { expected, found }
    }

    async fn take_token(&mut self) -> Token {
        self.token_src.take().await
    }

    async fn peek_token(&mut self) -> &Token {
        self.token_src.peek().await
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParserError {
    #[error("expected {expected}, found {found}")]
    Expected {
        expected: &'static str,
        found: Token,
    },
}
