pub mod ast;
pub mod driver;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod token_src;
