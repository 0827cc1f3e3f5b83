extern crate futures;

use std::io;
use std::thread;

use futures::channel::mpsc::channel;
use futures::{SinkExt, Stream};
use kaleidoscope_frontend::ast::AnyAst;
use kaleidoscope_frontend::driver::{Driver, Step};
use kaleidoscope_frontend::parser::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut stdin = stdin();

    let parser = Parser::from_char_stream(&mut stdin);
    let mut driver = Driver::new(parser, io::stderr());

    let task = async {
        loop {
            eprint!("ready> ");

            // Parse an AST from the input stream.
            let any_ast = match driver.step().await {
                Step::Parsed(any_ast) => any_ast,
                // Already reported on stderr by the driver.
                Step::Failed(_) => continue,
                Step::Done => break,
            };

            // Print the parsed unit.
            match &any_ast {
                AnyAst::Prototype(_) => println!("; extern: {}", any_ast),
                AnyAst::Function(_) if any_ast.is_top_level_expr() => {
                    println!("; top-level expression: {}", any_ast)
                }
                AnyAst::Function(_) => println!("; definition: {}", any_ast),
            }
        }
    };

    futures::executor::block_on(task);
}

fn stdin() -> impl Stream<Item = char> + Unpin + Send {
    let (mut tx, rx) = channel(1);
    thread::spawn(move || {
        let task = async {
            let input = io::stdin();

            let lines = input.lines();

            for res in lines {
                let line = match res {
                    Ok(line) => line,
                    Err(e) => {
                        eprintln!("Error(stdin): {}", e);
                        break;
                    }
                };

                let send = async {
                    for c in line.chars() {
                        tx.feed(c).await?;
                    }
                    tx.feed('\n').await?;
                    tx.flush().await
                };
                if let Err(e) = send.await {
                    eprintln!("Error(stdin): {}", e);
                    break;
                }
            }
        };

        futures::executor::block_on(task);
    });

    rx
}
