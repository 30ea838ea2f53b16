//! Parser for command lines
//!
//! Turns the lexer's token stream into a [`CommandLine`].

use crate::ast::*;
use crate::lexer::{tokenize, Token};
use chumsky::prelude::*;
use subspace_sdk::{ShellError, ShellResult};

/// Parse `|`-separated stages. Each stage is a program name followed by
/// its arguments; empty stages are rejected.
pub fn pipeline() -> impl Parser<Token, Vec<PipelineSegment>, Error = Simple<Token>> {
    let word = select! { Token::Word(w) => w };

    let segment = word
        .then(word.repeated())
        .map(|(command, args)| PipelineSegment::new(command, args));

    segment
        .separated_by(just(Token::Pipe))
        .at_least(1)
        .then_ignore(end())
}

/// Split off the redirection clause, if any.
///
/// `>>` is looked for before `>`. A line may carry one redirection and it
/// must be followed by exactly one target word.
fn split_redirection(mut tokens: Vec<Token>) -> ShellResult<(Vec<Token>, Option<Redirection>)> {
    if tokens.iter().filter(|t| t.is_redirect()).count() > 1 {
        return Err(ShellError::TooManyRedirections);
    }

    let position = tokens
        .iter()
        .position(|t| *t == Token::RedirectAppend)
        .or_else(|| tokens.iter().position(|t| *t == Token::RedirectOut));
    let Some(at) = position else {
        return Ok((tokens, None));
    };

    let mut tail = tokens.split_off(at).into_iter();
    let mode = match tail.next() {
        Some(Token::RedirectAppend) => RedirectMode::Append,
        _ => RedirectMode::Overwrite,
    };
    let target = match (tail.next(), tail.next()) {
        (Some(Token::Word(target)), None) => target,
        _ => {
            return Err(ShellError::syntax(format!(
                "'{}' must be followed by exactly one file name",
                mode
            )))
        }
    };

    Ok((tokens, Some(Redirection { target, mode })))
}

/// Parse input string directly to a command line. A blank line yields
/// `None`.
pub fn parse(input: &str) -> ShellResult<Option<CommandLine>> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Ok(None);
    }

    let (body, redirect) = split_redirection(tokens)?;
    // Only words and pipes remain, so any failure is a missing stage.
    let stages = pipeline()
        .parse(body)
        .map_err(|_| ShellError::syntax("empty pipeline stage"))?;

    Ok(Some(CommandLine { stages, redirect }))
}
