//! Lexer for command lines
//!
//! Splits a raw line into words and the pipe/redirection operators.

use chumsky::prelude::*;
use subspace_sdk::{ShellError, ShellResult};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    Word(String),

    Pipe,           // |
    RedirectOut,    // >
    RedirectAppend, // >>
}

impl Token {
    pub fn as_word(&self) -> Option<&str> {
        match self {
            Token::Word(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Token::RedirectOut | Token::RedirectAppend)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Word(s) => write!(f, "{}", s),
            Token::Pipe => write!(f, "|"),
            Token::RedirectOut => write!(f, ">"),
            Token::RedirectAppend => write!(f, ">>"),
        }
    }
}

pub fn lexer() -> impl Parser<char, Vec<Token>, Error = Simple<char>> {
    let ws = filter(|c: &char| c.is_whitespace()).repeated();

    // Inside double quotes only \" and \\ are escapes; any other
    // backslash is kept as written.
    let dq_seg = just('"')
        .ignore_then(
            just('\\')
                .then(any())
                .map(|(_b, c): (char, char)| match c {
                    '"' => "\"".to_string(),
                    '\\' => "\\".to_string(),
                    _ => format!("\\{}", c),
                })
                .or(filter(|c: &char| *c != '"' && *c != '\\').map(|c: char| c.to_string()))
                .repeated(),
        )
        .then_ignore(just('"'))
        .map(|parts: Vec<String>| parts.concat());

    let word_char =
        filter(|c: &char| !c.is_whitespace() && !matches!(c, '|' | '>' | '"'));

    let bare_seg = word_char.repeated().at_least(1).collect::<String>();

    // Adjacent bare and quoted segments with no whitespace between them
    // form a single word.
    let word = choice((bare_seg, dq_seg))
        .repeated()
        .at_least(1)
        .map(|segments: Vec<String>| Token::Word(segments.concat()));

    let op = choice((
        just(">>").to(Token::RedirectAppend),
        just('>').to(Token::RedirectOut),
        just('|').to(Token::Pipe),
    ));

    choice((op, word))
        .padded_by(ws)
        .repeated()
        .then_ignore(end())
}

/// Tokenize `input`, reporting the first lexing failure as a syntax error.
pub fn tokenize(input: &str) -> ShellResult<Vec<Token>> {
    lexer().parse(input).map_err(|errs| {
        let reason = errs
            .into_iter()
            .next()
            .map(|e| describe(&e))
            .unwrap_or_else(|| "malformed command line".to_string());
        ShellError::syntax(reason)
    })
}

fn describe(err: &Simple<char>) -> String {
    // A quote always opens a segment, so failing on one (or running out of
    // input mid-token) means it was never closed.
    match err.found().copied() {
        None | Some('"') => "unterminated quote".to_string(),
        Some(c) => format!("unexpected '{}' at column {}", c, err.span().start + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Token> {
        lexer().parse(input).unwrap()
    }

    fn word(s: &str) -> Token {
        Token::Word(s.to_string())
    }

    #[test]
    fn test_simple_command() {
        assert_eq!(lex("mkdir -r /a/b"), vec![word("mkdir"), word("-r"), word("/a/b")]);
    }

    #[test]
    fn test_blank_line() {
        assert!(lex("").is_empty());
        assert!(lex("   \t ").is_empty());
    }

    #[test]
    fn test_quoted_string() {
        assert_eq!(
            lex("echo \"hello   world\""),
            vec![word("echo"), word("hello   world")]
        );
    }

    #[test]
    fn test_escapes_in_quotes() {
        assert_eq!(
            lex(r#"echo "say \"hi\" \\ \n""#),
            vec![word("echo"), word(r#"say "hi" \ \n"#)]
        );
    }

    #[test]
    fn test_adjacent_segments_merge() {
        assert_eq!(lex("echo pre\"fix \"post"), vec![word("echo"), word("prefix post")]);
        assert_eq!(lex("echo \"\""), vec![word("echo"), word("")]);
    }

    #[test]
    fn test_pipeline() {
        assert_eq!(
            lex("echo hi | echo"),
            vec![word("echo"), word("hi"), Token::Pipe, word("echo")]
        );
        assert_eq!(lex("echo hi|echo"), lex("echo hi | echo"));
    }

    #[test]
    fn test_redirection() {
        assert_eq!(
            lex("echo hello > note.txt"),
            vec![word("echo"), word("hello"), Token::RedirectOut, word("note.txt")]
        );
        assert_eq!(
            lex("echo hello>>note.txt"),
            vec![word("echo"), word("hello"), Token::RedirectAppend, word("note.txt")]
        );
    }

    #[test]
    fn test_quoted_operators_are_text() {
        assert_eq!(lex("echo \"a | b > c\""), vec![word("echo"), word("a | b > c")]);
    }

    #[test]
    fn test_unterminated_quote() {
        let err = tokenize("echo \"open").unwrap_err();
        assert!(matches!(err, ShellError::Syntax(_)));
        assert!(err.to_string().contains("unterminated quote"));
    }
}
