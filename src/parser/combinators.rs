use nom::{
    bytes::complete::is_not,
    character::complete::{multispace0, multispace1},
    multi::separated_list0,
    sequence::delimited,
    IResult,
    Parser,
};

use super::ast::Token;

// ── Low-level nom parsers ──────────────────────────────────────────────────

/// A run of non-whitespace characters. No quoting: every other character,
/// `|` included, is part of the word.
pub fn parse_word(input: &str) -> IResult<&str, &str> {
    is_not(" \t\r\n")(input)
}

/// All words of a line, with leading, trailing and repeated whitespace
/// skipped.
pub fn parse_words(input: &str) -> IResult<&str, Vec<&str>> {
    delimited(multispace0, separated_list0(multispace1, parse_word), multispace0).parse(input)
}

// ── Token stream ───────────────────────────────────────────────────────────

/// Split `line` into classified tokens, terminated by a single
/// [`Token::EndOfLine`].
pub fn tokenize(line: &str) -> Vec<Token<'_>> {
    let words = parse_words(line).map(|(_, words)| words).unwrap_or_default();
    words
        .into_iter()
        .map(Token::classify)
        .chain(std::iter::once(Token::EndOfLine))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_simple() {
        assert_eq!(
            tokenize("ls -l data"),
            vec![Token::Word("ls"), Token::Word("-l"), Token::Word("data"), Token::EndOfLine]
        );
    }

    #[test]
    fn test_tokenize_squeezes_whitespace() {
        assert_eq!(
            tokenize("  cat \t file   "),
            vec![Token::Word("cat"), Token::Word("file"), Token::EndOfLine]
        );
    }

    #[test]
    fn test_tokenize_pipe() {
        assert_eq!(
            tokenize("a | b"),
            vec![Token::Word("a"), Token::Pipe, Token::Word("b"), Token::EndOfLine]
        );
    }

    #[test]
    fn test_embedded_pipe_is_a_word() {
        assert_eq!(
            tokenize("a|b ||"),
            vec![Token::Word("a|b"), Token::Word("||"), Token::EndOfLine]
        );
    }

    #[test]
    fn test_tokenize_empty() {
        assert_eq!(tokenize(""), vec![Token::EndOfLine]);
        assert_eq!(tokenize("   "), vec![Token::EndOfLine]);
    }
}
