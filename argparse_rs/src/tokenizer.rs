//! Split a line of text into argument tokens.
//!
//! Independent of the parser: feed the result (behind a program name) to
//! [`ArgParser::parse`](crate::ArgParser::parse) to drive a parser from a REPL
//! or a script line.

/// What ends the token being collected.
#[derive(Clone, Copy)]
enum Closer {
    Whitespace,
    Quote(char),
}

impl Closer {
    fn closes(self, c: char) -> bool {
        match self {
            Closer::Whitespace => c.is_whitespace(),
            Closer::Quote(quote) => c == quote,
        }
    }
}

/// Split `line` into tokens.
///
/// - `"..."` and `'...'` runs form one token, quotes excluded
/// - `\` takes the next character literally and is itself dropped
/// - otherwise tokens are whitespace separated
///
/// ```
/// use argparse::string_to_argv;
///
/// assert_eq!(
///     string_to_argv(r#"foo "bar baz" qu\ ux"#),
///     vec!["foo", "bar baz", "qu ux"]
/// );
/// ```
pub fn string_to_argv(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut rest = line.trim();

    while !rest.is_empty() {
        let mut chars = rest.char_indices();
        let mut token = String::new();
        let mut escaped = false;

        let closer = match chars.next() {
            Some((_, '"')) => Closer::Quote('"'),
            Some((_, '\'')) => Closer::Quote('\''),
            Some((_, '\\')) => {
                escaped = true;
                Closer::Whitespace
            }
            Some((_, c)) => {
                token.push(c);
                Closer::Whitespace
            }
            None => break,
        };

        let mut end = rest.len();
        for (pos, c) in chars {
            if !escaped && closer.closes(c) {
                end = pos + c.len_utf8();
                break;
            }
            if c == '\\' && !escaped {
                escaped = true;
            } else {
                token.push(c);
                escaped = false;
            }
        }

        args.push(token);
        rest = rest[end..].trim_start();
    }

    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_quotes_and_escapes() {
        assert_eq!(
            string_to_argv(r#"foo "bar baz" qu\ ux"#),
            vec!["foo", "bar baz", "qu ux"]
        );
    }

    #[test]
    fn trims_and_collapses_whitespace() {
        assert_eq!(string_to_argv("  add \t --title   x  "), vec!["add", "--title", "x"]);
        assert!(string_to_argv("   ").is_empty());
        assert!(string_to_argv("").is_empty());
    }

    #[test]
    fn single_quotes_keep_double_quotes() {
        assert_eq!(
            string_to_argv(r#"say 'he said "hi"'"#),
            vec!["say", r#"he said "hi""#]
        );
    }

    #[test]
    fn escapes_inside_quotes() {
        assert_eq!(string_to_argv(r#""a\"b" c"#), vec![r#"a"b"#, "c"]);
        assert_eq!(string_to_argv(r"a\\b"), vec![r"a\b"]);
    }

    #[test]
    fn leading_escape_and_empty_quotes() {
        assert_eq!(string_to_argv(r#"\"x"#), vec![r#""x"#]);
        assert_eq!(string_to_argv(r#""" x"#), vec!["", "x"]);
    }

    #[test]
    fn unterminated_quote_runs_to_end() {
        assert_eq!(string_to_argv(r#"a "b c"#), vec!["a", "b c"]);
    }

    #[test]
    fn quote_inside_bare_token_is_literal() {
        assert_eq!(string_to_argv(r#"--title="x y""#), vec![r#"--title="x"#, r#"y""#]);
    }
}
