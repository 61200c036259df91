//! Lettering rules checked when parsers, groups and arguments are registered.

pub fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
}

/// Parser and group names: a letter first, then letters and `-`.
pub fn is_valid_group_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_letter(first) => chars.all(|c| is_letter(c) || c == '-'),
        _ => false,
    }
}

/// Argument names. Empty is allowed (shortcut-only flags). Short names must
/// start with a letter; longer ones with a letter or with the doubled prefix
/// and a letter. Only letters, `-` and the prefix may follow.
pub fn is_valid_flag_name(name: &str, prefix: char) -> bool {
    let chars: Vec<char> = name.chars().collect();

    if chars.is_empty() {
        return true;
    }

    let starts_ok = if chars.len() < 3 {
        is_letter(chars[0])
    } else {
        let long = chars[0] == prefix && chars[1] == prefix && is_letter(chars[2]);
        long || is_letter(chars[0])
    };

    starts_ok
        && chars.iter().any(|c| is_letter(*c))
        && chars
            .iter()
            .all(|c| is_letter(*c) || *c == '-' || *c == prefix)
}

pub fn is_valid_shortcut(shortcut: char) -> bool {
    is_letter(shortcut)
}

/// Flag prefixes must not collide with names, values or the `=` separator.
pub fn is_valid_prefix(prefix: char) -> bool {
    !(prefix.is_alphanumeric() || prefix.is_whitespace() || prefix == '=')
}

/// Positional names are non-empty and do not start with the doubled prefix.
pub fn is_positional_name(name: &str, prefix: char) -> bool {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (None, _) => false,
        (Some(first), Some(second)) => !(first == prefix && second == prefix),
        (Some(_), None) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_names() {
        assert!(is_valid_group_name("mode"));
        assert!(is_valid_group_name("output-format"));
        assert!(!is_valid_group_name(""));
        assert!(!is_valid_group_name("-mode"));
        assert!(!is_valid_group_name("mode2"));
    }

    #[test]
    fn prefixes() {
        assert!(is_valid_prefix('-'));
        assert!(is_valid_prefix('+'));
        assert!(is_valid_prefix('/'));
        assert!(!is_valid_prefix('='));
        assert!(!is_valid_prefix('a'));
        assert!(!is_valid_prefix('7'));
        assert!(!is_valid_prefix(' '));
        assert!(!is_valid_prefix('\t'));
    }

    #[test]
    fn flag_names() {
        assert!(is_valid_flag_name("", '-'));
        assert!(is_valid_flag_name("--count", '-'));
        assert!(is_valid_flag_name("--dry-run", '-'));
        assert!(is_valid_flag_name("file", '-'));
        assert!(is_valid_flag_name("ab", '-'));
        assert!(is_valid_flag_name("++count", '+'));

        assert!(!is_valid_flag_name("-x", '-'));
        assert!(!is_valid_flag_name("--", '-'));
        assert!(!is_valid_flag_name("--1x", '-'));
        assert!(!is_valid_flag_name("--count2", '-'));
        assert!(!is_valid_flag_name("--a_b", '-'));
    }

    #[test]
    fn positional_names() {
        assert!(is_positional_name("file", '-'));
        assert!(is_positional_name("f", '-'));
        assert!(!is_positional_name("--file", '-'));
        assert!(!is_positional_name("", '-'));
        assert!(is_positional_name("--file", '+'));
    }

    #[test]
    fn shortcuts() {
        assert!(is_valid_shortcut('x'));
        assert!(is_valid_shortcut('X'));
        assert!(!is_valid_shortcut('1'));
        assert!(!is_valid_shortcut('='));
    }
}
