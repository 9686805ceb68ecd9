//! Tcl word-level helpers: quoting, command splitting and boolean parsing.
//!
//! Every host value interpolated into a script must go through [`quote`].
//! [`split_commands`] is the inverse used by the headless interpreter and by
//! the rc-file loader; it understands braces, double quotes, backslash
//! escapes, `;`/newline command separators and `#` comments, but performs no
//! `$` or `[...]` substitution.

use std::fmt::Write as _;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::InterpError;

// ── Quoting ───────────────────────────────────────────────────────────────────

/// Words made only of these characters are passed through unquoted.
fn bareword() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.:,/@%+=-]+$").expect("static regex"))
}

/// Quote `s` so that it is parsed back as exactly one word with no
/// substitution applied.
///
/// Safe barewords are returned unchanged; anything else is wrapped in
/// double quotes with `\ " $ [ ] { }` and control characters escaped.
pub fn quote(s: &str) -> String {
    if bareword().is_match(s) {
        return s.to_owned();
    }
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' | '"' | '$' | '[' | ']' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

// ── Command splitting ─────────────────────────────────────────────────────────

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\r'
}

fn is_word_end(c: char) -> bool {
    is_blank(c) || c == '\n' || c == ';'
}

/// Decode one backslash sequence; the leading `\` has been consumed.
fn push_escape(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, out: &mut String) {
    let Some(c) = chars.next() else {
        out.push('\\');
        return;
    };
    match c {
        'n' => out.push('\n'),
        't' => out.push('\t'),
        'r' => out.push('\r'),
        'a' => out.push('\x07'),
        'b' => out.push('\x08'),
        'f' => out.push('\x0c'),
        'v' => out.push('\x0b'),
        'x' | 'u' => {
            let max = if c == 'x' { 2 } else { 4 };
            let mut digits = String::new();
            while digits.len() < max {
                match chars.peek() {
                    Some(d) if d.is_ascii_hexdigit() => {
                        digits.push(*d);
                        chars.next();
                    }
                    _ => break,
                }
            }
            match u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32) {
                Some(decoded) => out.push(decoded),
                // `\x` or `\u` with no digits stands for the letter itself.
                None => out.push(c),
            }
        }
        '\n' => {
            // Line continuation: newline plus leading blanks become one space.
            while chars.peek().is_some_and(|c| is_blank(*c)) {
                chars.next();
            }
            out.push(' ');
        }
        other => out.push(other),
    }
}

/// Split a script into commands, each a list of words.
pub fn split_commands(script: &str) -> Result<Vec<Vec<String>>, InterpError> {
    let mut commands = Vec::new();
    let mut words: Vec<String> = Vec::new();
    let mut chars = script.chars().peekable();

    while let Some(&ch) = chars.peek() {
        match ch {
            c if is_blank(c) => {
                chars.next();
            }
            '\n' | ';' => {
                chars.next();
                if !words.is_empty() {
                    commands.push(std::mem::take(&mut words));
                }
            }
            '#' if words.is_empty() => {
                while chars.next().is_some_and(|c| c != '\n') {}
            }
            '\\' if chars.clone().nth(1) == Some('\n') => {
                chars.next();
                chars.next();
            }
            '{' => {
                chars.next();
                let mut word = String::new();
                let mut depth = 1usize;
                loop {
                    match chars.next() {
                        None => return Err(InterpError::Script("missing close-brace".into())),
                        Some('\\') => {
                            // Escapes stay verbatim inside braces.
                            word.push('\\');
                            if let Some(next) = chars.next() {
                                word.push(next);
                            }
                        }
                        Some('{') => {
                            depth += 1;
                            word.push('{');
                        }
                        Some('}') => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                            word.push('}');
                        }
                        Some(c) => word.push(c),
                    }
                }
                if chars.peek().is_some_and(|c| !is_word_end(*c)) {
                    return Err(InterpError::Script(
                        "extra characters after close-brace".into(),
                    ));
                }
                words.push(word);
            }
            '"' => {
                chars.next();
                let mut word = String::new();
                loop {
                    match chars.next() {
                        None => return Err(InterpError::Script("missing \"".into())),
                        Some('\\') => push_escape(&mut chars, &mut word),
                        Some('"') => break,
                        Some(c) => word.push(c),
                    }
                }
                if chars.peek().is_some_and(|c| !is_word_end(*c)) {
                    return Err(InterpError::Script(
                        "extra characters after close-quote".into(),
                    ));
                }
                words.push(word);
            }
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if is_word_end(c) {
                        break;
                    }
                    chars.next();
                    if c == '\\' {
                        push_escape(&mut chars, &mut word);
                    } else {
                        word.push(c);
                    }
                }
                words.push(word);
            }
        }
    }
    if !words.is_empty() {
        commands.push(words);
    }
    Ok(commands)
}

// ── Booleans ──────────────────────────────────────────────────────────────────

/// Parse a Tcl boolean.
///
/// Accepts any number (non-zero is true) and, case-insensitively, unique
/// abbreviations of `true`/`false`/`yes`/`no` plus `on`/`off`.
/// Returns `None` for anything else, including the empty string.
pub fn parse_bool(s: &str) -> Option<bool> {
    let s = s.trim();
    let first = s.chars().next()?;
    if first.is_ascii_digit() || matches!(first, '+' | '-' | '.') {
        if let Ok(n) = s.parse::<i64>() {
            return Some(n != 0);
        }
        return s.parse::<f64>().ok().map(|x| x != 0.0);
    }

    const WORDS: [(&str, bool); 6] = [
        ("true", true),
        ("yes", true),
        ("on", true),
        ("false", false),
        ("no", false),
        ("off", false),
    ];
    let lower = s.to_ascii_lowercase();
    let mut found: Option<bool> = None;
    for (word, truth) in WORDS {
        if word.starts_with(&lower) {
            match found {
                Some(prev) if prev != truth => return None,
                _ => found = Some(truth),
            }
        }
    }
    found
}

// ── Tests ─────────────────────────────────────────────────────────────────────
