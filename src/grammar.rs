//! Parser for the declaration reference grammar used inside `{@link}` tags.
//!
//! Every production takes `(source, pos, end)` as byte offsets into `source`
//! and returns the parsed value with the position just past it, or `None`.
//! Productions never backtrack and never panic on malformed input.

use crate::types::{
    ComponentPath, DeclarationReference, Meaning, MeaningKeyword, Navigation, ResolutionStart,
    SymbolReference,
};

/// Characters that end a line and may not appear unescaped in strings.
const LINE_TERMINATORS: &str = "\r\n\u{2028}\u{2029}";

/// Structural punctuators of the grammar.
const PUNCTUATORS: &str = "{}()[]!.#~:,";

/// Punctuators reserved for future grammar extensions.
const RESERVED_PUNCTUATORS: &str = "{}@";

/// Largest Unicode scalar value accepted by `\u{...}`.
const MAX_CODE_POINT: u32 = 0x0010_FFFF;

// ── Character helpers ─────────────────────────────────────────────────

/// The character starting at byte `pos`, if it lies before `end`.
fn char_at(source: &str, pos: usize, end: usize) -> Option<char> {
    let end = end.min(source.len());
    if pos >= end {
        return None;
    }
    return source.get(pos..end)?.chars().next();
}

/// Advance from `pos` over every character satisfying `keep`, returning the stop position.
fn scan_while(source: &str, pos: usize, end: usize, keep: impl Fn(char) -> bool) -> usize {
    let mut lookahead = pos;
    while let Some(c) = char_at(source, lookahead, end) {
        if !keep(c) {
            break;
        }
        lookahead += c.len_utf8();
    }
    return lookahead;
}

fn is_line_terminator(c: char) -> bool {
    return LINE_TERMINATORS.contains(c);
}

/// Unicode `White_Space` plus the byte order mark.
fn is_whitespace(c: char) -> bool {
    return c.is_whitespace() || c == '\u{FEFF}';
}

fn is_label_start(c: char) -> bool {
    return c.is_ascii_alphabetic() || c == '_';
}

fn is_label_char(c: char) -> bool {
    return c.is_ascii_alphanumeric() || c == '_';
}

/// Value of a single-character escape such as `\n`.
const fn single_escape(c: char) -> Option<char> {
    return match c {
        '"' => Some('"'),
        '\'' => Some('\''),
        '\\' => Some('\\'),
        'b' => Some('\u{8}'),
        'f' => Some('\u{C}'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        'v' => Some('\u{B}'),
        _ => None,
    };
}

/// Characters that introduce something other than a literal after `\`.
const fn is_escape_character(c: char) -> bool {
    return single_escape(c).is_some() || c.is_ascii_digit() || c == 'x' || c == 'u';
}

/// Parse `len` hex digits starting at `pos` into a code unit.
fn hex_digits_at(source: &str, pos: usize, len: usize, end: usize) -> Option<u32> {
    let stop = pos.checked_add(len)?;
    if stop > end.min(source.len()) {
        return None;
    }
    let digits = source.get(pos..stop)?;
    if !digits.chars().all(|c| return c.is_ascii_hexdigit()) {
        return None;
    }
    return u32::from_str_radix(digits, 16).ok();
}

// ── Strings and escapes ───────────────────────────────────────────────

/// Parse the escape sequence following a backslash at `pos`.
///
/// Accepts single-character escapes, non-escape characters standing for
/// themselves, `0` not followed by a digit, `x` with two hex digits, and the
/// unicode forms handled by [`parse_unicode_escape_sequence`].
pub fn parse_escape_sequence(source: &str, pos: usize, end: usize) -> Option<(char, usize)> {
    let c = char_at(source, pos, end)?;

    if let Some(escaped) = single_escape(c) {
        return Some((escaped, pos + 1));
    }

    if !is_escape_character(c) && !is_line_terminator(c) {
        return Some((c, pos + c.len_utf8()));
    }

    if c == '0' && char_at(source, pos + 1, end).is_some_and(|next| return !next.is_ascii_digit()) {
        return Some(('\0', pos + 1));
    }

    if c == 'x' {
        let code = hex_digits_at(source, pos + 1, 2, end)?;
        return Some((char::from_u32(code)?, pos + 3));
    }

    return parse_unicode_escape_sequence(source, pos, end);
}

/// Parse `u` followed by exactly four hex digits, or `u{` one or more hex digits `}`.
/// Code points above U+10FFFF and lone surrogates are rejected.
pub fn parse_unicode_escape_sequence(source: &str, pos: usize, end: usize) -> Option<(char, usize)> {
    if char_at(source, pos, end)? != 'u' {
        return None;
    }

    let next = char_at(source, pos + 1, end)?;
    if next.is_ascii_hexdigit() {
        let code = hex_digits_at(source, pos + 1, 4, end)?;
        return Some((char::from_u32(code)?, pos + 5));
    }

    if next != '{' || !char_at(source, pos + 2, end).is_some_and(|c| return c.is_ascii_hexdigit()) {
        return None;
    }

    let close = scan_while(source, pos + 2, end, |c| return c.is_ascii_hexdigit());
    if char_at(source, close, end)? != '}' {
        return None;
    }

    // An overlong digit run overflows u32 and is rejected along with anything above the maximum.
    let code = u32::from_str_radix(source.get(pos + 2..close)?, 16).ok()?;
    if code > MAX_CODE_POINT {
        return None;
    }
    return Some((char::from_u32(code)?, close + 1));
}

/// Parse a double-quoted string with escapes. Raw line terminators end the parse with failure.
pub fn parse_string(source: &str, pos: usize, end: usize) -> Option<(String, usize)> {
    if char_at(source, pos, end)? != '"' {
        return None;
    }

    let mut result = String::new();
    let mut pos = pos + 1;
    while let Some(c) = char_at(source, pos, end) {
        match c {
            '"' => return Some((result, pos + 1)),
            '\\' => {
                let (escaped, next) = parse_escape_sequence(source, pos + 1, end)?;
                result.push(escaped);
                pos = next;
            },
            _ if is_line_terminator(c) => return None,
            _ => {
                result.push(c);
                pos += c.len_utf8();
            },
        }
    }

    // Unterminated.
    return None;
}

// ── Reference productions ─────────────────────────────────────────────

/// Parse a module source: a quoted string, or a run of characters up to `"`, `!`
/// or a line terminator.
pub fn parse_module_source(source: &str, pos: usize, end: usize) -> Option<(String, usize)> {
    if char_at(source, pos, end)? == '"' {
        return parse_string(source, pos, end);
    }

    let lookahead = scan_while(source, pos, end, |c| {
        return c != '"' && c != '!' && !is_line_terminator(c);
    });
    if lookahead == pos {
        return None;
    }
    return Some((source.get(pos..lookahead)?.to_string(), lookahead));
}

/// Parse one path component: a quoted string, or a run free of punctuators,
/// reserved characters, line terminators and whitespace. A quote inside an
/// unquoted run is an ordinary character.
pub fn parse_component(source: &str, pos: usize, end: usize) -> Option<(String, usize)> {
    if char_at(source, pos, end)? == '"' {
        return parse_string(source, pos, end);
    }

    let lookahead = scan_while(source, pos, end, |c| {
        return !PUNCTUATORS.contains(c)
            && !RESERVED_PUNCTUATORS.contains(c)
            && !is_line_terminator(c)
            && !is_whitespace(c);
    });
    if lookahead == pos {
        return None;
    }
    return Some((source.get(pos..lookahead)?.to_string(), lookahead));
}

/// Parse `Component (('.' | '#' | '~') Component)*`.
///
/// The first component is recorded with `.` navigation. A navigation
/// character with no component after it fails the whole path.
pub fn parse_component_path(source: &str, pos: usize, end: usize) -> Option<(Vec<ComponentPath>, usize)> {
    let (first, mut pos) = parse_component(source, pos, end)?;
    let mut components = vec![ComponentPath::new(Navigation::Exports, first)];

    while let Some(navigation) = char_at(source, pos, end).and_then(Navigation::from_char) {
        let (name, next) = parse_component(source, pos + 1, end)?;
        components.push(ComponentPath::new(navigation, name));
        pos = next;
    }

    return Some((components, pos));
}

/// Parse a digit run between `pos` and the first non-digit. `None` on overflow.
fn parse_digits(source: &str, pos: usize, end: usize) -> Option<(usize, usize)> {
    let lookahead = scan_while(source, pos, end, |c| return c.is_ascii_digit());
    if lookahead == pos {
        return None;
    }
    let value = source.get(pos..lookahead)?.parse::<usize>().ok()?;
    return Some((value, lookahead));
}

/// Parse `:` followed by a keyword with optional `(index)`, a user label,
/// `(index)`, or a bare index.
pub fn parse_meaning(source: &str, pos: usize, end: usize) -> Option<(Meaning, usize)> {
    if char_at(source, pos, end)? != ':' {
        return None;
    }
    let mut pos = pos + 1;

    let rest = source.get(pos..end.min(source.len())).unwrap_or("");
    let keyword = MeaningKeyword::ALL
        .into_iter()
        .find(|kw| return rest.starts_with(kw.as_str()));
    if let Some(kw) = keyword {
        pos += kw.as_str().len();
    }

    if keyword.is_none() && char_at(source, pos, end).is_some_and(is_label_start) {
        let lookahead = scan_while(source, pos + 1, end, is_label_char);
        let label = source.get(pos..lookahead)?.to_string();
        return Some((
            Meaning {
                label: Some(label),
                ..Meaning::default()
            },
            lookahead,
        ));
    }

    if char_at(source, pos, end) == Some('(') {
        if let Some((index, close)) = parse_digits(source, pos + 1, end) {
            if char_at(source, close, end) == Some(')') {
                return Some((
                    Meaning {
                        index: Some(index),
                        keyword,
                        label: None,
                    },
                    close + 1,
                ));
            }
        }
    }

    if keyword.is_none() {
        let (index, next) = parse_digits(source, pos, end)?;
        return Some((
            Meaning {
                index: Some(index),
                ..Meaning::default()
            },
            next,
        ));
    }

    return keyword.map(|kw| {
        return (
            Meaning {
                keyword: Some(kw),
                ..Meaning::default()
            },
            pos,
        );
    });
}

/// Parse an optional component path followed by an optional meaning.
/// Fails only when both are absent.
pub fn parse_symbol_reference(source: &str, pos: usize, end: usize) -> Option<(SymbolReference, usize)> {
    let path = parse_component_path(source, pos, end);
    let pos = path.as_ref().map_or(pos, |(_, next)| return *next);

    let meaning = parse_meaning(source, pos, end);
    let pos = meaning.as_ref().map_or(pos, |(_, next)| return *next);

    if path.is_none() && meaning.is_none() {
        return None;
    }

    return Some((
        SymbolReference {
            meaning: meaning.map(|(m, _)| return m),
            path: path.map(|(p, _)| return p),
        },
        pos,
    ));
}

/// Parse a full declaration reference starting at `pos`.
///
/// A module source and a local symbol path share the same lexical shape
/// until a `!` shows up, so the module source is committed to only when it
/// is immediately followed by `!`. Inputs with a `!` inside what was meant
/// as a plain symbol path therefore parse as module-qualified.
pub fn parse_declaration_reference(
    source: &str,
    pos: usize,
    end: usize,
) -> Option<(DeclarationReference, usize)> {
    let mut pos = pos;
    let mut module_source = None;
    let mut resolution_start = ResolutionStart::Local;
    // `module!~name` looks `name` up among the module's locals.
    let mut module_local = false;

    match parse_module_source(source, pos, end) {
        Some((module, next)) => {
            if char_at(source, next, end) == Some('!') {
                pos = next + 1;
                resolution_start = ResolutionStart::Global;
                module_source = Some(module);
                if char_at(source, pos, end) == Some('~') {
                    pos += 1;
                    module_local = true;
                }
            }
        },
        None => {
            if char_at(source, pos, end) == Some('!') {
                pos += 1;
                resolution_start = ResolutionStart::Global;
            }
        },
    }

    let symbol_reference = match parse_symbol_reference(source, pos, end) {
        Some((mut symbol, next)) => {
            pos = next;
            if module_local {
                if let Some(first) = symbol.path.as_mut().and_then(|p| return p.first_mut()) {
                    first.navigation = Navigation::Locals;
                }
            }
            Some(symbol)
        },
        None => None,
    };

    if module_source.is_none() && symbol_reference.is_none() {
        return None;
    }

    return Some((
        DeclarationReference {
            module_source,
            resolution_start,
            symbol_reference,
        },
        pos,
    ));
}

/// Parse a whole string as a declaration reference, returning the consumed length too.
pub fn parse(text: &str) -> Option<(DeclarationReference, usize)> {
    return parse_declaration_reference(text, 0, text.len());
}
