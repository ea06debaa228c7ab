//! Turning source text into fragments.
//!
//! One fragment per line, holding only that line's comment text. Code
//! lines become empty fragments so positions stay aligned with the
//! source; the merge passes drop them.

/// Comment openers, longest first so `///` is not read as `//` + `/`.
const COMMENT_PREFIXES: &[&str] = &["///", "//!", "//", "/**", "/*", "*/", "#", "--", "*"];

const COMMENT_SUFFIX: &str = "*/";

const BLOCK_OPEN: &str = "/*";

/// Openers that start a comment line outside a block. `*` only counts
/// inside `/* ... */`.
const LINE_OPENERS: &[&str] = &["//", "/*", "#", "--"];

/// Attribute syntax that shares the `#` opener.
const ATTRIBUTE_PREFIXES: &[&str] = &["#[", "#!["];

/// Strip one leading comment marker and a trailing block-comment close.
pub fn strip_comment(line: &str) -> &str {
    let mut text = line.trim();
    if let Some(rest) = COMMENT_PREFIXES.iter().find_map(|p| text.strip_prefix(p)) {
        text = rest.trim_start();
    }
    if let Some(rest) = text.strip_suffix(COMMENT_SUFFIX) {
        text = rest;
    }
    text.trim()
}

/// Comment fragments, one per line of `source`.
pub fn fragments(source: &str) -> Vec<String> {
    let mut in_block = false;
    source.lines().map(|line| comment_text(line, &mut in_block).to_string()).collect()
}

/// The comment text of one line, tracking whether a block comment is open.
fn comment_text<'a>(line: &'a str, in_block: &mut bool) -> &'a str {
    let text = line.trim();
    if *in_block {
        if text.contains(COMMENT_SUFFIX) {
            *in_block = false;
        }
        return strip_comment(text);
    }
    if is_comment_line(text) {
        if let Some(body) = text.strip_prefix(BLOCK_OPEN) {
            *in_block = !body.contains(COMMENT_SUFFIX);
        }
        return strip_comment(text);
    }
    trailing_comment(text).map(strip_comment).unwrap_or("")
}

fn is_comment_line(text: &str) -> bool {
    LINE_OPENERS.iter().any(|p| text.starts_with(p))
        && !ATTRIBUTE_PREFIXES.iter().any(|p| text.starts_with(p))
}

/// The `//` or ` # ` comment that trails code on the same line, skipping
/// markers inside string literals.
fn trailing_comment(line: &str) -> Option<&str> {
    let mut in_string = false;
    let mut escaped = false;
    let mut prev = ' ';
    for (i, c) in line.char_indices() {
        let rest = &line[i + c.len_utf8()..];
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            // '"' is a char literal, not a string opener.
            in_string = !(prev == '\'' && rest.starts_with('\''));
        } else if c == '/' && rest.starts_with('/') {
            return Some(&line[i..]);
        } else if c == '#' && prev.is_whitespace() && rest.chars().next().map_or(true, char::is_whitespace) {
            return Some(&line[i..]);
        }
        prev = c;
    }
    None
}

/// Fragments with each line used as written.
pub fn raw_fragments(source: &str) -> Vec<String> {
    source.lines().map(str::to_string).collect()
}
