//! Documentation comment parser — line-by-line section state machine.
//!
//! Splits a raw comment block into a main description plus tagged
//! sections: `@param`, `@return`, `@throws`, `@see`, and a catch-all
//! for every other `@tag`. Tokenizes by leading tag keyword only;
//! inline markup is passed through verbatim.

use kdoc_model::{DocComment, ParamDoc, TagDoc, ThrowsDoc};
use regex::Regex;
use std::sync::LazyLock;

// -- Line classifiers ---------------------------------------------------------

// Leading documentation-block decoration: a run of `*`, space, tab.
static RE_DECOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[ \t*]+").unwrap());

static RE_PARAM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^@param (.*)$").unwrap());

static RE_RETURN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^@return (.*)$").unwrap());

static RE_THROWS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^@throws (.*)$").unwrap());

static RE_SEE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^@see (.*)$").unwrap());

// -- Parser state -------------------------------------------------------------

#[derive(Clone, Copy, PartialEq, Eq, Default)]
enum Section {
    /// Free text before the first tag.
    #[default]
    Main,
    Param,
    Return,
    Throws,
    See,
    /// Unrecognized `@tag`; the buffer holds the full tag line.
    Other,
}

#[derive(Default)]
struct ParserState {
    out: DocComment,
    section: Section,
    buffer: Vec<String>,
}

// -- Public API ---------------------------------------------------------------

/// Parse a raw documentation comment into its sections.
///
/// `None` and blank input yield the canonical empty value. Malformed
/// tag lines (a `@param`/`@throws` with no description after the name)
/// are dropped, not reported. This function is total: it never errors.
pub fn parse(raw: Option<&str>) -> DocComment {
    let Some(raw) = raw else {
        return DocComment::default();
    };

    let mut state = ParserState::default();
    for line in raw.lines() {
        let line = RE_DECOR.replace(line, "").into_owned();
        process_line(&mut state, line);
    }
    flush(&mut state);
    state.out
}

// -- Line processing ----------------------------------------------------------

fn process_line(state: &mut ParserState, line: String) {
    if let Some(caps) = RE_PARAM.captures(&line) {
        open(state, Section::Param, caps[1].to_string());
    } else if let Some(caps) = RE_RETURN.captures(&line) {
        open(state, Section::Return, caps[1].to_string());
    } else if let Some(caps) = RE_THROWS.captures(&line) {
        open(state, Section::Throws, caps[1].to_string());
    } else if let Some(caps) = RE_SEE.captures(&line) {
        open(state, Section::See, caps[1].to_string());
    } else if line.starts_with('@') {
        // Unrecognized tag: the whole line, tag included, seeds the
        // section so the flush can split out the tag name.
        open(state, Section::Other, line);
    } else {
        // Continuation line (blank lines included) for whichever
        // section is open; main text accumulates here too.
        state.buffer.push(line);
    }
}

/// Close the current section and start `section` seeded with `seed`.
fn open(state: &mut ParserState, section: Section, seed: String) {
    flush(state);
    state.section = section;
    state.buffer.push(seed);
}

/// Move the accumulated buffer into the section's target field.
fn flush(state: &mut ParserState) {
    let lines = std::mem::take(&mut state.buffer);

    match state.section {
        Section::Main => {
            let text = lines.join("\n");
            let text = text.trim();
            if !text.is_empty() {
                if state.out.text.is_empty() {
                    state.out.text = text.to_string();
                } else {
                    state.out.text.push('\n');
                    state.out.text.push_str(text);
                }
            }
        }
        Section::Param => {
            if let Some((name, comment)) = split_named_entry(lines) {
                state.out.params.push(ParamDoc { name, comment });
            }
        }
        Section::Return => {
            // A later @return overwrites an earlier one.
            state.out.returns = lines.join("\n").trim().to_string();
        }
        Section::Throws => {
            if let Some((name, comment)) = split_named_entry(lines) {
                state.out.throws.push(ThrowsDoc { name, comment });
            }
        }
        Section::See => {
            state.out.see_also.push(lines.join("\n").trim().to_string());
        }
        Section::Other => {
            let mut lines = lines.into_iter();
            let first = lines.next().unwrap_or_default();
            let after_at = first.strip_prefix('@').unwrap_or(&first);
            let (tag, first_rest) = match after_at.split_once(' ') {
                Some((tag, rest)) => (tag.to_string(), rest.to_string()),
                None => (after_at.to_string(), String::new()),
            };
            // Continuation lines are newline-joined among themselves,
            // but no newline separates them from the first-line
            // remainder. Kept as-is; see DESIGN.md.
            let mut comment = first_rest;
            comment.push_str(&lines.collect::<Vec<_>>().join("\n"));
            state.out.other.push(TagDoc {
                tag,
                comment: comment.trim().to_string(),
            });
        }
    }

    state.section = Section::Main;
}

/// Split a `name description...` buffer into its name token and the
/// newline-joined description. A first line with no space has no
/// description to attach; the whole entry is dropped.
fn split_named_entry(lines: Vec<String>) -> Option<(String, String)> {
    let mut lines = lines.into_iter();
    let first = lines.next().unwrap_or_default();
    let (name, rest) = first.split_once(' ')?;

    let mut parts = vec![rest.to_string()];
    parts.extend(lines);
    Some((name.to_string(), parts.join("\n").trim().to_string()))
}
