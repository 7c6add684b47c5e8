//! Quote- and parenthesis-aware scanning primitives.
//!
//! Everything above this module locates structure in a filter string through
//! these two functions, so quoted literals such as `'Smith AND Sons'` or
//! `"(555) 123"` are never mistaken for operators or grouping.

use super::ast::LogicalOp;

/// Running lexical state while walking a filter string
#[derive(Debug, Default)]
struct ScanState {
    quote: Option<char>,
    escaped: bool,
    depth: i32,
}

impl ScanState {
    /// Feed one character. Returns true when the character sits outside any quoted literal.
    fn step(&mut self, ch: char) -> bool {
        if self.escaped {
            self.escaped = false;
            return false;
        }
        // Backslash escapes only inside a quoted literal
        if ch == '\\' && self.quote.is_some() {
            self.escaped = true;
            return false;
        }

        match self.quote {
            Some(open) => {
                if ch == open {
                    self.quote = None;
                }
                false
            }
            None => match ch {
                '\'' | '"' => {
                    self.quote = Some(ch);
                    false
                }
                '(' => {
                    self.depth += 1;
                    true
                }
                ')' => {
                    self.depth -= 1;
                    true
                }
                _ => true,
            },
        }
    }

    fn at_top_level(&self) -> bool {
        self.quote.is_none() && self.depth == 0
    }
}

/// Find the first top-level occurrence of a logical operator keyword
///
/// A match is a run of one or more whitespace characters, the keyword
/// (case-insensitive), then one or more whitespace characters, starting at a
/// position outside quotes and at parenthesis depth zero.
///
/// Returns the byte range `(start, end)` of the whole whitespace+keyword+whitespace run.
///
/// # Examples
///
/// ```
/// use oneroster_filter::filters::ast::LogicalOp;
/// use oneroster_filter::filters::scanner::find_top_level_operator;
///
/// let s = "name='Smith AND Sons' and status='active'";
/// let (start, end) = find_top_level_operator(s, LogicalOp::And).unwrap();
/// assert_eq!(&s[start..end], " and ");
/// ```
pub fn find_top_level_operator(s: &str, op: LogicalOp) -> Option<(usize, usize)> {
    let keyword = op.keyword();
    let mut state = ScanState::default();
    let mut prev_whitespace = false;

    for (i, ch) in s.char_indices() {
        let outside_quotes = state.step(ch);
        let run_start = ch.is_whitespace() && !prev_whitespace;
        prev_whitespace = ch.is_whitespace();

        // Later positions in a whitespace run reach the same keyword
        if !outside_quotes || !state.at_top_level() || !run_start {
            continue;
        }
        if let Some(end) = match_keyword_at(s, i, keyword) {
            return Some((i, end));
        }
    }

    None
}

/// Match `\s+KEYWORD\s+` at byte offset `start`, returning the end offset
fn match_keyword_at(s: &str, start: usize, keyword: &str) -> Option<usize> {
    let rest = &s[start..];
    let after_lead = rest.trim_start();
    let lead = rest.len() - after_lead.len();
    if lead == 0 {
        return None;
    }

    // `get` also rejects a slice that would split a multi-byte character
    let candidate = after_lead.get(..keyword.len())?;
    if !candidate.eq_ignore_ascii_case(keyword) {
        return None;
    }

    let tail = &after_lead[keyword.len()..];
    let trail = tail.len() - tail.trim_start().len();
    if trail == 0 {
        return None;
    }

    Some(start + lead + keyword.len() + trail)
}

/// Check whether `s` is enclosed by a single matching pair of parentheses
///
/// `(a OR b)` is fully wrapped; `(a)(b)` and `(a) AND (b)` are not, because
/// the opening parenthesis closes before the final character.
pub fn is_fully_wrapped(s: &str) -> bool {
    if s.len() < 2 || !s.starts_with('(') || !s.ends_with(')') {
        return false;
    }

    let last = s.len() - 1;
    let mut state = ScanState::default();

    for (i, ch) in s.char_indices() {
        if state.step(ch) && ch == ')' && state.depth == 0 {
            return i == last;
        }
    }

    false
}
