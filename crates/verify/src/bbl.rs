// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Minimal brace-aware scanner over a compiled `.bbl`. Not a full LaTeX
//! grammar: it only needs to recover two things reliably — the entry
//! label of each bibliography item, and the item's rendered body text —
//! which `\bibitem{key}...` (classic BibTeX) and `\entry{key}{type}{...}`
//! (biblatex package) both expose as the first brace group after the
//! command name. Brace matching instead of pattern matching keeps this
//! correct across nested braces in author names and titles.

const ENTRY_COMMANDS: &[&str] = &["bibitem", "entry"];

/// One bibliography item as it appears in the compiled `.bbl`: its label
/// (the BibTeX key LaTeX resolved it to) and the raw text of the item's
/// body, used for defect-pattern scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BblItem {
    pub key: String,
    pub body: String,
}

pub fn parse(bbl_text: &str) -> Vec<BblItem> {
    let chars: Vec<char> = bbl_text.chars().collect();
    let mut items = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '\\' {
            if let Some((command, after_command)) = read_command_name(&chars, i + 1) {
                if ENTRY_COMMANDS.contains(&command.as_str()) {
                    let mut cursor = after_command;
                    // `\bibitem` may carry an optional `[label]` before the
                    // required `{key}` group; skip it if present.
                    if cursor < chars.len() && chars[cursor] == '[' {
                        if let Some(end) = skip_bracket_group(&chars, cursor) {
                            cursor = end;
                        }
                    }
                    if let Some((key, end)) = read_brace_group(&chars, cursor) {
                        let body_end = next_item_start(&chars, end).unwrap_or(chars.len());
                        let body: String = chars[end..body_end].iter().collect();
                        items.push(BblItem { key, body });
                        i = end;
                        continue;
                    }
                }
            }
        }
        i += 1;
    }

    items
}

fn read_command_name(chars: &[char], start: usize) -> Option<(String, usize)> {
    let mut end = start;
    while end < chars.len() && chars[end].is_ascii_alphabetic() {
        end += 1;
    }
    if end == start {
        return None;
    }
    Some((chars[start..end].iter().collect(), end))
}

fn skip_bracket_group(chars: &[char], start: usize) -> Option<usize> {
    if chars.get(start) != Some(&'[') {
        return None;
    }
    let mut i = start + 1;
    while i < chars.len() && chars[i] != ']' {
        i += 1;
    }
    (i < chars.len()).then_some(i + 1)
}

/// Reads the first balanced `{...}` group starting at or after `start`,
/// skipping whitespace in between. Returns the group's inner text and the
/// index just past the closing brace.
fn read_brace_group(chars: &[char], start: usize) -> Option<(String, usize)> {
    let mut i = start;
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    if chars.get(i) != Some(&'{') {
        return None;
    }
    let content_start = i + 1;
    let mut depth = 1;
    i = content_start;
    while i < chars.len() && depth > 0 {
        match chars[i] {
            '{' => depth += 1,
            '}' => depth -= 1,
            _ => {}
        }
        i += 1;
    }
    if depth != 0 {
        return None;
    }
    let content: String = chars[content_start..i - 1].iter().collect();
    Some((content, i))
}

fn next_item_start(chars: &[char], from: usize) -> Option<usize> {
    let mut i = from;
    while i < chars.len() {
        if chars[i] == '\\' {
            if let Some((command, _)) = read_command_name(chars, i + 1) {
                if ENTRY_COMMANDS.contains(&command.as_str()) {
                    return Some(i);
                }
            }
        }
        i += 1;
    }
    None
}
