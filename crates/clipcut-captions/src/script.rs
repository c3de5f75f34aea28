//! Script Parser (§4.E).
//!
//! Whitespace-tolerant grammar: non-empty lines are `ScriptLine`s in
//! source order. Within a line, `[zoom]`/`[zoom:slow]` place a zoom marker
//! at the current word position; `{word}` wraps a token as a highlight.
//! Unknown bracketed content passes through as literal text.

use clipcut_core::{MarkerKind, MarkerStyle, ScriptLine, ScriptMarker};

/// Parse an author-supplied script into ordered lines. Empty lines
/// separate sentences and are not themselves emitted as lines.
pub fn parse_script(source: &str) -> Vec<ScriptLine> {
    source
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(index, line)| parse_line(index, line))
        .collect()
}

fn parse_line(index: usize, line: &str) -> ScriptLine {
    let chars: Vec<char> = line.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut markers: Vec<ScriptMarker> = Vec::new();
    let mut buffer = String::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '[' => {
                if let Some(rel_close) = chars[i + 1..].iter().position(|&c| c == ']') {
                    let content: String = chars[i + 1..i + 1 + rel_close].iter().collect();
                    i += rel_close + 2;
                    flush(&mut buffer, &mut words);
                    match parse_marker_tag(&content) {
                        Some((kind, style)) => markers.push(ScriptMarker {
                            kind,
                            style,
                            attached_word_index: Some(words.len()),
                        }),
                        // Unknown bracketed content is passed through literally.
                        None => words.push(format!("[{content}]")),
                    }
                } else {
                    buffer.push('[');
                    i += 1;
                }
            }
            '{' => {
                if let Some(rel_close) = chars[i + 1..].iter().position(|&c| c == '}') {
                    let word: String = chars[i + 1..i + 1 + rel_close].iter().collect();
                    i += rel_close + 2;
                    flush(&mut buffer, &mut words);
                    let word_index = words.len();
                    words.push(word);
                    markers.push(ScriptMarker {
                        kind: MarkerKind::Highlight,
                        style: None,
                        attached_word_index: Some(word_index),
                    });
                } else {
                    buffer.push('{');
                    i += 1;
                }
            }
            c if c.is_whitespace() => {
                flush(&mut buffer, &mut words);
                i += 1;
            }
            c => {
                buffer.push(c);
                i += 1;
            }
        }
    }
    flush(&mut buffer, &mut words);

    ScriptLine {
        index,
        text: words.join(" "),
        markers,
    }
}

fn flush(buffer: &mut String, words: &mut Vec<String>) {
    if !buffer.is_empty() {
        words.push(std::mem::take(buffer));
    }
}

/// Recognise `zoom`/`zoom:slow`/`zoom:punch`/`highlight` bracket tags.
/// Anything else is unknown and should be passed through literally.
fn parse_marker_tag(content: &str) -> Option<(MarkerKind, Option<MarkerStyle>)> {
    let mut parts = content.splitn(2, ':');
    let kind_str = parts.next()?.trim();
    if kind_str.eq_ignore_ascii_case("zoom") {
        let style = parts.next().and_then(|s| match s.trim().to_ascii_lowercase().as_str() {
            "slow" => Some(MarkerStyle::Slow),
            "punch" => Some(MarkerStyle::Punch),
            _ => None,
        });
        Some((MarkerKind::Zoom, style))
    } else if kind_str.eq_ignore_ascii_case("highlight") {
        Some((MarkerKind::Highlight, None))
    } else {
        None
    }
}
