// src/ui/paste.rs
//! Turning pasted text (what terminals emit for a file drop) into paths.

use std::path::{Path, PathBuf};

/// Split dropped/pasted text into file paths.
///
/// Multi-line text is one path per line. A single line is taken verbatim if
/// it names an existing file, otherwise it is split shell-style (quotes and
/// backslash escapes). `file://` URIs are decoded.
pub fn parse_dropped_paths(text: &str) -> Vec<PathBuf> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let tokens: Vec<String> = if text.contains('\n') {
        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| unquote(l).to_string())
            .collect()
    } else if Path::new(unquote(text)).is_file() {
        vec![unquote(text).to_string()]
    } else {
        split_shell_words(text)
    };

    tokens.iter().map(|t| decode_uri(t)).collect()
}

fn unquote(s: &str) -> &str {
    for q in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(q) && s.ends_with(q) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Whitespace-separated words honouring quotes and (off Windows) backslashes.
fn split_shell_words(line: &str) -> Vec<String> {
    let escapes = !cfg!(windows);
    let mut words = Vec::new();
    let mut word = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => word.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, '\\') if escapes => {
                if let Some(next) = chars.next() {
                    word.push(next);
                }
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut word));
                    in_word = false;
                }
            }
            (None, c) => {
                word.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(word);
    }
    words
}

/// Strip a `file://` scheme and percent-decode; other text passes through.
fn decode_uri(token: &str) -> PathBuf {
    let Some(rest) = token.strip_prefix("file://") else {
        return PathBuf::from(token);
    };
    // Drop an optional host ("file://localhost/...")
    let rest = match rest.find('/') {
        Some(i) => &rest[i..],
        None => rest,
    };

    let bytes = rest.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(v) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(v);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    PathBuf::from(String::from_utf8_lossy(&out).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escaped_spaces_stay_in_one_path() {
        let paths = parse_dropped_paths("/music/SLANDER\\ -\\ Love\\ Is\\ Gone.mp3 ");
        assert_eq!(paths, vec![PathBuf::from("/music/SLANDER - Love Is Gone.mp3")]);
    }

    #[test]
    fn several_quoted_paths_in_order() {
        let paths = parse_dropped_paths("'/a/one track.mp3' \"/b/two.mp3\"");
        assert_eq!(
            paths,
            vec![PathBuf::from("/a/one track.mp3"), PathBuf::from("/b/two.mp3")]
        );
    }

    #[test]
    fn one_path_per_line() {
        let paths = parse_dropped_paths("/a/x y.mp3\n\n/b/z.mp3\n");
        assert_eq!(paths, vec![PathBuf::from("/a/x y.mp3"), PathBuf::from("/b/z.mp3")]);
    }

    #[test]
    fn file_uris_are_decoded() {
        let paths = parse_dropped_paths("file:///home/me/My%20Song.mp3");
        assert_eq!(paths, vec![PathBuf::from("/home/me/My Song.mp3")]);
        let paths = parse_dropped_paths("file://localhost/tmp/a.mp3");
        assert_eq!(paths, vec![PathBuf::from("/tmp/a.mp3")]);
    }

    #[test]
    fn blank_text_has_no_paths() {
        assert!(parse_dropped_paths("   \n ").is_empty());
    }
}
