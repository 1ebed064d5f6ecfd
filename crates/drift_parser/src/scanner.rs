//! Single-pass extraction of include directives from source bytes.

/// The textual form of an include directive's path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncludeKind {
    /// `#include "path"` — the including file's directory is searched first.
    Quoted,
    /// `#include <path>` — only the configured roots are searched.
    Angle,
    /// `#include IDENTIFIER` — the path is a macro reference that must be
    /// substituted before resolution.
    Macro,
}

/// One include directive as written in the source, before resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IncludeDirective {
    /// The literal path text between the delimiters, or the macro name.
    /// Never empty.
    pub path: String,
    /// Which delimiter form the directive used.
    pub kind: IncludeKind,
}

/// Scans one file's bytes and returns its include directives in source order.
///
/// Comments (`//` and `/* */`) are stripped first, with string and character
/// literals honoured so that comment markers inside them are inert. All
/// textual directives are collected, including those inside
/// conditional-compilation blocks. Malformed directives (unterminated or
/// empty path) are skipped. Never fails.
pub fn scan_directives(source: &[u8]) -> Vec<IncludeDirective> {
    let clean = strip_comments(source);
    let mut directives = Vec::new();
    for line in clean.split(|&b| b == b'\n') {
        if let Some(directive) = scan_line(line) {
            directives.push(directive);
        }
    }
    directives
}

/// Replaces comments with spaces while preserving line structure.
///
/// Newlines inside block comments are kept so that directive positions stay
/// line-accurate. Backslash-newline splices are removed, as the preprocessor
/// would, so a continued directive line scans as one line. String and
/// character literals pass through untouched.
fn strip_comments(source: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(source.len());
    let mut pos = 0;
    while pos < source.len() {
        let b = source[pos];
        match b {
            // Line splice: backslash immediately before a newline.
            b'\\' if source.get(pos + 1) == Some(&b'\n') => {
                pos += 2;
            }
            b'\\' if source.get(pos + 1) == Some(&b'\r') && source.get(pos + 2) == Some(&b'\n') => {
                pos += 3;
            }
            b'/' if source.get(pos + 1) == Some(&b'/') => {
                while pos < source.len() && source[pos] != b'\n' {
                    pos += 1;
                }
            }
            b'/' if source.get(pos + 1) == Some(&b'*') => {
                out.push(b' ');
                pos += 2;
                loop {
                    match source.get(pos) {
                        None => break,
                        Some(b'*') if source.get(pos + 1) == Some(&b'/') => {
                            pos += 2;
                            break;
                        }
                        Some(b'\n') => {
                            out.push(b'\n');
                            pos += 1;
                        }
                        Some(_) => pos += 1,
                    }
                }
            }
            b'"' | b'\'' => {
                let quote = b;
                out.push(b);
                pos += 1;
                while pos < source.len() {
                    let c = source[pos];
                    out.push(c);
                    pos += 1;
                    if c == b'\\' && pos < source.len() {
                        out.push(source[pos]);
                        pos += 1;
                    } else if c == quote || c == b'\n' {
                        // An unterminated literal ends at the newline;
                        // scanning continues on the next line.
                        break;
                    }
                }
            }
            _ => {
                out.push(b);
                pos += 1;
            }
        }
    }
    out
}

/// Scans one comment-free line for a directive.
fn scan_line(line: &[u8]) -> Option<IncludeDirective> {
    let mut pos = skip_blank(line, 0);
    if line.get(pos) != Some(&b'#') {
        return None;
    }
    pos = skip_blank(line, pos + 1);
    let keyword_end = ident_end(line, pos);
    let keyword = &line[pos..keyword_end];
    if keyword != b"include" && keyword != b"import" {
        return None;
    }
    pos = skip_blank(line, keyword_end);
    match *line.get(pos)? {
        b'"' => delimited(line, pos + 1, b'"').map(|path| IncludeDirective {
            path,
            kind: IncludeKind::Quoted,
        }),
        b'<' => delimited(line, pos + 1, b'>').map(|path| IncludeDirective {
            path,
            kind: IncludeKind::Angle,
        }),
        b'A'..=b'Z' | b'a'..=b'z' | b'_' => {
            let end = ident_end(line, pos);
            Some(IncludeDirective {
                path: String::from_utf8_lossy(&line[pos..end]).into_owned(),
                kind: IncludeKind::Macro,
            })
        }
        _ => None,
    }
}

fn skip_blank(line: &[u8], mut pos: usize) -> usize {
    while pos < line.len() && (line[pos] == b' ' || line[pos] == b'\t' || line[pos] == b'\r') {
        pos += 1;
    }
    pos
}

fn ident_end(line: &[u8], mut pos: usize) -> usize {
    while pos < line.len() && (line[pos].is_ascii_alphanumeric() || line[pos] == b'_') {
        pos += 1;
    }
    pos
}

/// Extracts the path between `start` and the closing delimiter on the same
/// line. Returns `None` for unterminated or empty paths.
fn delimited(line: &[u8], start: usize, close: u8) -> Option<String> {
    let rel = line[start..].iter().position(|&b| b == close)?;
    if rel == 0 {
        return None;
    }
    Some(String::from_utf8_lossy(&line[start..start + rel]).into_owned())
}
