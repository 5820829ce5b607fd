//! Whitespace and comment layout.
//!
//! The parser keeps the text between syntax nodes verbatim: line breaks,
//! indentation and `#`, `//` and `/* */` comments. The helpers here rebuild
//! the whitespace of such text for a given indentation and copy every comment
//! through unchanged (line comments lose trailing blanks only).

/// What survives of a stretch of trivia.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Piece<'a> {
    Newline,
    Comment(&'a str),
}

fn pieces(raw: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut rest = raw;

    while let Some(ch) = rest.chars().next() {
        if ch == '\n' {
            pieces.push(Piece::Newline);
            rest = &rest[1..];
        } else if ch.is_whitespace() {
            rest = &rest[ch.len_utf8()..];
        } else if rest.starts_with("/*") {
            let end = rest[2..].find("*/").map_or(rest.len(), |at| at + 4);
            pieces.push(Piece::Comment(&rest[..end]));
            rest = &rest[end..];
        } else {
            // `#` and `//` run to the end of the line
            let end = rest.find('\n').unwrap_or(rest.len());
            pieces.push(Piece::Comment(rest[..end].trim_end()));
            rest = &rest[end..];
        }
    }

    pieces
}

/// Re-emits the comments and line breaks of `raw`, indenting comments that
/// start a line. Returns the text and whether it ends at the start of a line.
fn layout(raw: &str, line_start: bool, indent: &str) -> (String, bool) {
    let mut text = String::new();
    let mut at_line_start = line_start;

    for piece in pieces(raw) {
        match piece {
            Piece::Newline => {
                text.push('\n');
                at_line_start = true;
            }
            Piece::Comment(comment) => {
                if at_line_start {
                    text.push_str(indent);
                } else {
                    text.push(' ');
                }
                text.push_str(comment);
                at_line_start = false;
            }
        }
    }

    (text, at_line_start)
}

/// `true` for trivia made of spaces and tabs only (including none at all).
pub(super) fn is_blank(raw: &str) -> bool {
    raw.chars().all(|ch| ch == ' ' || ch == '\t')
}

/// `true` when the node after `raw` starts its own line.
pub(super) fn breaks_line(raw: &str) -> bool {
    raw.contains('\n')
}

/// Trivia in front of a node.
///
/// `line_start` tells whether `raw` itself begins at the start of a line. A
/// node that ends up on a fresh line is indented with `indent`; one that
/// follows a comment on the same line is separated by a single space.
pub(super) fn leading(raw: &str, line_start: bool, indent: &str) -> String {
    let (mut text, at_line_start) = layout(raw, line_start, indent);
    if at_line_start {
        text.push_str(indent);
    } else if !text.is_empty() {
        text.push(' ');
    }
    text
}

/// Trivia after a node, up to the end of its line.
pub(super) fn trailing(raw: &str) -> String {
    layout(raw, false, "").0
}

/// Trivia in front of a closing `}` or `]`.
///
/// Comments keep `indent` and blank lines right before the closer are
/// dropped. A closer on its own line gets `close_indent`.
pub(super) fn closing(raw: &str, line_start: bool, indent: &str, close_indent: &str) -> String {
    let (text, at_line_start) = layout(raw, line_start, indent);
    let mut text = text.trim_end_matches('\n').to_owned();

    if at_line_start {
        if !text.is_empty() || !line_start {
            text.push('\n');
        }
        text.push_str(close_indent);
    } else {
        text.push(' ');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pieces_keep_every_comment() {
        let raw = "  # one  \n\n/* two\n  lines */ // three\n";
        assert_eq!(
            pieces(raw),
            vec![
                Piece::Comment("# one"),
                Piece::Newline,
                Piece::Newline,
                Piece::Comment("/* two\n  lines */"),
                Piece::Comment("// three"),
                Piece::Newline,
            ]
        );
    }

    #[test]
    fn test_leading_reindents_comment_lines() {
        assert_eq!(leading("      # note\n   ", true, "  "), "  # note\n  ");
        assert_eq!(leading("", true, "    "), "    ");
        assert_eq!(leading("\n\n\t", true, "  "), "\n\n  ");
    }

    #[test]
    fn test_leading_after_other_tokens() {
        assert_eq!(leading("\n      ", false, "  "), "\n  ");
        assert_eq!(leading(" # why\n", false, "  "), " # why\n  ");
        assert_eq!(leading("/* c */   ", false, "  "), " /* c */ ");
    }

    #[test]
    fn test_trailing_squeezes_to_one_space() {
        assert_eq!(trailing("     // note   "), " // note");
        assert_eq!(trailing("   "), "");
    }

    #[test]
    fn test_closing_drops_blank_lines() {
        assert_eq!(closing("\n\n    ", true, "    ", "  "), "  ");
        assert_eq!(closing("    # end\n\n", true, "  ", ""), "  # end\n");
        assert_eq!(closing("\n", false, "  ", ""), "\n");
        assert_eq!(closing(" # two\n", false, "  ", ""), " # two\n");
    }

    #[test]
    fn test_blank_and_line_break_checks() {
        assert!(is_blank(""));
        assert!(is_blank(" \t "));
        assert!(!is_blank(" # c"));
        assert!(!is_blank("\n"));
        assert!(breaks_line(" # c\n  "));
        assert!(!breaks_line("  "));
    }
}
