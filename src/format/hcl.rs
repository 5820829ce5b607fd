//! HCL backend built on `hcl-edit`.
//!
//! The input is parsed into a lossless syntax tree that still carries every
//! comment and line break in the decor around each node. A single visitor
//! pass then rewrites whitespace only:
//! - structures are indented two spaces per nesting level
//! - block headers and `=` get single spaces; the `=` of single-line
//!   attributes on consecutive lines are aligned
//! - blank spacing inside expressions falls back to the canonical spacing
//! - multi-line arrays, objects and argument lists are re-indented
//!
//! Comments, blank lines between structures and template text (quoted strings
//! and heredocs) are left untouched.

use hcl_edit::expr::{Array, Expression, FuncArgs, Object, ObjectValueTerminator};
use hcl_edit::parser::parse_body;
use hcl_edit::structure::{Attribute, Block, Body, Structure};
use hcl_edit::template::{HeredocTemplate, StringTemplate};
use hcl_edit::visit_mut::{visit_expr_mut, VisitMut};
use hcl_edit::{Decor, Decorate, RawString};

use super::trivia::{breaks_line, closing, is_blank, leading, trailing};
use super::Formatter;
use crate::error::BoxError;

const INDENT: &str = "  ";

/// Parses the input as an HCL body and re-emits it in canonical form.
///
/// Input must be UTF-8. Empty input yields empty output.
#[derive(Debug, Default, Clone, Copy)]
pub struct HclFormatter;

impl Formatter for HclFormatter {
    fn format(&self, source: &[u8]) -> Result<Vec<u8>, BoxError> {
        let text = std::str::from_utf8(source)?;
        let mut body = parse_body(text)?;
        Canonicalize::default().visit_body_mut(&mut body);
        finish_file(&mut body);
        Ok(body.to_string().into_bytes())
    }
}

fn text(raw: Option<&RawString>) -> &str {
    raw.map_or("", |raw| &**raw)
}

/// Hand blank prefix/suffix back to the encoder, which fills in the
/// canonical spacing for the node's position.
fn reset_blank(decor: &mut Decor) {
    let prefix = decor.prefix().filter(|raw| !is_blank(raw)).cloned();
    let suffix = decor.suffix().filter(|raw| !is_blank(raw)).cloned();
    decor.clear();
    if let Some(prefix) = prefix {
        decor.set_prefix(prefix);
    }
    if let Some(suffix) = suffix {
        decor.set_suffix(suffix);
    }
}

/// Squeeze blank, non-empty padding to one space.
fn squeeze(raw: &str) -> Option<&'static str> {
    (!raw.is_empty() && is_blank(raw)).then_some(" ")
}

/// File start and end: no leading blank lines, exactly one final newline.
fn finish_file(body: &mut Body) {
    body.set_prefer_omit_trailing_newline(false);

    if let Some(first) = body.get_mut(0) {
        let decor = first.decor_mut();
        let prefix = text(decor.prefix()).trim_start_matches('\n').to_owned();
        decor.set_prefix(prefix);
    }

    let only_trivia = body.is_empty();
    let decor = body.decor_mut();
    let mut tail = closing(text(decor.suffix()), true, "", "");
    tail.truncate(tail.trim_end().len());
    if only_trivia {
        tail = tail.trim_start_matches('\n').to_owned();
    }
    if !tail.is_empty() {
        tail.push('\n');
    }
    decor.set_suffix(tail);
}

fn is_single_line(attr: &Attribute) -> bool {
    !attr.value.to_string().contains('\n')
}

/// Spaces between each attribute key and its `=`.
///
/// Single-line attributes on directly consecutive lines form a run whose `=`
/// line up. Blank lines, comment lines, blocks and multi-line values end a
/// run.
fn key_padding(body: &Body) -> Vec<usize> {
    fn flush(run: &mut Vec<(usize, usize)>, padding: &mut [usize]) {
        let widest = run.iter().map(|&(_, width)| width).max().unwrap_or(0);
        for (index, width) in run.drain(..) {
            padding[index] = widest - width + 1;
        }
    }

    let mut padding = vec![1; body.len()];
    let mut run = Vec::new();

    for (index, structure) in body.iter().enumerate() {
        if !is_blank(text(structure.decor().prefix())) {
            flush(&mut run, &mut padding);
        }
        match structure.as_attribute() {
            Some(attr) if is_blank(text(attr.key.decor().suffix())) => {
                run.push((index, attr.key.as_str().chars().count()));
                if !is_single_line(attr) {
                    flush(&mut run, &mut padding);
                }
            }
            _ => flush(&mut run, &mut padding),
        }
    }
    flush(&mut run, &mut padding);

    padding
}

/// Whitespace-normalizing pass over a parsed body.
#[derive(Debug, Default)]
struct Canonicalize {
    level: usize,
}

impl Canonicalize {
    fn indent(&self) -> String {
        INDENT.repeat(self.level)
    }

    /// Lays out the items of a bracketed list. Returns the new text in front
    /// of the closing bracket when the list spans several lines.
    fn visit_list(&mut self, values: Vec<&mut Expression>, tail: &str) -> Option<String> {
        let multiline = breaks_line(tail)
            || values
                .iter()
                .any(|value| breaks_line(text(value.decor().prefix())));
        if !multiline {
            for value in values {
                self.visit_expr_mut(value);
            }
            return None;
        }

        let outer = self.indent();
        self.level += 1;
        let inner = self.indent();
        for value in values {
            let prefix = text(value.decor().prefix());
            if breaks_line(prefix) {
                let prefix = leading(prefix, false, &inner);
                value.decor_mut().set_prefix(prefix);
            }
            self.visit_expr_mut(value);
        }
        self.level -= 1;

        breaks_line(tail).then(|| closing(tail, false, &inner, &outer))
    }
}

impl VisitMut for Canonicalize {
    fn visit_body_mut(&mut self, body: &mut Body) {
        let indent = self.indent();
        let padding = key_padding(body);

        for (index, pad) in padding.into_iter().enumerate() {
            let Some(structure) = body.get_mut(index) else {
                break;
            };

            let decor = structure.decor_mut();
            let prefix = leading(text(decor.prefix()), true, &indent);
            let suffix = trailing(text(decor.suffix()));
            decor.set_prefix(prefix);
            decor.set_suffix(suffix);

            match structure {
                Structure::Attribute(attr) => {
                    if is_blank(text(attr.key.decor().suffix())) {
                        attr.key.decor_mut().set_suffix(" ".repeat(pad));
                    }
                    self.visit_expr_mut(&mut attr.value);
                }
                Structure::Block(block) => self.visit_block_mut(block),
            }
        }
    }

    fn visit_block_mut(&mut self, block: &mut Block) {
        reset_blank(block.ident.decor_mut());
        for label in &mut block.labels {
            reset_blank(label.decor_mut());
        }

        let body = &mut block.body;
        if body.prefer_oneline() {
            // `{}` or `{ key = value }`
            if let Some(Structure::Attribute(attr)) = body.get_mut(0) {
                reset_blank(attr.decor_mut());
                reset_blank(attr.key.decor_mut());
                self.visit_expr_mut(&mut attr.value);
            }
            reset_blank(body.decor_mut());
            return;
        }

        let outer = self.indent();
        let inner = INDENT.repeat(self.level + 1);
        let decor = body.decor_mut();
        let after_brace = trailing(text(decor.prefix()));
        let before_brace = closing(text(decor.suffix()), true, &inner, &outer);
        decor.set_prefix(after_brace);
        decor.set_suffix(before_brace);

        self.level += 1;
        self.visit_body_mut(body);
        self.level -= 1;
    }

    fn visit_expr_mut(&mut self, expr: &mut Expression) {
        reset_blank(expr.decor_mut());
        visit_expr_mut(self, expr);
    }

    fn visit_array_mut(&mut self, array: &mut Array) {
        let tail = String::from(&**array.trailing());
        if let Some(tail) = self.visit_list(array.iter_mut().collect(), &tail) {
            array.set_trailing(tail);
        }
    }

    fn visit_func_args_mut(&mut self, args: &mut FuncArgs) {
        let tail = String::from(&**args.trailing());
        if let Some(tail) = self.visit_list(args.iter_mut().collect(), &tail) {
            args.set_trailing(tail);
        }
    }

    // TODO: align `=` across the items of multi-line objects the way body
    // attributes are aligned
    fn visit_object_mut(&mut self, object: &mut Object) {
        let multiline = breaks_line(object.trailing())
            || object.iter().any(|(key, value)| {
                breaks_line(text(key.decor().prefix()))
                    || value.terminator() == ObjectValueTerminator::Newline
            });

        let outer = self.indent();
        if multiline {
            self.level += 1;
        }
        let inner = self.indent();
        let mut line_start = false;

        for (index, (mut key, value)) in object.iter_mut().enumerate() {
            let prefix = text(key.decor().prefix()).to_owned();
            if multiline && (line_start || breaks_line(&prefix)) {
                key.decor_mut().set_prefix(leading(&prefix, line_start, &inner));
            } else if let Some(space) = squeeze(&prefix).filter(|_| index == 0) {
                key.decor_mut().set_prefix(space);
            }
            if is_blank(text(key.decor().suffix())) {
                key.decor_mut().set_suffix(" ");
            }

            let last = value.terminator() == ObjectValueTerminator::None;
            let before_brace = squeeze(text(value.expr().decor().suffix()));
            self.visit_expr_mut(value.expr_mut());
            if let Some(space) = before_brace.filter(|_| last) {
                value.expr_mut().decor_mut().set_suffix(space);
            }
            line_start = value.terminator() == ObjectValueTerminator::Newline;
        }

        if multiline {
            self.level -= 1;
        }

        let tail = String::from(&**object.trailing());
        if multiline && (line_start || breaks_line(&tail)) {
            object.set_trailing(closing(&tail, line_start, &inner, &outer));
        }
    }

    // template text is content, not layout
    fn visit_string_template_mut(&mut self, _: &mut StringTemplate) {}

    fn visit_heredoc_template_mut(&mut self, _: &mut HeredocTemplate) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(input: &str) -> String {
        String::from_utf8(HclFormatter.format(input.as_bytes()).unwrap()).unwrap()
    }

    #[test]
    fn test_empty_input() {
        assert!(HclFormatter.format(b"").unwrap().is_empty());
        assert!(HclFormatter.format(b"\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_normalizes_spacing() {
        let input = "service   \"web\" {\n  port=8080\n    name    = \"web\"\n}\n";
        let expected = "service \"web\" {\n  port = 8080\n  name = \"web\"\n}\n";
        assert_eq!(format(input), expected);
    }

    #[test]
    fn test_keeps_comments() {
        let input = "# keep me\na = 1 // trailing\n/* block */\nb = 2\n";
        assert_eq!(format(input), input);
    }

    #[test]
    fn test_keeps_blank_line_groups() {
        assert_eq!(format("a = 1\n\n\nb = 2\n"), "a = 1\n\n\nb = 2\n");
        assert_eq!(format("\n\n\na = 1\n"), "a = 1\n");
    }

    #[test]
    fn test_reindents_nested_blocks_and_comments() {
        let input = "outer {\n      # note\n   inner   {\n  x=1\n        }\n}\n";
        let expected = "outer {\n  # note\n  inner {\n    x = 1\n  }\n}\n";
        assert_eq!(format(input), expected);
    }

    #[test]
    fn test_comment_before_closing_brace() {
        let input = "block {\n  a = 1\n    # end of block\n\n}\n";
        let expected = "block {\n  a = 1\n  # end of block\n}\n";
        assert_eq!(format(input), expected);
    }

    #[test]
    fn test_aligns_consecutive_attributes() {
        let input = "a = 1\nlong_name = 2\n\nc = 3\n";
        let expected = "a         = 1\nlong_name = 2\n\nc = 3\n";
        assert_eq!(format(input), expected);
    }

    #[test]
    fn test_reindents_multiline_array() {
        let input = "list = [\n      1,\n  2, # two\n]\n";
        let expected = "list = [\n  1,\n  2, # two\n]\n";
        assert_eq!(format(input), expected);
    }

    #[test]
    fn test_expression_spacing() {
        assert_eq!(format("x = [1,2,  3]\n"), "x = [1, 2, 3]\n");
        assert_eq!(format("y = max( 1 ,2 )\n"), "y = max(1, 2)\n");
        assert_eq!(format("z = a+b\n"), "z = a + b\n");
    }

    #[test]
    fn test_heredoc_is_verbatim() {
        let input = "doc = <<EOT\n  keep   this\nEOT\n";
        assert_eq!(format(input), input);
    }

    #[test]
    fn test_adds_final_newline() {
        assert_eq!(format("a = 1"), "a = 1\n");
        assert_eq!(format("a = 1\n# end"), "a = 1\n# end\n");
    }

    #[test]
    fn test_idempotent() {
        let input = "resource \"aws_s3_bucket\"   \"b\" {\n  bucket=\"x\" # name\n     acl    = \"private\"\n\n  tags = {\n      Name = \"b\"\n  }\n}\n";
        let once = HclFormatter.format(input.as_bytes()).unwrap();
        let twice = HclFormatter.format(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert!(HclFormatter.format(b"block {\n  a = \n").is_err());
    }

    #[test]
    fn test_rejects_invalid_utf8() {
        assert!(HclFormatter.format(b"a = \"\xff\"\n").is_err());
    }
}
