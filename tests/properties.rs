//! Property tests: any sequence of writer operations yields balanced,
//! correctly nested output.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::io::Write;

use proptest::prelude::*;
use xmlscribe::{Document, ElementWriter, Error};

#[derive(Debug, Clone, Copy)]
enum Op {
    Tag(usize),
    Tree(usize),
    Attr(usize),
    Leaf(usize),
    Close,
}

const NAMES: &[&str] = &["a", "b", "item", "x-y"];
const VALUES: &[&str] = &["plain", "a&b", "\"quoted\"", "<tag/>", "1 > 0"];

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..NAMES.len()).prop_map(Op::Tag),
        (0..NAMES.len()).prop_map(Op::Tree),
        (0..VALUES.len()).prop_map(Op::Attr),
        (0..VALUES.len()).prop_map(Op::Leaf),
        Just(Op::Close),
    ]
}

/// Applies operations to `el` until a `Close` or the end of input.
fn drive<W: Write>(el: &mut ElementWriter<'_, W>, ops: &mut std::slice::Iter<'_, Op>) {
    while let Some(op) = ops.next() {
        match *op {
            Op::Tag(n) => drive(&mut el.tag(NAMES[n]).unwrap(), ops),
            Op::Tree(n) => drive(&mut el.tree(NAMES[n]).unwrap(), ops),
            Op::Attr(v) => {
                let had_content = el.has_content();
                let result = el.attr("attr", VALUES[v]).map(|_| ());
                match result {
                    Ok(()) => assert!(!had_content),
                    Err(e) => assert!(had_content && matches!(e, Error::IllegalState { .. })),
                }
            }
            Op::Leaf(v) => el.leaf("leaf", VALUES[v]).unwrap(),
            Op::Close => return,
        }
    }
}

fn render(ops: &[Op]) -> String {
    let mut out = Vec::new();
    {
        let mut doc = Document::new(&mut out, "root").unwrap();
        let mut iter = ops.iter();
        let mut top = doc.tree("top").unwrap();
        drive(&mut top, &mut iter);
    }
    String::from_utf8(out).unwrap()
}

/// Returns the sequence of opened names and of closed names, checking that
/// every close matches the innermost open element.
fn check_balance(xml: &str) -> (Vec<String>, Vec<String>) {
    let body = xml.split_once('\n').unwrap().1;
    let bytes = body.as_bytes();
    let mut stack: Vec<String> = Vec::new();
    let mut opened = Vec::new();
    let mut closed = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'<' {
            let closing = bytes.get(i + 1) == Some(&b'/');
            let start = if closing { i + 2 } else { i + 1 };
            let end = start
                + body[start..]
                    .find(|c: char| c == ' ' || c == '>' || c == '/')
                    .unwrap();
            let name = body[start..end].to_string();
            if closing {
                let top = stack.pop().expect("close without open");
                assert_eq!(top, name, "mismatched close in:\n{xml}");
                closed.push(name);
            } else {
                stack.push(name.clone());
                opened.push(name);
            }
            i = end;
        } else if body[i..].starts_with("/>") {
            closed.push(stack.pop().expect("self-close without open"));
            i += 2;
        } else {
            i += 1;
        }
    }
    assert!(stack.is_empty(), "unclosed elements {stack:?} in:\n{xml}");
    (opened, closed)
}

proptest! {
    #[test]
    fn prop_output_is_balanced(ops in prop::collection::vec(op_strategy(), 0..64)) {
        let xml = render(&ops);
        let (opened, closed) = check_balance(&xml);
        prop_assert_eq!(opened.len(), closed.len());
        prop_assert_eq!(opened.first().map(String::as_str), Some("root"));
        prop_assert_eq!(closed.last().map(String::as_str), Some("root"));
    }

    #[test]
    fn prop_every_line_ends_with_newline(ops in prop::collection::vec(op_strategy(), 0..32)) {
        let xml = render(&ops);
        prop_assert!(xml.ends_with("</root>\n"));
        prop_assert!(!xml.contains("\n\n"));
    }

    #[test]
    fn prop_text_never_leaks_markup(text in "\\PC*") {
        let mut out = Vec::new();
        {
            let mut doc = Document::new(&mut out, "root").unwrap();
            doc.leaf("t", &text).unwrap();
        }
        let xml = String::from_utf8(out).unwrap();
        let line = xml.lines().nth(2).unwrap().to_string();
        let inner = line
            .strip_prefix("  <t>")
            .and_then(|l| l.strip_suffix("</t>"))
            .unwrap();
        prop_assert!(!inner.contains('<'));
        prop_assert!(!inner.contains('>'));
    }
}

#[test]
fn test_checker_rejects_crossed_tags() {
    let result = std::panic::catch_unwind(|| check_balance("prolog\n<a><b></a></b>"));
    assert!(result.is_err());
}
