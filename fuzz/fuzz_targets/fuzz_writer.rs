#![no_main]
use libfuzzer_sys::fuzz_target;
use xmlscribe::{Config, Document, ElementWriter, NamePolicy};

/// Interprets each byte as one writer operation. Names and values are cut
/// from the input itself so the name policy and escaping see arbitrary text.
fn drive(el: &mut ElementWriter<'_, &mut Vec<u8>>, data: &mut &[u8]) {
    while let Some((&op, rest)) = data.split_first() {
        *data = rest;
        let take = usize::from(op >> 3).min(data.len());
        let (chunk, rest) = data.split_at(take);
        *data = rest;
        let text = String::from_utf8_lossy(chunk);
        match op & 0b111 {
            0 => {
                if let Ok(mut child) = el.tag(&text) {
                    drive(&mut child, data);
                }
            }
            1 => {
                if let Ok(mut child) = el.tree(&text) {
                    drive(&mut child, data);
                }
            }
            2 => {
                let _ = el.attr("a", &text);
            }
            3 => {
                let _ = el.leaf("t", &text);
            }
            4 => {
                let _ = el.attr(&text, 0);
            }
            _ => return,
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let mut out = Vec::new();
    {
        let config = Config::default().names(NamePolicy::Xml);
        let Ok(mut doc) = Document::with_config(&mut out, "root", config) else {
            return;
        };
        let Ok(mut top) = doc.tree("top") else {
            return;
        };
        let mut input = data;
        drive(&mut top, &mut input);
    }
    // Writing to a Vec never fails, so the output must be valid UTF-8 and
    // end with the root's closing tag.
    let xml = String::from_utf8(out).expect("writer produced invalid UTF-8");
    assert!(xml.ends_with("</root>\n"));
});
