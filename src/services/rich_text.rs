use crate::store::{RichTextBlock, Span};

fn new_key() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..12].to_string()
}

pub fn paragraph_block(text: &str) -> RichTextBlock {
    RichTextBlock {
        block_type: "block".to_string(),
        key: new_key(),
        style: "normal".to_string(),
        mark_defs: Vec::new(),
        children: vec![Span {
            span_type: "span".to_string(),
            key: new_key(),
            text: text.to_string(),
            marks: Vec::new(),
        }],
    }
}

/// Splits plain text on blank lines into one block per paragraph. Lines
/// inside a paragraph keep their newline; formatting is not reconstructed.
pub fn text_to_blocks(text: &str) -> Vec<RichTextBlock> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(paragraph_block(current.join("\n").trim()));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(paragraph_block(current.join("\n").trim()));
    }

    blocks
}
