//! Rich-text display-tree renderer.
//!
//! Walks a sequence of [`RichTextBlock`]s and produces a serializable tree of
//! paragraph and inline nodes for the page layer. Block tags other than
//! `paragraph` produce no output; relative order of the kept blocks is
//! preserved.

use serde::Serialize;

use crate::services::{RichTextBlock, TextRun};

/// One rendered paragraph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paragraph {
    pub children: Vec<Inline>,
}

/// An inline node inside a paragraph.
///
/// Nesting for runs with both flags set is fixed at bold-outer/italic-inner
/// so repeated renders of the same input produce identical trees.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Inline {
    Text { text: String },
    Bold { child: Box<Inline> },
    Italic { child: Box<Inline> },
}

/// Renders `blocks` into paragraph nodes.
///
/// Absent input yields an empty tree, not an error. Empty-text runs are kept
/// as empty inline nodes so positional indices stay stable for callers using
/// them as keys.
#[must_use]
pub fn render_blocks(blocks: Option<&[RichTextBlock]>) -> Vec<Paragraph> {
    let Some(blocks) = blocks else {
        return Vec::new();
    };

    blocks
        .iter()
        .filter_map(|block| match block {
            RichTextBlock::Paragraph { children } => Some(Paragraph {
                children: children.iter().map(render_run).collect(),
            }),
            RichTextBlock::Unsupported => None,
        })
        .collect()
}

fn render_run(run: &TextRun) -> Inline {
    let mut node = Inline::Text {
        text: run.text.clone(),
    };
    if run.italic {
        node = Inline::Italic {
            child: Box::new(node),
        };
    }
    if run.bold {
        node = Inline::Bold {
            child: Box::new(node),
        };
    }
    node
}
