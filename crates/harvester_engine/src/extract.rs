use ego_tree::iter::Edge;
use engine_logging::engine_trace;
use scraper::{Html, Node};

/// Elements whose text is never rendered.
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

fn is_hidden(name: &str) -> bool {
    HIDDEN_ELEMENTS.iter().any(|hidden| hidden.eq_ignore_ascii_case(name))
}

/// Collect every visible text node, trimmed, joined by single spaces.
pub fn extract_visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut parts: Vec<&str> = Vec::new();
    let mut hidden_depth = 0usize;

    for edge in document.tree.root().traverse() {
        match edge {
            Edge::Open(node) => match node.value() {
                Node::Element(element) if is_hidden(element.name()) => {
                    if hidden_depth == 0 {
                        engine_trace!("Skipping <{}> subtree", element.name());
                    }
                    hidden_depth += 1;
                }
                Node::Text(text) if hidden_depth == 0 => {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        parts.push(trimmed);
                    }
                }
                _ => {}
            },
            Edge::Close(node) => {
                if let Node::Element(element) = node.value() {
                    if is_hidden(element.name()) {
                        hidden_depth = hidden_depth.saturating_sub(1);
                    }
                }
            }
        }
    }

    engine_trace!("Extracted {} text nodes", parts.len());
    parts.join(" ").trim().to_string()
}
