//! Streaming MathML tokenizer.
//!
//! Reads a document as a stream of XML events and, for every `<math>`
//! element, emits one token per sub-expression in pre-order. A token is
//! the canonical form of a subtree: `name(text)` for leaves and
//! `name(child child ...)` with children concatenated for inner nodes,
//! e.g. `mrow(mi(x)mo(+)mn(1))`.
//!
//! Formulae are parsed one at a time as the stream is iterated, so a
//! document is never fully buffered. Malformed markup ends the stream.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::MathTokenizer;
use crate::core::indexer::record::TokenStream;
use crate::core::indexer::source::DocStream;

/// Which MathML flavour a token stream covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathMode {
    /// Layout markup (`mi`, `mo`, `mrow`, ...)
    Presentation,
    /// Semantic markup (`apply`, `ci`, `cn`, ...)
    Content,
}

const CONTENT_ELEMENTS: &[&str] = &[
    "apply", "bind", "ci", "cn", "cs", "csymbol", "cerror", "share", "set", "list", "interval",
    "lambda", "piecewise",
];

/// Default [`MathTokenizer`] over MathML embedded in (X)HTML/XML
///
/// Clones share one formula counter. Only presentation streams count,
/// since both modes walk the same `<math>` elements.
#[derive(Debug, Default, Clone)]
pub struct MathMlTokenizer {
    formulae: Arc<AtomicU64>,
}

impl MathMlTokenizer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MathTokenizer for MathMlTokenizer {
    fn tokenize(&self, stream: DocStream, mode: MathMode) -> TokenStream {
        let counter = (mode == MathMode::Presentation).then(|| Arc::clone(&self.formulae));
        Box::new(MathTokens::new(stream, mode, counter))
    }

    fn formulae_seen(&self) -> u64 {
        self.formulae.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Default)]
struct Node {
    name: String,
    encoding: Option<String>,
    text: String,
    children: Vec<Node>,
}

impl Node {
    fn from_start(start: &BytesStart<'_>) -> Self {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let encoding = start
            .attributes()
            .flatten()
            .find(|attr| attr.key.local_name().as_ref() == b"encoding")
            .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()));
        Self {
            name,
            encoding,
            ..Default::default()
        }
    }

    fn is_annotation(&self) -> bool {
        self.name == "annotation" || self.name == "annotation-xml"
    }

    fn is_content(&self) -> bool {
        CONTENT_ELEMENTS.contains(&self.name.as_str())
    }

    fn has_encoding(&self, flavour: &str) -> bool {
        self.encoding
            .as_deref()
            .is_some_and(|e| e.to_ascii_lowercase().contains(flavour))
    }

    /// Canonical form of this subtree
    fn canonical(&self) -> String {
        let children: Vec<&Node> = self.children.iter().filter(|c| !c.is_annotation()).collect();
        if children.is_empty() {
            let text: String = self.text.split_whitespace().collect();
            if text.is_empty() {
                self.name.clone()
            } else {
                format!("{}({})", self.name, text)
            }
        } else {
            let inner: String = children.iter().map(|c| c.canonical()).collect();
            format!("{}({})", self.name, inner)
        }
    }

    fn collect_subtrees(&self, out: &mut VecDeque<String>) {
        out.push_back(self.canonical());
        for child in self.children.iter().filter(|c| !c.is_annotation()) {
            child.collect_subtrees(out);
        }
    }
}

/// The formula's primary children, looking through a `<semantics>` wrapper
fn primary_children(math: &Node) -> Vec<&Node> {
    let children: Vec<&Node> = math.children.iter().filter(|c| !c.is_annotation()).collect();
    match children.as_slice() {
        [only] if only.name == "semantics" => only
            .children
            .iter()
            .take(1)
            .filter(|c| !c.is_annotation())
            .collect(),
        _ => children,
    }
}

fn annotation_roots<'a>(node: &'a Node, flavour: &str, out: &mut Vec<&'a Node>) {
    for child in &node.children {
        if child.name == "annotation-xml" && child.has_encoding(flavour) {
            out.extend(child.children.iter());
        } else {
            annotation_roots(child, flavour, out);
        }
    }
}

fn roots(math: &Node, mode: MathMode) -> Vec<&Node> {
    let primary = primary_children(math);
    let primary_is_content = !primary.is_empty() && primary.iter().all(|c| c.is_content());

    let (wanted_primary, flavour) = match mode {
        MathMode::Presentation => (!primary_is_content, "presentation"),
        MathMode::Content => (primary_is_content, "content"),
    };
    if wanted_primary {
        return primary;
    }

    let mut annotated = Vec::new();
    annotation_roots(math, flavour, &mut annotated);
    annotated
}

struct MathTokens {
    reader: Reader<DocStream>,
    buf: Vec<u8>,
    mode: MathMode,
    pending: VecDeque<String>,
    finished: bool,
    formulae: usize,
    counter: Option<Arc<AtomicU64>>,
}

impl MathTokens {
    fn new(stream: DocStream, mode: MathMode, counter: Option<Arc<AtomicU64>>) -> Self {
        let mut reader = Reader::from_reader(stream);
        reader.config_mut().check_end_names = false;
        reader.config_mut().trim_text(true);
        Self {
            reader,
            buf: Vec::new(),
            mode,
            pending: VecDeque::new(),
            finished: false,
            formulae: 0,
            counter,
        }
    }

    /// Parse forward to the end of the next `<math>` element
    fn next_formula(&mut self) -> Option<Node> {
        let mut stack: Vec<Node> = Vec::new();
        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(event) => event,
                Err(e) => {
                    tracing::debug!(
                        "Math markup parse stopped at byte {}: {}",
                        self.reader.buffer_position(),
                        e
                    );
                    return None;
                }
            };

            match event {
                Event::Start(start) => {
                    if stack.is_empty() && start.local_name().as_ref() != b"math" {
                        continue;
                    }
                    stack.push(Node::from_start(&start));
                }
                Event::Empty(start) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(Node::from_start(&start));
                    }
                }
                Event::Text(text) => {
                    if let Some(top) = stack.last_mut() {
                        match text.unescape() {
                            Ok(s) => top.text.push_str(&s),
                            Err(_) => top.text.push_str(&String::from_utf8_lossy(&text)),
                        }
                    }
                }
                Event::CData(data) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&String::from_utf8_lossy(&data));
                    }
                }
                Event::End(_) => {
                    if let Some(node) = stack.pop() {
                        match stack.last_mut() {
                            Some(parent) => parent.children.push(node),
                            None => return Some(node),
                        }
                    }
                }
                Event::Eof => return None,
                _ => {}
            }
        }
    }
}

impl Iterator for MathTokens {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }
            if self.finished {
                return None;
            }
            match self.next_formula() {
                Some(math) => {
                    self.formulae += 1;
                    if let Some(counter) = &self.counter {
                        counter.fetch_add(1, Ordering::Relaxed);
                    }
                    for root in roots(&math, self.mode) {
                        root.collect_subtrees(&mut self.pending);
                    }
                }
                None => {
                    self.finished = true;
                    tracing::trace!("{:?} math stream done after {} formulae", self.mode, self.formulae);
                }
            }
        }
    }
}
