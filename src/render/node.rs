//! Minimal view tree produced by the renderer.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

/// User interaction bound to an element; the host routes it back through
/// [`RenderContext::dispatch`](crate::render::RenderContext::dispatch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    #[serde(rename_all = "camelCase")]
    AddToCart { item_id: String },
    #[serde(rename_all = "camelCase")]
    SelectCategory { category_id: Option<String> },
}

impl Action {
    fn encode(&self) -> String {
        match self {
            Action::AddToCart { item_id } => format!("add-to-cart:{item_id}"),
            Action::SelectCategory { category_id } => {
                format!("select-category:{}", category_id.as_deref().unwrap_or(""))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Element {
        tag: String,
        attrs: BTreeMap<String, String>,
        children: Vec<Node>,
        #[serde(skip_serializing_if = "Option::is_none")]
        action: Option<Action>,
    },
    Text {
        text: String,
    },
    Fragment {
        children: Vec<Node>,
    },
}

impl Node {
    pub fn element(tag: &str) -> Self {
        Node::Element {
            tag: tag.to_string(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
            action: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    pub fn fragment(children: Vec<Node>) -> Self {
        Node::Fragment { children }
    }

    /// Shorthand for an element holding a single text child.
    pub fn text_element(tag: &str, text: impl Into<String>) -> Self {
        Self::element(tag).child(Self::text(text))
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        if let Node::Element { attrs, .. } = &mut self {
            attrs.insert(name.to_string(), value.into());
        }
        self
    }

    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    pub fn child(mut self, node: Node) -> Self {
        match &mut self {
            Node::Element { children, .. } | Node::Fragment { children } => children.push(node),
            Node::Text { .. } => {}
        }
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        match &mut self {
            Node::Element { children, .. } | Node::Fragment { children } => children.extend(nodes),
            Node::Text { .. } => {}
        }
        self
    }

    pub fn on_click(mut self, bound: Action) -> Self {
        if let Node::Element { action, .. } = &mut self {
            *action = Some(bound);
        }
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        match self {
            Node::Element { attrs, .. } => attrs.get(name).map(String::as_str),
            _ => None,
        }
    }

    /// `data-section` of a section root.
    pub fn section_id(&self) -> Option<&str> {
        self.get_attr("data-section")
    }

    pub fn action(&self) -> Option<&Action> {
        match self {
            Node::Element { action, .. } => action.as_ref(),
            _ => None,
        }
    }

    fn child_nodes(&self) -> &[Node] {
        match self {
            Node::Element { children, .. } | Node::Fragment { children } => children.as_slice(),
            Node::Text { .. } => &[],
        }
    }

    /// Depth-first search, including `self`.
    pub fn find_all<'a>(&'a self, pred: &dyn Fn(&Node) -> bool) -> Vec<&'a Node> {
        let mut found = Vec::new();
        self.collect(pred, &mut found);
        found
    }

    fn collect<'a>(&'a self, pred: &dyn Fn(&Node) -> bool, out: &mut Vec<&'a Node>) {
        if pred(self) {
            out.push(self);
        }
        for child in self.child_nodes() {
            child.collect(pred, out);
        }
    }

    /// Concatenated text of the subtree.
    pub fn text_content(&self) -> String {
        match self {
            Node::Text { text } => text.clone(),
            _ => self.child_nodes().iter().map(Node::text_content).collect(),
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Text { text } => out.push_str(&escape(text)),
            Node::Fragment { children } => {
                for child in children {
                    child.write_html(out);
                }
            }
            Node::Element {
                tag,
                attrs,
                children,
                action,
            } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    let _ = write!(out, " {name}=\"{}\"", escape(value));
                }
                if let Some(action) = action {
                    let _ = write!(out, " data-action=\"{}\"", escape(&action.encode()));
                }
                if is_void(tag) {
                    out.push_str(" />");
                    return;
                }
                out.push('>');
                for child in children {
                    child.write_html(out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }
}

/// Renders a sequence of sibling nodes.
pub fn to_html(nodes: &[Node]) -> String {
    nodes.iter().map(Node::to_html).collect()
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "img" | "input" | "br" | "hr")
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
