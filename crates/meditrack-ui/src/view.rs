//! View tree produced by screens.
//!
//! A [`View`] is plain data: the host walks it to draw native widgets, and
//! tests query it by test tag or by text.

use crate::intent::Intent;

/// Kind of a view node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Column,
    Row,
    Card,
    /// Screen title
    Heading,
    /// Section title inside a screen or card
    Subtitle,
    Text,
    Button,
    IconButton,
    Icon,
    /// Bottom navigation entry
    Tab,
}

/// A node in the view tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    /// Displayed text, or the content description for icons
    pub text: Option<String>,
    pub tag: Option<String>,
    pub on_click: Option<Intent>,
    pub selected: bool,
    pub children: Vec<Node>,
}

impl Node {
    fn new(kind: NodeKind, text: Option<String>) -> Self {
        Self {
            kind,
            text,
            tag: None,
            on_click: None,
            selected: false,
            children: Vec::new(),
        }
    }

    fn container(kind: NodeKind, children: Vec<Node>) -> Self {
        Self {
            children,
            ..Self::new(kind, None)
        }
    }

    pub fn column(children: Vec<Node>) -> Self {
        Self::container(NodeKind::Column, children)
    }

    pub fn row(children: Vec<Node>) -> Self {
        Self::container(NodeKind::Row, children)
    }

    pub fn card(children: Vec<Node>) -> Self {
        Self::container(NodeKind::Card, children)
    }

    pub fn heading(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Heading, Some(text.into()))
    }

    pub fn subtitle(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Subtitle, Some(text.into()))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Text, Some(text.into()))
    }

    pub fn icon(description: impl Into<String>) -> Self {
        Self::new(NodeKind::Icon, Some(description.into()))
    }

    pub fn button(label: impl Into<String>, intent: Intent) -> Self {
        Self::new(NodeKind::Button, Some(label.into())).clickable(intent)
    }

    pub fn icon_button(description: impl Into<String>, intent: Intent) -> Self {
        Self::new(NodeKind::IconButton, Some(description.into())).clickable(intent)
    }

    pub fn tab(label: impl Into<String>, intent: Intent, selected: bool) -> Self {
        Self {
            selected,
            ..Self::new(NodeKind::Tab, Some(label.into())).clickable(intent)
        }
    }

    /// Attach a test tag.
    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn clickable(mut self, intent: Intent) -> Self {
        self.on_click = Some(intent);
        self
    }

    /// First node (depth first, self included) carrying `tag`.
    pub fn find_by_tag(&self, tag: &str) -> Option<&Node> {
        self.find(&|node| node.tag.as_deref() == Some(tag))
    }

    /// First node whose text equals `text`.
    pub fn find_by_text(&self, text: &str) -> Option<&Node> {
        self.find(&|node| node.text.as_deref() == Some(text))
    }

    /// Every node carrying `tag`, in document order.
    pub fn find_all_by_tag(&self, tag: &str) -> Vec<&Node> {
        let mut found = Vec::new();
        self.walk(&mut |node| {
            if node.tag.as_deref() == Some(tag) {
                found.push(node);
            }
        });
        found
    }

    /// All text in document order, icons excluded.
    pub fn texts(&self) -> Vec<&str> {
        let mut texts = Vec::new();
        self.walk(&mut |node| {
            if node.kind != NodeKind::Icon {
                if let Some(text) = node.text.as_deref() {
                    texts.push(text);
                }
            }
        });
        texts
    }

    fn find(&self, predicate: &dyn Fn(&Node) -> bool) -> Option<&Node> {
        if predicate(self) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(predicate))
    }

    fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Node)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Intent of the innermost clickable node on the path to the first match.
    fn click_where(&self, predicate: &dyn Fn(&Node) -> bool) -> Option<Option<Intent>> {
        if predicate(self) {
            return Some(self.on_click.clone());
        }
        let inner = self
            .children
            .iter()
            .find_map(|child| child.click_where(predicate))?;
        Some(inner.or_else(|| self.on_click.clone()))
    }
}

/// A rendered screen.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub root: Node,
}

impl View {
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    pub fn find_by_tag(&self, tag: &str) -> Option<&Node> {
        self.root.find_by_tag(tag)
    }

    pub fn find_by_text(&self, text: &str) -> Option<&Node> {
        self.root.find_by_text(text)
    }

    pub fn find_all_by_tag(&self, tag: &str) -> Vec<&Node> {
        self.root.find_all_by_tag(tag)
    }

    /// Text of the node carrying `tag`.
    pub fn text_of(&self, tag: &str) -> Option<&str> {
        self.find_by_tag(tag).and_then(|node| node.text.as_deref())
    }

    pub fn texts(&self) -> Vec<&str> {
        self.root.texts()
    }

    /// Whether any visible text equals `text`. Icon descriptions do not count.
    pub fn contains_text(&self, text: &str) -> bool {
        self.texts().contains(&text)
    }

    /// Click the node carrying `tag`.
    ///
    /// Clicks land on the tagged node or its nearest clickable ancestor.
    /// Returns `None` when nothing is tagged `tag` or nothing there is clickable.
    pub fn click(&self, tag: &str) -> Option<Intent> {
        self.root
            .click_where(&|node| node.tag.as_deref() == Some(tag))
            .flatten()
    }

    /// Click the first node showing `text`.
    pub fn click_text(&self, text: &str) -> Option<Intent> {
        self.root
            .click_where(&|node| node.text.as_deref() == Some(text))
            .flatten()
    }
}
