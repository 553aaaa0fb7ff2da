use std::collections::{BTreeMap, BTreeSet};

use super::selector::{self, AttrMatch, Compound};
use super::{Dom, ElementId, ScrollBlock};

#[derive(Debug, Clone, Default)]
struct Node {
    tag: String,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    style: BTreeMap<String, String>,
    text: String,
    value: String,
    checked: bool,
    disabled: bool,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

/// In-process document tree.
///
/// Backs headless rendering and every widget test. Besides the [`Dom`]
/// operations it records browser side effects (focus, scroll requests,
/// open modals) so callers can inspect them.
#[derive(Debug, Clone)]
pub struct MemoryDom {
    nodes: Vec<Node>,
    viewport_width: u32,
    focused: Option<ElementId>,
    scrolls: Vec<(ElementId, ScrollBlock)>,
    open_modals: BTreeSet<ElementId>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new(1280)
    }
}

impl MemoryDom {
    /// Creates a document containing only `<body>`.
    #[must_use]
    pub fn new(viewport_width: u32) -> Self {
        Self {
            nodes: vec![Node {
                tag: "body".to_owned(),
                ..Node::default()
            }],
            viewport_width,
            focused: None,
            scrolls: Vec::new(),
            open_modals: BTreeSet::new(),
        }
    }

    /// Appends a new `<tag>` under `parent` and returns it.
    pub fn append(&mut self, parent: ElementId, tag: &str) -> ElementId {
        let el = self.create_element(tag);
        self.append_child(parent, el);
        el
    }

    /// Appends a new element carrying the given `class` attribute value
    /// (space separated) and returns it.
    pub fn append_with_class(&mut self, parent: ElementId, tag: &str, classes: &str) -> ElementId {
        let el = self.append(parent, tag);
        self.set_attr(el, "class", classes);
        el
    }

    pub fn set_value(&mut self, el: ElementId, value: &str) {
        value.clone_into(&mut self.nodes[el.0].value);
    }

    pub fn set_checked(&mut self, el: ElementId, checked: bool) {
        self.nodes[el.0].checked = checked;
    }

    pub fn set_viewport_width(&mut self, width: u32) {
        self.viewport_width = width;
    }

    #[must_use]
    pub fn style(&self, el: ElementId, property: &str) -> Option<&str> {
        self.nodes[el.0].style.get(property).map(String::as_str)
    }

    #[must_use]
    pub fn is_disabled(&self, el: ElementId) -> bool {
        self.nodes[el.0].disabled
    }

    #[must_use]
    pub fn children(&self, el: ElementId) -> &[ElementId] {
        &self.nodes[el.0].children
    }

    #[must_use]
    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    #[must_use]
    pub fn scroll_requests(&self) -> &[(ElementId, ScrollBlock)] {
        &self.scrolls
    }

    #[must_use]
    pub fn is_modal_open(&self, el: ElementId) -> bool {
        self.open_modals.contains(&el)
    }

    fn detach(&mut self, el: ElementId) {
        if let Some(parent) = self.nodes[el.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != el);
        }
    }

    fn descendants(&self, root: ElementId, out: &mut Vec<ElementId>) {
        for child in &self.nodes[root.0].children {
            out.push(*child);
            self.descendants(*child, out);
        }
    }

    fn matches(&self, el: ElementId, compound: &Compound) -> bool {
        let node = &self.nodes[el.0];
        if compound.tag.as_ref().is_some_and(|t| *t != node.tag) {
            return false;
        }
        if compound
            .id
            .as_ref()
            .is_some_and(|id| node.attrs.get("id") != Some(id))
        {
            return false;
        }
        if !compound.classes.iter().all(|c| node.classes.contains(c)) {
            return false;
        }
        compound.attrs.iter().all(|attr| match attr {
            AttrMatch::Exists(name) => self.attr(el, name).is_some(),
            AttrMatch::Equals(name, value) => self.attr(el, name).as_ref() == Some(value),
            AttrMatch::Prefix(name, value) => self
                .attr(el, name)
                .is_some_and(|actual| actual.starts_with(value.as_str())),
        })
    }

    fn select(&self, candidates: Vec<ElementId>, selector: &str) -> Vec<ElementId> {
        let Some(compounds) = selector::parse(selector) else {
            tracing::debug!(selector, "unsupported selector");
            return Vec::new();
        };
        candidates
            .into_iter()
            .filter(|el| compounds.iter().any(|c| self.matches(*el, c)))
            .collect()
    }
}

impl Dom for MemoryDom {
    fn body(&self) -> ElementId {
        ElementId(0)
    }

    fn by_id(&self, id: &str) -> Option<ElementId> {
        let mut all = vec![self.body()];
        self.descendants(self.body(), &mut all);
        all.into_iter()
            .find(|el| self.nodes[el.0].attrs.get("id").map(String::as_str) == Some(id))
    }

    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        let mut all = vec![self.body()];
        self.descendants(self.body(), &mut all);
        self.select(all, selector)
    }

    fn query_within(&self, root: ElementId, selector: &str) -> Vec<ElementId> {
        let mut all = Vec::new();
        self.descendants(root, &mut all);
        self.select(all, selector)
    }

    fn tag(&self, el: ElementId) -> String {
        self.nodes[el.0].tag.clone()
    }

    fn attr(&self, el: ElementId, name: &str) -> Option<String> {
        let node = &self.nodes[el.0];
        match name {
            "class" if node.classes.is_empty() => None,
            "class" => Some(node.classes.join(" ")),
            "disabled" => node.disabled.then(String::new),
            _ => node.attrs.get(name).cloned(),
        }
    }

    fn set_attr(&mut self, el: ElementId, name: &str, value: &str) {
        let node = &mut self.nodes[el.0];
        match name {
            "class" => {
                node.classes = value.split_whitespace().map(str::to_owned).collect();
            }
            "value" => value.clone_into(&mut node.value),
            "disabled" => node.disabled = true,
            _ => {
                node.attrs.insert(name.to_owned(), value.to_owned());
            }
        }
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.nodes[el.0].classes.iter().any(|c| c == class)
    }

    fn add_class(&mut self, el: ElementId, class: &str) {
        if !self.has_class(el, class) {
            self.nodes[el.0].classes.push(class.to_owned());
        }
    }

    fn remove_class(&mut self, el: ElementId, class: &str) {
        self.nodes[el.0].classes.retain(|c| c != class);
    }

    fn set_style(&mut self, el: ElementId, property: &str, value: &str) {
        let style = &mut self.nodes[el.0].style;
        if value.is_empty() {
            style.remove(property);
        } else {
            style.insert(property.to_owned(), value.to_owned());
        }
    }

    fn text(&self, el: ElementId) -> String {
        self.nodes[el.0].text.clone()
    }

    fn set_text(&mut self, el: ElementId, text: &str) {
        text.clone_into(&mut self.nodes[el.0].text);
    }

    fn value(&self, el: ElementId) -> String {
        self.nodes[el.0].value.clone()
    }

    fn is_checked(&self, el: ElementId) -> bool {
        self.nodes[el.0].checked
    }

    fn set_disabled(&mut self, el: ElementId, disabled: bool) {
        self.nodes[el.0].disabled = disabled;
    }

    fn create_element(&mut self, tag: &str) -> ElementId {
        self.nodes.push(Node {
            tag: tag.to_ascii_lowercase(),
            ..Node::default()
        });
        ElementId(self.nodes.len() - 1)
    }

    fn append_child(&mut self, parent: ElementId, child: ElementId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn insert_after(&mut self, reference: ElementId, new: ElementId) {
        let Some(parent) = self.nodes[reference.0].parent else {
            return;
        };
        self.detach(new);
        let siblings = &mut self.nodes[parent.0].children;
        let pos = siblings
            .iter()
            .position(|c| *c == reference)
            .map_or(siblings.len(), |p| p + 1);
        siblings.insert(pos, new);
        self.nodes[new.0].parent = Some(parent);
    }

    fn next_sibling(&self, el: ElementId) -> Option<ElementId> {
        let parent = self.nodes[el.0].parent?;
        let siblings = &self.nodes[parent.0].children;
        let pos = siblings.iter().position(|c| *c == el)?;
        siblings.get(pos + 1).copied()
    }

    fn parent(&self, el: ElementId) -> Option<ElementId> {
        self.nodes[el.0].parent
    }

    fn remove(&mut self, el: ElementId) {
        self.detach(el);
        if self.focused == Some(el) {
            self.focused = None;
        }
    }

    fn clear_children(&mut self, el: ElementId) {
        for child in std::mem::take(&mut self.nodes[el.0].children) {
            self.nodes[child.0].parent = None;
        }
    }

    fn is_connected(&self, el: ElementId) -> bool {
        let mut current = el;
        loop {
            if current == self.body() {
                return true;
            }
            match self.nodes[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn focus(&mut self, el: ElementId) {
        self.focused = Some(el);
    }

    fn scroll_into_view(&mut self, el: ElementId, block: ScrollBlock) {
        self.scrolls.push((el, block));
    }

    fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    fn set_modal_open(&mut self, el: ElementId, open: bool) {
        if open {
            self.open_modals.insert(el);
        } else {
            self.open_modals.remove(&el);
        }
    }
}
