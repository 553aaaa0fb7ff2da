//! Document access used by every widget.
//!
//! [`Dom`] is the only way widgets touch the page: element lookup, class
//! and style mutation, text, form values and a handful of browser actions
//! (focus, scroll, modal toggling). A browser binding implements it over
//! the real document; [`MemoryDom`] implements it over an in-process tree.

mod memory;
pub(crate) mod selector;

pub use memory::MemoryDom;

/// Opaque handle to an element owned by a [`Dom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

/// Vertical alignment for [`Dom::scroll_into_view`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBlock {
    Start,
    Center,
}

pub trait Dom {
    fn body(&self) -> ElementId;

    fn by_id(&self, id: &str) -> Option<ElementId>;

    /// All connected elements matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<ElementId>;

    fn query(&self, selector: &str) -> Option<ElementId> {
        self.query_all(selector).into_iter().next()
    }

    /// Descendants of `root` matching `selector`, in document order.
    fn query_within(&self, root: ElementId, selector: &str) -> Vec<ElementId>;

    /// Lower-case tag name.
    fn tag(&self, el: ElementId) -> String;

    fn attr(&self, el: ElementId, name: &str) -> Option<String>;
    fn set_attr(&mut self, el: ElementId, name: &str, value: &str);

    fn has_class(&self, el: ElementId, class: &str) -> bool;
    fn add_class(&mut self, el: ElementId, class: &str);
    fn remove_class(&mut self, el: ElementId, class: &str);

    /// Sets an inline style property; an empty `value` removes it.
    fn set_style(&mut self, el: ElementId, property: &str, value: &str);

    fn text(&self, el: ElementId) -> String;
    fn set_text(&mut self, el: ElementId, text: &str);

    /// Current value of a form control; empty for other elements.
    fn value(&self, el: ElementId) -> String;
    fn is_checked(&self, el: ElementId) -> bool;
    fn set_disabled(&mut self, el: ElementId, disabled: bool);

    /// Creates a detached element.
    fn create_element(&mut self, tag: &str) -> ElementId;
    fn append_child(&mut self, parent: ElementId, child: ElementId);
    /// Inserts `new` as the next sibling of `reference`.
    fn insert_after(&mut self, reference: ElementId, new: ElementId);
    fn next_sibling(&self, el: ElementId) -> Option<ElementId>;
    fn parent(&self, el: ElementId) -> Option<ElementId>;

    /// Whether `el` is `ancestor` or lies inside it.
    fn contains(&self, ancestor: ElementId, el: ElementId) -> bool {
        let mut current = Some(el);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }
    /// Detaches `el` from its parent.
    fn remove(&mut self, el: ElementId);
    fn clear_children(&mut self, el: ElementId);
    fn is_connected(&self, el: ElementId) -> bool;

    fn focus(&mut self, el: ElementId);
    fn scroll_into_view(&mut self, el: ElementId, block: ScrollBlock);
    fn viewport_width(&self) -> u32;

    /// Opens or closes a modal dialog managed by the page's component library.
    fn set_modal_open(&mut self, el: ElementId, open: bool);
}
