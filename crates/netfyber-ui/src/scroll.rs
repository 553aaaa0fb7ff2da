//! In-page anchor scrolling and reveal-on-scroll animations.

use std::collections::BTreeSet;

use crate::dom::{Dom, ElementId, ScrollBlock};
use crate::event::Dispatch;

pub const REVEAL_SELECTOR: &str = ".feature-card, .plan-card, .blog-post-item, .guia-card";
pub const REVEAL_CLASS: &str = "fade-in-up";
pub const REVEAL_THRESHOLD: f64 = 0.1;

/// Handles a click that may have landed on (or inside) an in-page anchor.
///
/// Anchors whose `href` starts with `#` scroll their target into view
/// instead of navigating. A bare `#` is left alone.
pub fn smooth_scroll(dom: &mut dyn Dom, target: ElementId) -> Dispatch {
    let Some(anchor) = enclosing_anchor(dom, target) else {
        return Dispatch::CONTINUE;
    };
    let Some(href) = dom.attr(anchor, "href") else {
        return Dispatch::CONTINUE;
    };
    let Some(fragment) = href.strip_prefix('#').filter(|f| !f.is_empty()) else {
        return Dispatch::CONTINUE;
    };
    match dom.by_id(fragment) {
        Some(section) => dom.scroll_into_view(section, ScrollBlock::Start),
        None => tracing::debug!(%href, "anchor target missing"),
    }
    Dispatch::PREVENT
}

fn enclosing_anchor(dom: &dyn Dom, target: ElementId) -> Option<ElementId> {
    let mut current = Some(target);
    while let Some(el) = current {
        if dom.tag(el) == "a" {
            return Some(el);
        }
        current = dom.parent(el);
    }
    None
}

/// Adds [`REVEAL_CLASS`] to content cards the first time they scroll into
/// view.
#[derive(Debug, Default)]
pub struct RevealOnScroll {
    observed: BTreeSet<ElementId>,
}

impl RevealOnScroll {
    #[must_use]
    pub fn mount(dom: &dyn Dom) -> Self {
        Self {
            observed: dom.query_all(REVEAL_SELECTOR).into_iter().collect(),
        }
    }

    /// Elements the host should report intersections for.
    pub fn observed(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.observed.iter().copied()
    }

    #[must_use]
    pub fn is_observing(&self, el: ElementId) -> bool {
        self.observed.contains(&el)
    }

    /// Reveals `el` once it is at least a tenth visible and stops
    /// observing it. Returns `true` when `el` was revealed.
    pub fn on_intersect(&mut self, dom: &mut dyn Dom, el: ElementId, ratio: f64) -> bool {
        if ratio < REVEAL_THRESHOLD || !self.observed.remove(&el) {
            return false;
        }
        dom.add_class(el, REVEAL_CLASS);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;

    #[test]
    fn anchor_click_scrolls_to_section() {
        let mut dom = MemoryDom::default();
        let body = dom.body();
        let link = dom.append(body, "a");
        dom.set_attr(link, "href", "#planos");
        let icon = dom.append(link, "i");
        let section = dom.append(body, "section");
        dom.set_attr(section, "id", "planos");

        assert_eq!(smooth_scroll(&mut dom, icon), Dispatch::PREVENT);
        assert_eq!(dom.scroll_requests(), &[(section, ScrollBlock::Start)]);
    }

    #[test]
    fn bare_hash_and_external_links_navigate() {
        let mut dom = MemoryDom::default();
        let body = dom.body();
        let bare = dom.append(body, "a");
        dom.set_attr(bare, "href", "#");
        let external = dom.append(body, "a");
        dom.set_attr(external, "href", "/blog");
        let text = dom.append(body, "p");

        assert_eq!(smooth_scroll(&mut dom, bare), Dispatch::CONTINUE);
        assert_eq!(smooth_scroll(&mut dom, external), Dispatch::CONTINUE);
        assert_eq!(smooth_scroll(&mut dom, text), Dispatch::CONTINUE);
        assert!(dom.scroll_requests().is_empty());
    }

    #[test]
    fn missing_target_still_prevents_navigation() {
        let mut dom = MemoryDom::default();
        let body = dom.body();
        let link = dom.append(body, "a");
        dom.set_attr(link, "href", "#nowhere");
        assert_eq!(smooth_scroll(&mut dom, link), Dispatch::PREVENT);
        assert!(dom.scroll_requests().is_empty());
    }

    #[test]
    fn reveal_happens_once_above_threshold() {
        let mut dom = MemoryDom::default();
        let body = dom.body();
        let card = dom.append_with_class(body, "div", "plan-card");
        let guide = dom.append_with_class(body, "div", "guia-card");
        dom.append_with_class(body, "div", "footer");
        let mut reveal = RevealOnScroll::mount(&dom);
        assert_eq!(reveal.observed().collect::<Vec<_>>(), vec![card, guide]);

        assert!(!reveal.on_intersect(&mut dom, card, 0.05));
        assert!(reveal.is_observing(card));
        assert!(reveal.on_intersect(&mut dom, card, 0.1));
        assert!(dom.has_class(card, REVEAL_CLASS));
        assert!(!reveal.is_observing(card));
        assert!(!reveal.on_intersect(&mut dom, card, 1.0));
    }
}
