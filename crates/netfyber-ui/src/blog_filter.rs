//! Category filter on the blog index.

use netfyber_core::BlogConfig;

use crate::context::Ctx;
use crate::dom::ElementId;
use crate::event::Event;
use crate::timer::{TimerEvent, TimerId};

pub const BUTTON_SELECTOR: &str = ".filter-btn";
pub const POST_SELECTOR: &str = ".blog-post-item";
pub const COUNT_ID: &str = "filter-count";
pub const ALL: &str = "all";

const HIDDEN_CLASS: &str = "hidden";
const FADING_CLASS: &str = "fading";

/// Count label for `filter` with `count` visible posts.
#[must_use]
pub fn filter_label(filter: &str, count: usize) -> String {
    if filter == ALL {
        return format!("Mostrando todos os {count} posts");
    }
    let noun = match filter {
        "tecnologia" => "tecnologia",
        "noticias" => "notícias",
        other => other,
    };
    let plural = if count == 1 { "" } else { "s" };
    format!("{count} post{plural} de {noun}")
}

#[derive(Debug)]
struct Post {
    el: ElementId,
    category: String,
}

#[derive(Debug)]
struct PendingFade {
    timer: TimerId,
    filter: String,
}

#[derive(Debug)]
pub struct BlogFilterWidget {
    fade_ms: u64,
    buttons: Vec<ElementId>,
    posts: Vec<Post>,
    label: Option<ElementId>,
    pending: Option<PendingFade>,
}

impl BlogFilterWidget {
    /// Returns `None` when the page has no filter buttons or no posts.
    pub fn mount(ctx: &mut Ctx<'_>, cfg: &BlogConfig) -> Option<Self> {
        let buttons = ctx.dom.query_all(BUTTON_SELECTOR);
        let posts: Vec<Post> = ctx
            .dom
            .query_all(POST_SELECTOR)
            .into_iter()
            .map(|el| Post {
                el,
                category: ctx.dom.attr(el, "data-category").unwrap_or_default(),
            })
            .collect();
        if buttons.is_empty() || posts.is_empty() {
            return None;
        }

        let widget = Self {
            fade_ms: cfg.fade_ms,
            buttons,
            posts,
            label: ctx.dom.by_id(COUNT_ID),
            pending: None,
        };
        widget.set_label(ctx, ALL, widget.posts.len());
        tracing::debug!(posts = widget.posts.len(), "blog filter mounted");
        Some(widget)
    }

    /// Returns `true` when `event` was a click on a filter button.
    pub fn handle(&mut self, ctx: &mut Ctx<'_>, event: &Event) -> bool {
        let Event::Click(target) = event else {
            return false;
        };
        let Some(button) = self
            .buttons
            .iter()
            .copied()
            .find(|b| ctx.dom.contains(*b, *target))
        else {
            return false;
        };
        self.select(ctx, button);
        true
    }

    /// Makes `button` the active filter, updates the count and fades out
    /// the posts that no longer match.
    pub fn select(&mut self, ctx: &mut Ctx<'_>, button: ElementId) {
        for other in &self.buttons {
            ctx.dom.remove_class(*other, "active");
            ctx.dom.remove_class(*other, "btn-primary");
            ctx.dom.add_class(*other, "btn-outline-primary");
        }
        ctx.dom.remove_class(button, "btn-outline-primary");
        ctx.dom.add_class(button, "active");
        ctx.dom.add_class(button, "btn-primary");

        let filter = ctx
            .dom
            .attr(button, "data-filter")
            .unwrap_or_else(|| ALL.to_owned());
        let visible = self.posts.iter().filter(|p| matches(&filter, p)).count();
        self.set_label(ctx, &filter, visible);

        if let Some(previous) = self.pending.take() {
            ctx.timers.cancel(previous.timer);
        }
        for post in &self.posts {
            ctx.dom.remove_class(post.el, FADING_CLASS);
            if !matches(&filter, post) && !ctx.dom.has_class(post.el, HIDDEN_CLASS) {
                ctx.dom.add_class(post.el, FADING_CLASS);
            }
        }
        let timer = ctx.schedule(self.fade_ms, TimerEvent::BlogFadeFinished);
        self.pending = Some(PendingFade { timer, filter });
    }

    pub fn on_timer(&mut self, ctx: &mut Ctx<'_>, event: TimerEvent) {
        if event != TimerEvent::BlogFadeFinished {
            return;
        }
        let Some(PendingFade { filter, .. }) = self.pending.take() else {
            return;
        };
        for post in &self.posts {
            ctx.dom.remove_class(post.el, FADING_CLASS);
            if matches(&filter, post) {
                ctx.dom.remove_class(post.el, HIDDEN_CLASS);
            } else {
                ctx.dom.add_class(post.el, HIDDEN_CLASS);
            }
        }
    }

    fn set_label(&self, ctx: &mut Ctx<'_>, filter: &str, count: usize) {
        if let Some(label) = self.label {
            ctx.dom.set_text(label, &filter_label(filter, count));
        }
    }
}

fn matches(filter: &str, post: &Post) -> bool {
    filter == ALL || post.category == filter
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Dom, MemoryDom};
    use crate::test_support::Harness;

    struct Page {
        h: Harness,
        all: ElementId,
        tech: ElementId,
        news: ElementId,
        posts: Vec<ElementId>,
        label: ElementId,
    }

    fn page() -> Page {
        let mut dom = MemoryDom::default();
        let body = dom.body();
        let mut button = |filter: &str, classes: &str| {
            let b = dom.append_with_class(body, "button", classes);
            dom.set_attr(b, "data-filter", filter);
            b
        };
        let all = button(ALL, "filter-btn btn active btn-primary");
        let tech = button("tecnologia", "filter-btn btn btn-outline-primary");
        let news = button("noticias", "filter-btn btn btn-outline-primary");
        let posts = ["tecnologia", "noticias", "tecnologia", "dicas"]
            .into_iter()
            .map(|category| {
                let post = dom.append_with_class(body, "div", "col-md-6 blog-post-item");
                dom.set_attr(post, "data-category", category);
                post
            })
            .collect();
        let label = dom.append(body, "span");
        dom.set_attr(label, "id", COUNT_ID);
        Page {
            h: Harness::with_dom(dom),
            all,
            tech,
            news,
            posts,
            label,
        }
    }

    fn fire(p: &mut Page, w: &mut BlogFilterWidget, now_ms: i64) {
        while let Some(due) = p.h.pop_due(now_ms) {
            w.on_timer(&mut p.h.ctx(due.deadline_ms), due.event);
        }
    }

    fn hidden(p: &Page) -> Vec<bool> {
        p.posts
            .iter()
            .map(|el| p.h.dom.has_class(*el, HIDDEN_CLASS))
            .collect()
    }

    #[test]
    fn label_phrasing() {
        assert_eq!(filter_label(ALL, 7), "Mostrando todos os 7 posts");
        assert_eq!(filter_label("tecnologia", 1), "1 post de tecnologia");
        assert_eq!(filter_label("tecnologia", 0), "0 posts de tecnologia");
        assert_eq!(filter_label("noticias", 1), "1 post de notícias");
        assert_eq!(filter_label("noticias", 3), "3 posts de notícias");
        assert_eq!(filter_label("dicas", 2), "2 posts de dicas");
    }

    #[test]
    fn mount_shows_total() {
        let mut p = page();
        BlogFilterWidget::mount(&mut p.h.ctx(0), &BlogConfig::default()).unwrap();
        assert_eq!(p.h.dom.text(p.label), "Mostrando todos os 4 posts");
    }

    #[test]
    fn mount_without_posts_is_none() {
        let mut h = Harness::new();
        let body = h.dom.body();
        h.dom.append_with_class(body, "button", "filter-btn");
        assert!(BlogFilterWidget::mount(&mut h.ctx(0), &BlogConfig::default()).is_none());
    }

    #[test]
    fn click_updates_label_now_and_visibility_after_fade() {
        let mut p = page();
        let mut w = BlogFilterWidget::mount(&mut p.h.ctx(0), &BlogConfig::default()).unwrap();

        assert!(w.handle(&mut p.h.ctx(0), &Event::Click(p.tech)));
        assert_eq!(p.h.dom.text(p.label), "2 posts de tecnologia");
        assert!(p.h.dom.has_class(p.tech, "active"));
        assert!(p.h.dom.has_class(p.tech, "btn-primary"));
        assert!(!p.h.dom.has_class(p.all, "active"));
        assert!(p.h.dom.has_class(p.all, "btn-outline-primary"));
        assert_eq!(hidden(&p), vec![false; 4]);
        assert!(p.h.dom.has_class(p.posts[1], FADING_CLASS));

        fire(&mut p, &mut w, 300);
        assert_eq!(hidden(&p), vec![false, true, false, true]);
        assert!(!p.h.dom.has_class(p.posts[1], FADING_CLASS));
    }

    #[test]
    fn newer_click_cancels_pending_fade() {
        let mut p = page();
        let mut w = BlogFilterWidget::mount(&mut p.h.ctx(0), &BlogConfig::default()).unwrap();

        w.handle(&mut p.h.ctx(0), &Event::Click(p.tech));
        w.handle(&mut p.h.ctx(100), &Event::Click(p.news));
        assert_eq!(p.h.dom.text(p.label), "1 post de notícias");
        assert_eq!(p.h.timers.len(), 1);

        fire(&mut p, &mut w, 400);
        assert_eq!(hidden(&p), vec![true, false, true, true]);
    }

    #[test]
    fn all_restores_every_post() {
        let mut p = page();
        let mut w = BlogFilterWidget::mount(&mut p.h.ctx(0), &BlogConfig::default()).unwrap();
        w.handle(&mut p.h.ctx(0), &Event::Click(p.news));
        fire(&mut p, &mut w, 300);

        w.handle(&mut p.h.ctx(1_000), &Event::Click(p.all));
        assert_eq!(p.h.dom.text(p.label), "Mostrando todos os 4 posts");
        fire(&mut p, &mut w, 1_300);
        assert_eq!(hidden(&p), vec![false; 4]);
    }

    #[test]
    fn clicks_elsewhere_are_ignored() {
        let mut p = page();
        let mut w = BlogFilterWidget::mount(&mut p.h.ctx(0), &BlogConfig::default()).unwrap();
        assert!(!w.handle(&mut p.h.ctx(0), &Event::Click(p.label)));
        assert!(p.h.timers.is_empty());
    }
}
