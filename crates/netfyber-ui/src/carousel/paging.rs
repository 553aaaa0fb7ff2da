//! Page arithmetic for the plans carousel.
//!
//! `index` is always the offset of a page. The last page is pulled back so
//! it stays full, so with ten items at four per view the offsets are
//! `0, 4, 6`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselState {
    index: usize,
    items_per_view: usize,
    total_items: usize,
    wrap: bool,
}

impl CarouselState {
    /// A zero `items_per_view` is treated as one.
    #[must_use]
    pub fn new(total_items: usize, items_per_view: usize, wrap: bool) -> Self {
        Self {
            index: 0,
            items_per_view: items_per_view.max(1),
            total_items,
            wrap,
        }
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn items_per_view(&self) -> usize {
        self.items_per_view
    }

    #[must_use]
    pub fn total_items(&self) -> usize {
        self.total_items
    }

    #[must_use]
    pub fn wraps(&self) -> bool {
        self.wrap
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.total_items.div_ceil(self.items_per_view).max(1)
    }

    #[must_use]
    pub fn max_index(&self) -> usize {
        self.total_items.saturating_sub(self.items_per_view)
    }

    #[must_use]
    pub fn offset_of(&self, page: usize) -> usize {
        page.saturating_mul(self.items_per_view).min(self.max_index())
    }

    /// The page whose offset is `index`. A clamped last page still counts
    /// as its own page.
    #[must_use]
    pub fn current_page(&self) -> usize {
        self.index.div_ceil(self.items_per_view)
    }

    #[must_use]
    pub fn is_first_page(&self) -> bool {
        self.current_page() == 0
    }

    #[must_use]
    pub fn is_last_page(&self) -> bool {
        self.current_page() + 1 >= self.page_count()
    }

    pub fn next(&mut self) {
        let page = self.current_page();
        if page + 1 < self.page_count() {
            self.index = self.offset_of(page + 1);
        } else if self.wrap {
            self.index = 0;
        }
    }

    pub fn prev(&mut self) {
        let page = self.current_page();
        if page > 0 {
            self.index = self.offset_of(page - 1);
        } else if self.wrap {
            self.index = self.offset_of(self.page_count() - 1);
        }
    }

    /// Jumps to `page`, clamped into the valid page range.
    pub fn go_to(&mut self, page: usize) {
        let last = self.page_count() - 1;
        self.index = self.offset_of(page.min(last));
    }

    /// Changes the page size, keeping the first visible item on screen.
    /// Returns `false` when the size did not change.
    pub fn set_items_per_view(&mut self, items_per_view: usize) -> bool {
        let items_per_view = items_per_view.max(1);
        if items_per_view == self.items_per_view {
            return false;
        }
        let first_visible = self.index;
        self.items_per_view = items_per_view;
        self.index = self.offset_of(first_visible / items_per_view);
        true
    }

    /// Track offset as a percentage of the viewport, always `<= 0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn translate_percent(&self) -> f64 {
        0.0 - (self.index as f64) * 100.0 / (self.items_per_view as f64)
    }
}
