/// A viewport width threshold and the number of carousel items shown at
/// or above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoint {
    pub min_width: u32,
    pub items: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsentConfig {
    pub banner_delay_ms: u64,
    pub reveal_tick_ms: u64,
    pub hide_transition_ms: u64,
}

impl Default for ConsentConfig {
    fn default() -> Self {
        Self {
            banner_delay_ms: 1_500,
            reveal_tick_ms: 100,
            hide_transition_ms: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarouselConfig {
    /// Checked widest first; see [`CarouselConfig::items_for_width`].
    pub breakpoints: Vec<Breakpoint>,
    pub fallback_items: usize,
    pub wrap_on_end: bool,
    pub autoplay_interval_ms: Option<u64>,
    pub swipe_threshold_px: f64,
    pub resize_debounce_ms: u64,
}

impl CarouselConfig {
    /// Items per view for a viewport `width` pixels wide.
    #[must_use]
    pub fn items_for_width(&self, width: u32) -> usize {
        let mut sorted: Vec<&Breakpoint> = self.breakpoints.iter().collect();
        sorted.sort_by(|a, b| b.min_width.cmp(&a.min_width));
        sorted
            .into_iter()
            .find(|bp| width >= bp.min_width)
            .map_or(self.fallback_items, |bp| bp.items)
            .max(1)
    }
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            breakpoints: vec![
                Breakpoint {
                    min_width: 992,
                    items: 4,
                },
                Breakpoint {
                    min_width: 768,
                    items: 2,
                },
            ],
            fallback_items: 1,
            wrap_on_end: false,
            autoplay_interval_ms: None,
            swipe_threshold_px: 50.0,
            resize_debounce_ms: 250,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationConfig {
    pub freshness_ms: u64,
    pub device_timeout_ms: u64,
    pub settle_delay_ms: u64,
    pub geocoder_base_url: String,
    pub accept_language: String,
    pub geocoder_timeout_secs: u64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            freshness_ms: 5 * 60 * 1_000,
            device_timeout_ms: 10_000,
            settle_delay_ms: 2_000,
            geocoder_base_url: "https://nominatim.openstreetmap.org".to_owned(),
            accept_language: "pt-BR".to_owned(),
            geocoder_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogConfig {
    pub fade_ms: u64,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self { fade_ms: 300 }
    }
}

/// Tunables for every widget on the site.
#[derive(Debug, Clone, PartialEq)]
pub struct UiConfig {
    pub consent: ConsentConfig,
    pub carousel: CarouselConfig,
    pub location: LocationConfig,
    pub blog: BlogConfig,
    pub toast_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            consent: ConsentConfig::default(),
            carousel: CarouselConfig::default(),
            location: LocationConfig::default(),
            blog: BlogConfig::default(),
            toast_ms: 5_000,
        }
    }
}
