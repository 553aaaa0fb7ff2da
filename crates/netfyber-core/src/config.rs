use crate::app_config::{Breakpoint, UiConfig};
use crate::ConfigError;

/// Build the widget configuration using the provided setting lookup.
///
/// Hosts usually back `lookup` with the `data-*` attributes of the page
/// body, so a template can flip `carousel-wrap` without a rebuild. Absent
/// keys keep their defaults.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidSetting`] if a present value does not parse.
pub fn build_ui_config<F>(lookup: F) -> Result<UiConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = UiConfig::default();

    let invalid = |key: &str, reason: String| ConfigError::InvalidSetting {
        key: key.to_string(),
        reason,
    };

    let parse_u64 = |key: &str, default: u64| -> Result<u64, ConfigError> {
        match lookup(key) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| invalid(key, e.to_string())),
            None => Ok(default),
        }
    };

    let parse_usize = |key: &str, default: usize| -> Result<usize, ConfigError> {
        match lookup(key) {
            Some(raw) => {
                let value = raw
                    .trim()
                    .parse::<usize>()
                    .map_err(|e| invalid(key, e.to_string()))?;
                if value == 0 {
                    return Err(invalid(key, "must be at least 1".to_string()));
                }
                Ok(value)
            }
            None => Ok(default),
        }
    };

    let parse_bool = |key: &str, default: bool| -> Result<bool, ConfigError> {
        match lookup(key).as_deref().map(str::trim) {
            Some("true" | "1" | "") => Ok(true),
            Some("false" | "0") => Ok(false),
            Some(other) => Err(invalid(key, format!("expected true or false, got {other:?}"))),
            None => Ok(default),
        }
    };

    cfg.consent.banner_delay_ms = parse_u64("consent-delay-ms", cfg.consent.banner_delay_ms)?;

    let wide = parse_usize("carousel-wide-items", 4)?;
    let medium = parse_usize("carousel-medium-items", 2)?;
    cfg.carousel.breakpoints = vec![
        Breakpoint {
            min_width: 992,
            items: wide,
        },
        Breakpoint {
            min_width: 768,
            items: medium,
        },
    ];
    cfg.carousel.wrap_on_end = parse_bool("carousel-wrap", cfg.carousel.wrap_on_end)?;
    cfg.carousel.autoplay_interval_ms = match lookup("carousel-autoplay-ms") {
        Some(raw) if raw.trim() == "off" => None,
        Some(_) => Some(parse_u64("carousel-autoplay-ms", 8_000)?).filter(|ms| *ms > 0),
        None => cfg.carousel.autoplay_interval_ms,
    };
    if let Some(raw) = lookup("swipe-threshold-px") {
        let px = raw
            .trim()
            .parse::<f64>()
            .map_err(|e| invalid("swipe-threshold-px", e.to_string()))?;
        if !px.is_finite() || px < 0.0 {
            return Err(invalid(
                "swipe-threshold-px",
                "must be a non-negative number".to_string(),
            ));
        }
        cfg.carousel.swipe_threshold_px = px;
    }
    cfg.carousel.resize_debounce_ms =
        parse_u64("resize-debounce-ms", cfg.carousel.resize_debounce_ms)?;

    cfg.location.freshness_ms = parse_u64("location-freshness-ms", cfg.location.freshness_ms)?;
    cfg.location.device_timeout_ms =
        parse_u64("location-timeout-ms", cfg.location.device_timeout_ms)?;
    if let Some(url) = lookup("geocoder-url") {
        cfg.location.geocoder_base_url = url;
    }

    cfg.blog.fade_ms = parse_u64("blog-fade-ms", cfg.blog.fade_ms)?;
    cfg.toast_ms = parse_u64("toast-ms", cfg.toast_ms)?;

    Ok(cfg)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
