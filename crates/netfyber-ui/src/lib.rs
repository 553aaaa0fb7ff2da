//! Headless behavior for the NetFyber site pages.
//!
//! Widgets read and mutate the page through [`Dom`], persist through
//! [`netfyber_core::KeyValueStore`] and never wait on real time: delays are
//! [`TimerEvent`]s in a [`TimerQueue`] that [`App::advance_to`] fires.

pub mod app;
pub mod blog_filter;
pub mod carousel;
pub mod consent;
pub mod context;
pub mod dom;
pub mod error;
pub mod event;
pub mod form_guard;
pub mod location;
pub mod notify;
pub mod scroll;
pub mod timer;
pub mod transition;

#[cfg(test)]
mod test_support;

pub use app::{config_from_page, App, Services};
pub use blog_filter::{filter_label, BlogFilterWidget};
pub use carousel::{CarouselState, CarouselWidget};
pub use consent::{ConsentAction, ConsentHooks, ConsentStore, TracingHooks};
pub use context::Ctx;
pub use dom::{Dom, ElementId, MemoryDom, ScrollBlock};
pub use error::UiError;
pub use event::{Dispatch, Event, Key};
pub use form_guard::SubmitOutcome;
pub use location::{
    LocationError, LocationService, LocationWidget, PositionError, PositionProvider,
    ReverseGeocoder,
};
pub use notify::{Notifier, ToastKind};
pub use scroll::RevealOnScroll;
pub use timer::{TimerEvent, TimerId, TimerQueue};
pub use transition::{ClassTransition, Visibility};
