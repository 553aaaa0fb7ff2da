//! End-to-end page scenarios driving `App` over the in-memory document.

use std::time::Duration;

use async_trait::async_trait;
use netfyber_core::storage::{read_json, CONSENT_KEY, LOCATION_KEY};
use netfyber_core::{ConsentRecord, Coordinates, LocationRecord, ManualClock, MemoryStore, UiConfig};
use netfyber_ui::{
    App, Dispatch, Dom, ElementId, Event, Key, MemoryDom, PositionError, PositionProvider,
    Services, UiError, Visibility,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const T0: i64 = 1_700_000_000_000;

struct FixedPosition(Result<Coordinates, PositionError>);

#[async_trait(?Send)]
impl PositionProvider for FixedPosition {
    async fn current_position(&self, _timeout: Duration) -> Result<Coordinates, PositionError> {
        self.0
    }
}

fn no_position() -> Services {
    Services::new(Box::new(FixedPosition(Err(PositionError::PositionUnavailable))))
}

fn with_id(dom: &mut MemoryDom, parent: ElementId, tag: &str, id: &str) -> ElementId {
    let el = dom.append(parent, tag);
    dom.set_attr(el, "id", id);
    el
}

fn action_button(dom: &mut MemoryDom, parent: ElementId, action: &str) -> ElementId {
    let button = dom.append(parent, "button");
    dom.set_attr(button, "data-cookie-action", action);
    button
}

/// Layout shared by every page: header label, consent banner and modal.
fn base_page() -> MemoryDom {
    let mut dom = MemoryDom::new(1280);
    let body = dom.body();
    with_id(&mut dom, body, "span", "user-location");
    let banner = with_id(&mut dom, body, "div", "cookie-banner");
    action_button(&mut dom, banner, "accept-all");
    action_button(&mut dom, banner, "accept-essential");
    action_button(&mut dom, banner, "open-settings");
    let modal = with_id(&mut dom, body, "div", "cookieSettingsModal");
    with_id(&mut dom, modal, "input", "cookieAnalytics");
    with_id(&mut dom, modal, "input", "cookiePersonalization");
    action_button(&mut dom, modal, "save-settings");
    dom
}

fn plans_page(items: usize) -> MemoryDom {
    let mut dom = base_page();
    let body = dom.body();
    let container = dom.append_with_class(body, "div", "carrossel-planos-container");
    let track = dom.append_with_class(container, "div", "carrossel-planos");
    for _ in 0..items {
        let item = dom.append_with_class(track, "div", "carrossel-item");
        dom.append_with_class(item, "div", "plan-card");
    }
    dom.append_with_class(container, "button", "carrossel-anterior");
    dom.append_with_class(container, "button", "carrossel-proximo");
    dom.append_with_class(container, "div", "carrossel-indicadores");
    dom
}

fn app(dom: MemoryDom, clock: &ManualClock, services: Services) -> App<MemoryDom, MemoryStore> {
    App::from_page(dom, MemoryStore::new(), Box::new(clock.clone()), services)
        .expect("valid page settings")
}

fn find(app: &App<MemoryDom, MemoryStore>, selector: &str) -> ElementId {
    app.dom().query(selector).expect(selector)
}

fn by_id(app: &App<MemoryDom, MemoryStore>, id: &str) -> ElementId {
    app.dom().by_id(id).expect(id)
}

async fn advance(app: &mut App<MemoryDom, MemoryStore>, clock: &ManualClock, to: i64) {
    clock.set(to);
    app.advance_to(to).await;
}

#[tokio::test]
async fn consent_banner_appears_and_accept_all_persists() {
    let clock = ManualClock::new(T0);
    let mut app = app(base_page(), &clock, no_position());
    app.start("/contato");
    let banner = by_id(&app, "cookie-banner");

    advance(&mut app, &clock, T0 + 1_500).await;
    assert_eq!(app.consent().banner_state(), Some(Visibility::Appearing));
    advance(&mut app, &clock, T0 + 1_600).await;
    assert!(app.dom().has_class(banner, "show"));

    let accept = find(&app, "[data-cookie-action=accept-all]");
    assert_eq!(app.dispatch(&Event::Click(accept)), Dispatch::PREVENT);

    let record: ConsentRecord = read_json(app.store(), CONSENT_KEY).unwrap().unwrap();
    assert!(record.essential && record.analytics && record.personalization);
    assert!(!record.marketing);
    assert_eq!(record.version, "1.0");
    assert!(app.consent().is_accepted(app.store()));
    assert_eq!(app.consent().banner_state(), Some(Visibility::Disappearing));
    let toast = app.notifier().current().unwrap();
    assert!(app.dom().has_class(toast, "alert-success"));

    advance(&mut app, &clock, T0 + 1_900).await;
    assert_eq!(app.consent().banner_state(), Some(Visibility::Hidden));
    advance(&mut app, &clock, T0 + 7_000).await;
    assert!(app.notifier().current().is_none());
    assert!(!app.dom().is_connected(toast));
}

#[tokio::test]
async fn click_on_icon_inside_consent_button_runs_its_action() {
    let clock = ManualClock::new(T0);
    let mut dom = base_page();
    let accept = dom.query("[data-cookie-action=accept-all]").unwrap();
    let icon = dom.append(accept, "i");
    let text = dom.append(accept, "span");
    let mut app = app(dom, &clock, no_position());
    app.start("/");

    assert_eq!(app.dispatch(&Event::Click(text)), Dispatch::PREVENT);
    assert!(app.consent().is_accepted(app.store()));
    let record: ConsentRecord = read_json(app.store(), CONSENT_KEY).unwrap().unwrap();
    assert!(record.analytics);
    assert_eq!(app.dispatch(&Event::Click(icon)), Dispatch::PREVENT);
}

#[tokio::test]
async fn settings_modal_saves_custom_choice() {
    let clock = ManualClock::new(T0);
    let mut app = app(base_page(), &clock, no_position());
    app.start("/");
    let modal = by_id(&app, "cookieSettingsModal");

    let open = find(&app, "[data-cookie-action=open-settings]");
    app.dispatch(&Event::Click(open));
    assert!(app.dom().is_modal_open(modal));

    let personalization = by_id(&app, "cookiePersonalization");
    app.dom_mut().set_checked(personalization, true);
    let save = find(&app, "[data-cookie-action=save-settings]");
    app.dispatch(&Event::Click(save));

    assert!(!app.dom().is_modal_open(modal));
    let record: ConsentRecord = read_json(app.store(), CONSENT_KEY).unwrap().unwrap();
    assert!(!record.analytics);
    assert!(record.personalization);
    let toast = app.notifier().current().unwrap();
    assert!(app.dom().text(toast).starts_with("Cookies essenciais ativados"));
}

#[tokio::test]
async fn plans_carousel_pages_and_clamps() {
    let clock = ManualClock::new(T0);
    let mut app = app(plans_page(10), &clock, no_position());
    app.start("/planos");
    let next = find(&app, ".carrossel-proximo");
    let track = find(&app, ".carrossel-planos");

    let index = |app: &App<MemoryDom, MemoryStore>| app.carousel().unwrap().state().index();
    assert_eq!(index(&app), 0);
    app.dispatch(&Event::Click(next));
    assert_eq!(index(&app), 4);
    app.dispatch(&Event::Click(next));
    assert_eq!(index(&app), 6);
    app.dispatch(&Event::Click(next));
    assert_eq!(index(&app), 6);
    assert_eq!(app.dom().style(track, "transform"), Some("translateX(-150%)"));

    app.dispatch(&Event::KeyDown(Key::ArrowLeft));
    assert_eq!(index(&app), 4);
}

#[tokio::test]
async fn body_settings_enable_wrap_and_autoplay() {
    let clock = ManualClock::new(T0);
    let mut dom = plans_page(10);
    let body = dom.body();
    dom.set_attr(body, "data-carousel-wrap", "true");
    dom.set_attr(body, "data-carousel-autoplay-ms", "8000");
    let mut app = app(dom, &clock, no_position());
    app.start("/");
    assert!(app.config().carousel.wrap_on_end);

    let index = |app: &App<MemoryDom, MemoryStore>| app.carousel().unwrap().state().index();
    advance(&mut app, &clock, T0 + 8_000).await;
    assert_eq!(index(&app), 4);
    advance(&mut app, &clock, T0 + 16_000).await;
    assert_eq!(index(&app), 6);
    advance(&mut app, &clock, T0 + 24_000).await;
    assert_eq!(index(&app), 0);

    app.dispatch(&Event::Unmount);
    assert!(app.carousel().unwrap().is_destroyed());
    advance(&mut app, &clock, T0 + 40_000).await;
    assert_eq!(index(&app), 0);
}

#[test]
fn invalid_body_setting_is_a_config_error() {
    let clock = ManualClock::new(T0);
    let mut dom = base_page();
    let body = dom.body();
    dom.set_attr(body, "data-carousel-wide-items", "zero");
    let result = App::from_page(dom, MemoryStore::new(), Box::new(clock), no_position());
    assert!(matches!(result, Err(UiError::Config(_))));
}

#[tokio::test]
async fn carousel_only_mounts_on_plan_pages() {
    let clock = ManualClock::new(T0);
    let mut app = app(plans_page(6), &clock, no_position());
    app.start("/blog");
    assert!(app.carousel().is_none());
}

#[tokio::test]
async fn blog_filter_counts_and_hides() {
    let clock = ManualClock::new(T0);
    let mut dom = base_page();
    let body = dom.body();
    for filter in ["all", "tecnologia", "noticias"] {
        let button = dom.append_with_class(body, "button", "filter-btn btn btn-outline-primary");
        dom.set_attr(button, "data-filter", filter);
    }
    for category in ["tecnologia", "noticias", "noticias"] {
        let post = dom.append_with_class(body, "div", "blog-post-item");
        dom.set_attr(post, "data-category", category);
    }
    with_id(&mut dom, body, "p", "filter-count");

    let mut app = app(dom, &clock, no_position());
    app.start("/blog");
    let label = by_id(&app, "filter-count");
    assert_eq!(app.dom().text(label), "Mostrando todos os 3 posts");

    let tech = find(&app, ".filter-btn[data-filter=tecnologia]");
    app.dispatch(&Event::Click(tech));
    assert_eq!(app.dom().text(label), "1 post de tecnologia");

    advance(&mut app, &clock, T0 + 300).await;
    let posts = app.dom().query_all(".blog-post-item");
    let hidden: Vec<bool> = posts
        .iter()
        .map(|p| app.dom().has_class(*p, "hidden"))
        .collect();
    assert_eq!(hidden, vec![false, true, true]);
}

#[tokio::test]
async fn required_field_blocks_submit_until_filled() {
    let clock = ManualClock::new(T0);
    let mut dom = base_page();
    let body = dom.body();
    let form = dom.append(body, "form");
    let name = dom.append(form, "input");
    dom.set_attr(name, "required", "");
    let mut app = app(dom, &clock, no_position());
    app.start("/contato");

    assert_eq!(app.dispatch(&Event::Submit(form)), Dispatch::PREVENT);
    assert_eq!(app.dispatch(&Event::Submit(form)), Dispatch::PREVENT);
    assert_eq!(app.dom().query_within(form, ".invalid-feedback").len(), 1);
    assert_eq!(app.dom().focused(), Some(name));

    app.dom_mut().set_value(name, "Maria");
    assert_eq!(app.dispatch(&Event::Submit(form)), Dispatch::CONTINUE);
    assert!(app.dom().query_within(form, ".invalid-feedback").is_empty());
}

#[tokio::test]
async fn anchors_scroll_and_cards_reveal() {
    let clock = ManualClock::new(T0);
    let mut dom = base_page();
    let body = dom.body();
    let link = dom.append(body, "a");
    dom.set_attr(link, "href", "#beneficios");
    let section = with_id(&mut dom, body, "section", "beneficios");
    let card = dom.append_with_class(section, "div", "feature-card");
    let mut app = app(dom, &clock, no_position());
    app.start("/");

    assert_eq!(app.dispatch(&Event::Click(link)), Dispatch::PREVENT);
    assert_eq!(app.dom().scroll_requests().len(), 1);

    assert!(app.reveal().is_observing(card));
    app.dispatch(&Event::Intersect { el: card, ratio: 0.5 });
    assert!(app.dom().has_class(card, "fade-in-up"));
}

#[tokio::test]
async fn uncaught_error_shows_generic_toast() {
    let clock = ManualClock::new(T0);
    let mut app = app(base_page(), &clock, no_position());
    app.start("/");

    app.dispatch(&Event::UncaughtError("TypeError: x is undefined".into()));
    let toast = app.notifier().current().unwrap();
    assert!(app.dom().has_class(toast, "alert-danger"));
    assert_eq!(
        app.dom().text(toast),
        "Ocorreu um erro inesperado. Tente novamente."
    );
}

#[tokio::test]
async fn location_resolves_through_geocoder_after_settle() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("format", "json"))
        .and(query_param("accept-language", "pt-BR"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "display_name": "Fortaleza, Ceará, Brasil",
            "address": { "city": "Fortaleza", "state": "Ceará", "country": "Brasil" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let clock = ManualClock::new(T0);
    let mut dom = base_page();
    let body = dom.body();
    dom.set_attr(body, "data-geocoder-url", &server.uri());
    let position = FixedPosition(Ok(Coordinates {
        lat: -3.73,
        lon: -38.52,
    }));
    let mut app = app(dom, &clock, Services::new(Box::new(position)));
    app.start("/");
    let label = by_id(&app, "user-location");

    advance(&mut app, &clock, T0 + 1_999).await;
    assert_eq!(app.dom().text(label), "");
    advance(&mut app, &clock, T0 + 2_000).await;
    assert_eq!(app.dom().text(label), "Fortaleza, Ceará");

    let cached: LocationRecord = read_json(app.store(), LOCATION_KEY).unwrap().unwrap();
    assert_eq!(cached.timestamp, T0 + 2_000);
    assert_eq!(cached.display_name, "Fortaleza, Ceará, Brasil");
}

#[tokio::test]
async fn geocoder_outage_shows_coordinates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let clock = ManualClock::new(T0);
    let mut cfg = UiConfig::default();
    cfg.location.geocoder_base_url = server.uri();
    let position = FixedPosition(Ok(Coordinates {
        lat: -3.731_86,
        lon: -38.526_7,
    }));
    let mut app = App::new(
        base_page(),
        MemoryStore::new(),
        Box::new(clock.clone()),
        cfg,
        Services::new(Box::new(position)),
    )
    .unwrap();
    app.start("/");

    advance(&mut app, &clock, T0 + 2_000).await;
    let label = by_id(&app, "user-location");
    assert_eq!(app.dom().text(label), "-3.7319, -38.5267");
}

#[tokio::test]
async fn denied_permission_is_remembered_across_page_loads() {
    let clock = ManualClock::new(T0);
    let denied = || Services::new(Box::new(FixedPosition(Err(PositionError::PermissionDenied))));
    let mut first = app(base_page(), &clock, denied());
    first.start("/");
    advance(&mut first, &clock, T0 + 2_000).await;
    let label = by_id(&first, "user-location");
    assert_eq!(first.dom().text(label), "Permissão de localização negada");

    let store = first.store().clone();
    let mut second = App::new(
        base_page(),
        store,
        Box::new(clock.clone()),
        UiConfig::default(),
        denied(),
    )
    .unwrap();
    second.start("/");
    // Only the consent banner timer is pending; no location request.
    assert_eq!(second.next_deadline(), Some(T0 + 2_000 + 1_500));
    advance(&mut second, &clock, T0 + 10_000).await;
    let label = by_id(&second, "user-location");
    assert_eq!(second.dom().text(label), "");
}
