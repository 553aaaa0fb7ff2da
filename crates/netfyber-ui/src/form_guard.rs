//! Client-side form validation run before a form submits.

use std::sync::LazyLock;

use regex::Regex;

use crate::dom::{Dom, ElementId, ScrollBlock};

const FIELD_SELECTOR: &str = "input[required], textarea[required], select[required], \
                              input[type=email], input[type=tel]";
const INVALID_CLASS: &str = "is-invalid";
const FEEDBACK_CLASS: &str = "invalid-feedback";

const REQUIRED_MESSAGE: &str = "Este campo é obrigatório.";
const EMAIL_MESSAGE: &str = "Informe um e-mail válido.";
const PHONE_MESSAGE: &str = "Informe um telefone válido.";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Proceed,
    Blocked { first_invalid: ElementId },
}

#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Brazilian phone numbers: 10 or 11 digits once punctuation is dropped.
#[must_use]
pub fn is_valid_phone(value: &str) -> bool {
    let digits = value.chars().filter(char::is_ascii_digit).count();
    (10..=11).contains(&digits)
}

/// Validates every checked field of `form`, updating the inline error
/// markers. Returns the invalid fields in document order.
pub fn validate_form(dom: &mut dyn Dom, form: ElementId) -> Vec<ElementId> {
    let mut invalid = Vec::new();
    for field in dom.query_within(form, FIELD_SELECTOR) {
        match field_error(dom, field) {
            Some(message) => {
                mark_invalid(dom, field, message);
                invalid.push(field);
            }
            None => clear_invalid(dom, field),
        }
    }
    invalid
}

/// Runs validation for a submit of `form`. When blocked, the first invalid
/// field has been scrolled into view and focused.
pub fn on_submit(dom: &mut dyn Dom, form: ElementId) -> SubmitOutcome {
    let invalid = validate_form(dom, form);
    let Some(&first_invalid) = invalid.first() else {
        return SubmitOutcome::Proceed;
    };
    tracing::debug!(invalid = invalid.len(), "form submission blocked");
    dom.scroll_into_view(first_invalid, ScrollBlock::Center);
    dom.focus(first_invalid);
    SubmitOutcome::Blocked { first_invalid }
}

fn field_error(dom: &dyn Dom, field: ElementId) -> Option<&'static str> {
    let value = dom.value(field);
    let value = value.trim();
    if value.is_empty() {
        return dom.attr(field, "required").map(|_| REQUIRED_MESSAGE);
    }
    match dom.attr(field, "type").as_deref() {
        Some("email") if !is_valid_email(value) => Some(EMAIL_MESSAGE),
        Some("tel") if !is_valid_phone(value) => Some(PHONE_MESSAGE),
        _ => None,
    }
}

fn feedback_after(dom: &dyn Dom, field: ElementId) -> Option<ElementId> {
    dom.next_sibling(field)
        .filter(|el| dom.has_class(*el, FEEDBACK_CLASS))
}

fn mark_invalid(dom: &mut dyn Dom, field: ElementId, message: &str) {
    dom.add_class(field, INVALID_CLASS);
    let feedback = match feedback_after(dom, field) {
        Some(existing) => existing,
        None => {
            let el = dom.create_element("div");
            dom.set_attr(el, "class", FEEDBACK_CLASS);
            dom.insert_after(field, el);
            el
        }
    };
    dom.set_text(feedback, message);
}

fn clear_invalid(dom: &mut dyn Dom, field: ElementId) {
    dom.remove_class(field, INVALID_CLASS);
    if let Some(feedback) = feedback_after(dom, field) {
        dom.remove(feedback);
    }
}
