//! Cookie consent: persisted preferences plus the banner and settings modal.

use netfyber_core::storage::{read_json, write_json, CONSENT_KEY};
use netfyber_core::{ConsentChoice, ConsentConfig, ConsentRecord, KeyValueStore, StorageError};

use crate::context::Ctx;
use crate::dom::ElementId;
use crate::notify::ToastKind;
use crate::timer::{TimerEvent, TimerId};
use crate::transition::{ClassTransition, Visibility};

pub const BANNER_ID: &str = "cookie-banner";
pub const SETTINGS_MODAL_ID: &str = "cookieSettingsModal";
pub const ANALYTICS_TOGGLE_ID: &str = "cookieAnalytics";
pub const PERSONALIZATION_TOGGLE_ID: &str = "cookiePersonalization";
/// Attribute naming the consent operation a button triggers.
pub const ACTION_ATTR: &str = "data-cookie-action";

const SAVED_MESSAGE: &str = "Preferências de cookies salvas com sucesso!";
const ESSENTIAL_MESSAGE: &str = "Cookies essenciais ativados. Sua privacidade é importante para nós.";
const SAVE_FAILED_MESSAGE: &str = "Erro ao salvar preferências. Tente novamente.";

/// Side effects of a consent decision.
///
/// The site has no analytics or personalization integrations yet; hosts
/// that add one implement this trait.
pub trait ConsentHooks {
    fn set_analytics(&mut self, enabled: bool);
    fn set_personalization(&mut self, enabled: bool);
}

/// Default hooks: record the decision in the log and do nothing else.
#[derive(Debug, Default)]
pub struct TracingHooks;

impl ConsentHooks for TracingHooks {
    fn set_analytics(&mut self, enabled: bool) {
        tracing::info!(enabled, "analytics consent applied");
    }

    fn set_personalization(&mut self, enabled: bool) {
        tracing::info!(enabled, "personalization consent applied");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentAction {
    AcceptAll,
    AcceptEssential,
    OpenSettings,
    SaveSettings,
}

impl ConsentAction {
    #[must_use]
    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "accept-all" => Some(Self::AcceptAll),
            "accept-essential" => Some(Self::AcceptEssential),
            "open-settings" => Some(Self::OpenSettings),
            "save-settings" => Some(Self::SaveSettings),
            _ => None,
        }
    }
}

pub struct ConsentStore {
    cfg: ConsentConfig,
    hooks: Box<dyn ConsentHooks>,
    banner: Option<ClassTransition>,
    banner_delay: Option<TimerId>,
}

impl ConsentStore {
    #[must_use]
    pub fn new(cfg: ConsentConfig, hooks: Box<dyn ConsentHooks>) -> Self {
        Self {
            cfg,
            hooks,
            banner: None,
            banner_delay: None,
        }
    }

    /// Reads the stored record. Unreadable storage, invalid JSON or a value
    /// that is not a consent object yields `None`.
    #[must_use]
    pub fn get_preferences(&self, store: &dyn KeyValueStore) -> Option<ConsentRecord> {
        match read_json(store, CONSENT_KEY) {
            Ok(record) => record,
            Err(error) => {
                tracing::warn!(%error, "could not read cookie preferences");
                None
            }
        }
    }

    /// `true` once any non-null JSON value is stored under the consent
    /// key, whatever its shape.
    #[must_use]
    pub fn is_accepted(&self, store: &dyn KeyValueStore) -> bool {
        match read_json::<serde_json::Value, _>(store, CONSENT_KEY) {
            Ok(value) => value.is_some_and(|v| !v.is_null()),
            Err(error) => {
                tracing::warn!(%error, "could not read cookie preferences");
                false
            }
        }
    }

    /// Shows the banner after the configured delay when no choice is
    /// stored, otherwise silently re-applies the stored choice.
    pub fn init(&mut self, ctx: &mut Ctx<'_>) {
        self.banner = ctx.dom.by_id(BANNER_ID).map(|el| {
            ClassTransition::new(
                el,
                "show",
                self.cfg.reveal_tick_ms,
                self.cfg.hide_transition_ms,
                TimerEvent::ConsentBannerStep,
            )
        });

        if !self.is_accepted(ctx.store) {
            ctx.cancel(&mut self.banner_delay);
            self.banner_delay =
                Some(ctx.schedule(self.cfg.banner_delay_ms, TimerEvent::ConsentBannerDue));
            return;
        }
        // A stored value of another shape still counts as a decision;
        // nothing optional was granted by it.
        let choice = self
            .get_preferences(ctx.store)
            .map(|record| record.choice())
            .unwrap_or_default();
        self.apply(choice);
    }

    /// Persists `choice`, applies it, hides the banner and confirms with a
    /// toast.
    ///
    /// # Errors
    ///
    /// Returns the [`StorageError`] if the record could not be written. The
    /// visitor has already been shown an error toast and the previously
    /// stored record is untouched.
    pub fn save_preferences(
        &mut self,
        ctx: &mut Ctx<'_>,
        choice: ConsentChoice,
    ) -> Result<ConsentRecord, StorageError> {
        let record = ConsentRecord::from_choice(choice, ctx.now_utc());
        if let Err(error) = write_json(ctx.store, CONSENT_KEY, &record) {
            tracing::error!(%error, "could not save cookie preferences");
            ctx.toast(SAVE_FAILED_MESSAGE, ToastKind::Danger);
            return Err(error);
        }

        self.apply(choice);
        ctx.cancel(&mut self.banner_delay);
        if let Some(banner) = self.banner.as_mut() {
            banner.hide(ctx);
        }
        let message = if choice.analytics {
            SAVED_MESSAGE
        } else {
            ESSENTIAL_MESSAGE
        };
        ctx.toast(message, ToastKind::Success);
        Ok(record)
    }

    /// # Errors
    ///
    /// See [`ConsentStore::save_preferences`].
    pub fn accept_all(&mut self, ctx: &mut Ctx<'_>) -> Result<ConsentRecord, StorageError> {
        self.save_preferences(ctx, ConsentChoice::accept_all())
    }

    /// # Errors
    ///
    /// See [`ConsentStore::save_preferences`].
    pub fn accept_essential(&mut self, ctx: &mut Ctx<'_>) -> Result<ConsentRecord, StorageError> {
        self.save_preferences(ctx, ConsentChoice::essential_only())
    }

    pub fn open_settings(ctx: &mut Ctx<'_>) {
        if let Some(modal) = ctx.dom.by_id(SETTINGS_MODAL_ID) {
            ctx.dom.set_modal_open(modal, true);
        }
    }

    /// Saves the choice made with the settings modal toggles (a missing
    /// toggle counts as off) and closes the modal, even if saving failed.
    ///
    /// # Errors
    ///
    /// See [`ConsentStore::save_preferences`].
    pub fn save_from_settings(
        &mut self,
        ctx: &mut Ctx<'_>,
    ) -> Result<ConsentRecord, StorageError> {
        let checked = |ctx: &Ctx<'_>, id: &str| {
            ctx.dom.by_id(id).is_some_and(|el| ctx.dom.is_checked(el))
        };
        let choice = ConsentChoice {
            analytics: checked(ctx, ANALYTICS_TOGGLE_ID),
            personalization: checked(ctx, PERSONALIZATION_TOGGLE_ID),
        };
        let saved = self.save_preferences(ctx, choice);
        if let Some(modal) = ctx.dom.by_id(SETTINGS_MODAL_ID) {
            ctx.dom.set_modal_open(modal, false);
        }
        saved
    }

    /// Runs a banner or settings-modal button action.
    ///
    /// # Errors
    ///
    /// Returns the [`StorageError`] from a failed save.
    pub fn run_action(
        &mut self,
        ctx: &mut Ctx<'_>,
        action: ConsentAction,
    ) -> Result<(), StorageError> {
        match action {
            ConsentAction::AcceptAll => self.accept_all(ctx).map(drop),
            ConsentAction::AcceptEssential => self.accept_essential(ctx).map(drop),
            ConsentAction::OpenSettings => {
                Self::open_settings(ctx);
                Ok(())
            }
            ConsentAction::SaveSettings => self.save_from_settings(ctx).map(drop),
        }
    }

    /// The action bound to `el` or the nearest ancestor carrying
    /// [`ACTION_ATTR`], so clicks on a button's icon or label count.
    pub fn action_for(ctx: &Ctx<'_>, el: ElementId) -> Option<ConsentAction> {
        let mut current = Some(el);
        while let Some(node) = current {
            if let Some(value) = ctx.dom.attr(node, ACTION_ATTR) {
                return ConsentAction::from_attr(&value);
            }
            current = ctx.dom.parent(node);
        }
        None
    }

    pub fn on_timer(&mut self, ctx: &mut Ctx<'_>, event: TimerEvent) {
        match event {
            TimerEvent::ConsentBannerDue => {
                self.banner_delay = None;
                // A choice may have been made in the meantime, e.g. from the
                // settings modal linked in the footer.
                if !self.is_accepted(ctx.store) {
                    if let Some(banner) = self.banner.as_mut() {
                        banner.show(ctx);
                    }
                }
            }
            TimerEvent::ConsentBannerStep => {
                if let Some(banner) = self.banner.as_mut() {
                    banner.on_step(ctx);
                }
            }
            _ => {}
        }
    }

    #[must_use]
    pub fn banner_state(&self) -> Option<Visibility> {
        self.banner.as_ref().map(ClassTransition::state)
    }

    fn apply(&mut self, choice: ConsentChoice) {
        self.hooks.set_analytics(choice.analytics);
        self.hooks.set_personalization(choice.personalization);
    }
}

#[cfg(test)]
#[path = "consent_test.rs"]
mod tests;
