//! Theme and configuration bootstrapper, run once per page load.

use crate::config::PageConfig;
use crate::page::{PageAdapter, YEAR_ELEMENT_ID};
use crate::theme::{Icon, STORAGE_KEY, THEME_ATTR, Theme};

pub struct Bootstrapper {
    config: PageConfig,
}

impl Bootstrapper {
    pub fn new(config: PageConfig) -> Self {
        Self { config }
    }

    /// Builds a bootstrapper for a page whose configuration object may be missing.
    pub fn from_optional(config: Option<PageConfig>) -> Self {
        Self::new(config.unwrap_or_default())
    }

    /// Runs the full initialization pass and returns the toggle to wire to the
    /// theme control.
    pub fn init<P: PageAdapter>(&self, page: &mut P) -> ThemeToggle {
        let theme = resolve_theme(page);
        apply_theme(page, theme);
        let toggle = ThemeToggle { current: theme };

        self.populate(page);
        page.reveal();
        toggle
    }

    /// Copies configuration values into bound elements, the title and `#year`.
    pub fn populate<P: PageAdapter>(&self, page: &mut P) {
        let mut bound = 0usize;
        for binding in page.bindings() {
            if let Some(value) = self.config.lookup(&binding.key) {
                page.set_binding_text(&binding, &value);
                bound += 1;
            }
        }
        tracing::debug!(bound, "populated configuration bindings");

        if let Some(title) = self.document_title() {
            page.set_title(&title);
        }

        if let Some(year) = self.config.company_year() {
            page.set_text_by_id(YEAR_ELEMENT_ID, year);
        }
    }

    /// Title the page should carry, if the configuration names one.
    pub fn document_title(&self) -> Option<String> {
        if let Some(title) = self.config.title() {
            return Some(title.to_string());
        }
        self.config
            .company_short_name()
            .map(|short| format!("{short} - Static"))
    }
}

/// Stored preference, then the system preference, then light.
pub fn resolve_theme<P: PageAdapter>(page: &P) -> Theme {
    match page.storage_get(STORAGE_KEY) {
        Some(stored) if !stored.is_empty() => {
            let theme = Theme::from_value(&stored);
            tracing::debug!(%theme, "using stored theme");
            theme
        }
        _ if page.prefers_dark() => Theme::Dark,
        _ => Theme::Light,
    }
}

/// Sets the root theme attribute and the matching icon visibility.
pub fn apply_theme<P: PageAdapter>(page: &mut P, theme: Theme) {
    page.set_root_attribute(THEME_ATTR, theme.as_str());
    let icons = theme.icons();
    page.set_icon_visible(Icon::Sun, icons.sun);
    page.set_icon_visible(Icon::Moon, icons.moon);
}

/// Two-state toggle bound to the theme control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeToggle {
    current: Theme,
}

impl ThemeToggle {
    pub fn theme(&self) -> Theme {
        self.current
    }

    /// Handles one click: flips the theme shown on the page, persists it and
    /// updates the icons.
    pub fn click<P: PageAdapter>(&mut self, page: &mut P) -> Theme {
        let shown = page
            .root_attribute(THEME_ATTR)
            .map(|v| Theme::from_value(&v))
            .unwrap_or(self.current);
        let next = shown.toggled();

        page.storage_set(STORAGE_KEY, next.as_str());
        apply_theme(page, next);
        self.current = next;
        tracing::debug!(theme = %next, "theme toggled");
        next
    }
}
