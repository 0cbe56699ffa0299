use std::fmt;

use clap::ValueEnum;

/// Local storage key holding the persisted theme.
pub const STORAGE_KEY: &str = "theme";

/// Attribute on the document root carrying the active theme.
pub const THEME_ATTR: &str = "data-theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Interprets a stored or attribute value: only `"dark"` selects dark.
    pub fn from_value(value: &str) -> Self {
        if value == "dark" {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    /// Which theme icons are shown while this theme is active.
    ///
    /// The icon stands for the action the toggle performs, so the sun is
    /// shown while dark is active and the moon while light is active.
    pub fn icons(self) -> IconVisibility {
        match self {
            Theme::Dark => IconVisibility {
                sun: true,
                moon: false,
            },
            Theme::Light => IconVisibility {
                sun: false,
                moon: true,
            },
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Sun,
    Moon,
}

impl Icon {
    /// Class selecting the icon inside the toggle control.
    pub fn class(self) -> &'static str {
        match self {
            Icon::Sun => "fa-sun",
            Icon::Moon => "fa-moon",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconVisibility {
    pub sun: bool,
    pub moon: bool,
}

impl IconVisibility {
    pub fn is_visible(self, icon: Icon) -> bool {
        match icon {
            Icon::Sun => self.sun,
            Icon::Moon => self.moon,
        }
    }
}
