//! The page surface the bootstrapper drives.

use crate::theme::Icon;

/// Marker attribute naming the configuration key an element displays.
pub const BINDING_ATTR: &str = "data-config";

/// Id of the element receiving the company year.
pub const YEAR_ELEMENT_ID: &str = "year";

/// Id of the theme toggle control.
pub const TOGGLE_ELEMENT_ID: &str = "theme-toggle";

/// An element carrying [`BINDING_ATTR`], in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub index: usize,
    pub key: String,
}

/// Everything the bootstrapper needs from a page environment.
///
/// Implementations are expected to treat missing elements as no-ops: a page
/// without a toggle, a `#year` element or a `<title>` is still a valid page.
pub trait PageAdapter {
    fn storage_get(&self, key: &str) -> Option<String>;
    fn storage_set(&mut self, key: &str, value: &str);

    /// Whether the system color-scheme preference is dark.
    fn prefers_dark(&self) -> bool;

    fn root_attribute(&self, name: &str) -> Option<String>;
    fn set_root_attribute(&mut self, name: &str, value: &str);

    fn set_icon_visible(&mut self, icon: Icon, visible: bool);

    fn bindings(&self) -> Vec<Binding>;
    fn set_binding_text(&mut self, binding: &Binding, text: &str);

    fn title(&self) -> Option<String>;
    fn set_title(&mut self, title: &str);

    fn set_text_by_id(&mut self, id: &str, text: &str);

    /// Makes the page fully opaque.
    fn reveal(&mut self);
}
