//! [`PageAdapter`] over a parsed HTML document.
//!
//! Storage lives in memory and the system preference is fixed at
//! construction, which is what a build-time render needs.

use std::collections::BTreeMap;

use anyhow::Context as _;
use kuchiki::traits::TendrilSink as _;
use kuchiki::{ElementData, NodeDataRef, NodeRef};

use crate::page::{BINDING_ATTR, Binding, PageAdapter, TOGGLE_ELEMENT_ID};
use crate::theme::Icon;

pub struct DocumentPage {
    document: NodeRef,
    /// Bound elements as found at parse time; writes never re-query.
    bound: Vec<NodeDataRef<ElementData>>,
    storage: BTreeMap<String, String>,
    prefers_dark: bool,
}

impl DocumentPage {
    pub fn parse(html: &str) -> Self {
        let document = kuchiki::parse_html().one(html);
        let bound = match document.select(&format!("[{BINDING_ATTR}]")) {
            Ok(nodes) => nodes.collect(),
            Err(()) => Vec::new(),
        };
        Self {
            document,
            bound,
            storage: BTreeMap::new(),
            prefers_dark: false,
        }
    }

    pub fn with_prefers_dark(mut self, prefers_dark: bool) -> Self {
        self.prefers_dark = prefers_dark;
        self
    }

    pub fn with_stored(mut self, key: &str, value: &str) -> Self {
        self.storage.insert(key.to_string(), value.to_string());
        self
    }

    pub fn to_html(&self) -> anyhow::Result<String> {
        let mut out = Vec::new();
        self.document
            .serialize(&mut out)
            .context("serialize document")?;
        String::from_utf8(out).context("document html not utf-8")
    }

    fn first(&self, selector: &str) -> Option<NodeDataRef<ElementData>> {
        self.document.select_first(selector).ok()
    }

    fn all(&self, selector: &str) -> Vec<NodeDataRef<ElementData>> {
        match self.document.select(selector) {
            Ok(nodes) => nodes.collect(),
            Err(()) => Vec::new(),
        }
    }
}

impl PageAdapter for DocumentPage {
    fn storage_get(&self, key: &str) -> Option<String> {
        self.storage.get(key).cloned()
    }

    fn storage_set(&mut self, key: &str, value: &str) {
        self.storage.insert(key.to_string(), value.to_string());
    }

    fn prefers_dark(&self) -> bool {
        self.prefers_dark
    }

    fn root_attribute(&self, name: &str) -> Option<String> {
        let root = self.first("html")?;
        let attrs = root.attributes.borrow();
        attrs.get(name).map(str::to_string)
    }

    fn set_root_attribute(&mut self, name: &str, value: &str) {
        if let Some(root) = self.first("html") {
            root.attributes
                .borrow_mut()
                .insert(name, value.to_string());
        }
    }

    fn set_icon_visible(&mut self, icon: Icon, visible: bool) {
        let selector = format!("#{} .{}", TOGGLE_ELEMENT_ID, icon.class());
        for node in self.all(&selector) {
            set_style_property(&node, "display", (!visible).then_some("none"));
        }
    }

    fn bindings(&self) -> Vec<Binding> {
        self.bound
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                let attrs = node.attributes.borrow();
                let key = attrs.get(BINDING_ATTR)?;
                Some(Binding {
                    index,
                    key: key.to_string(),
                })
            })
            .collect()
    }

    fn set_binding_text(&mut self, binding: &Binding, text: &str) {
        if let Some(node) = self.bound.get(binding.index) {
            replace_text(node.as_node(), text);
        }
    }

    fn title(&self) -> Option<String> {
        self.first("title").map(|t| t.text_contents())
    }

    fn set_title(&mut self, title: &str) {
        if let Some(existing) = self.first("title") {
            replace_text(existing.as_node(), title);
            return;
        }
        let Some(head) = self.first("head") else {
            return;
        };
        let scratch = kuchiki::parse_html().one("<title></title>");
        if let Ok(node) = scratch.select_first("title") {
            let node = node.as_node().clone();
            node.detach();
            replace_text(&node, title);
            head.as_node().append(node);
        }
    }

    fn set_text_by_id(&mut self, id: &str, text: &str) {
        if let Some(node) = self.first(&format!("#{id}")) {
            replace_text(node.as_node(), text);
        }
    }

    fn reveal(&mut self) {
        if let Some(target) = self.first("body").or_else(|| self.first("html")) {
            set_style_property(&target, "opacity", Some("1"));
        }
    }
}

fn replace_text(node: &NodeRef, text: &str) {
    for child in node.children().collect::<Vec<_>>() {
        child.detach();
    }
    node.append(NodeRef::new_text(text));
}

fn set_style_property(node: &NodeDataRef<ElementData>, property: &str, value: Option<&str>) {
    let mut attrs = node.attributes.borrow_mut();
    let style = with_style_property(attrs.get("style").unwrap_or(""), property, value);
    if style.is_empty() {
        attrs.remove("style");
    } else {
        attrs.insert("style", style);
    }
}

/// Rewrites an inline style so `property` is set to `value`, or dropped when
/// `value` is `None`. Other declarations keep their order.
pub fn with_style_property(style: &str, property: &str, value: Option<&str>) -> String {
    let mut decls: Vec<String> = style
        .split(';')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .filter(|d| {
            let name = d.split(':').next().unwrap_or("").trim();
            !name.eq_ignore_ascii_case(property)
        })
        .map(str::to_string)
        .collect();
    if let Some(value) = value {
        decls.push(format!("{property}: {value}"));
    }
    decls.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::Bootstrapper;
    use crate::config::PageConfig;
    use crate::theme::STORAGE_KEY;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Placeholder</title></head>
<body style="opacity: 0">
  <button id="theme-toggle"><i class="fas fa-sun"></i><i class="fas fa-moon" style="color: red"></i></button>
  <h1 data-config="companyLongName">Company</h1>
  <p data-config="companyEmail">mail@example.com</p>
  <span id="year">2000</span>
</body>
</html>"#;

    fn acme() -> PageConfig {
        serde_json::from_value(serde_json::json!({
            "company": {
                "companyShortName": "Acme",
                "companyLongName": "Acme Corporation",
                "companyYear": "2024"
            }
        }))
        .unwrap()
    }

    #[test]
    fn style_property_rewrite() {
        assert_eq!(with_style_property("", "display", Some("none")), "display: none");
        assert_eq!(
            with_style_property("color: red; display:none", "display", None),
            "color: red"
        );
        assert_eq!(
            with_style_property("opacity: 0;", "opacity", Some("1")),
            "opacity: 1"
        );
    }

    #[test]
    fn init_renders_into_document() {
        let mut page = DocumentPage::parse(PAGE).with_prefers_dark(true);
        let toggle = Bootstrapper::new(acme()).init(&mut page);
        assert_eq!(toggle.theme().as_str(), "dark");

        assert_eq!(page.root_attribute("data-theme").as_deref(), Some("dark"));
        assert_eq!(page.title().as_deref(), Some("Acme - Static"));

        let html = page.to_html().unwrap();
        assert!(html.contains(r#"<h1 data-config="companyLongName">Acme Corporation</h1>"#));
        assert!(html.contains(r#"<p data-config="companyEmail">mail@example.com</p>"#));
        assert!(html.contains(r#"<span id="year">2024</span>"#));
        assert!(html.contains(r#"<body style="opacity: 1">"#));
        assert!(html.contains(r#"<i class="fas fa-sun"></i>"#));
        assert!(html.contains(r#"style="color: red; display: none""#));
    }

    #[test]
    fn toggle_updates_document_and_storage() {
        let mut page = DocumentPage::parse(PAGE).with_stored(STORAGE_KEY, "light");
        let mut toggle = Bootstrapper::new(PageConfig::default()).init(&mut page);

        toggle.click(&mut page);
        assert_eq!(page.root_attribute("data-theme").as_deref(), Some("dark"));
        assert_eq!(page.storage_get(STORAGE_KEY).as_deref(), Some("dark"));

        let html = page.to_html().unwrap();
        assert!(html.contains(r#"<i class="fas fa-sun"></i>"#));
        assert!(html.contains(r#"<i class="fas fa-moon" style="color: red; display: none"></i>"#));
    }

    #[test]
    fn missing_title_is_created_in_head() {
        let mut page = DocumentPage::parse("<html><head></head><body></body></html>");
        page.set_title("Fresh");
        assert_eq!(page.title().as_deref(), Some("Fresh"));
        assert!(page.to_html().unwrap().contains("<head><title>Fresh</title></head>"));
    }

    #[test]
    fn nested_bindings_keep_their_own_elements() {
        let mut page = DocumentPage::parse(
            r#"<div data-config="a"><span data-config="b">x</span></div><p data-config="c">keep</p>"#,
        );
        let config: PageConfig = serde_json::from_value(serde_json::json!({
            "company": { "a": "A", "b": "B" }
        }))
        .unwrap();
        Bootstrapper::new(config).init(&mut page);

        let html = page.to_html().unwrap();
        assert!(html.contains(r#"<div data-config="a">A</div>"#));
        assert!(html.contains(r#"<p data-config="c">keep</p>"#));
    }

    #[test]
    fn missing_elements_are_skipped() {
        let mut page = DocumentPage::parse("<p>nothing bound</p>");
        Bootstrapper::new(acme()).init(&mut page);
        assert!(page.bindings().is_empty());
        assert!(page.to_html().unwrap().contains("<p>nothing bound</p>"));
    }
}
