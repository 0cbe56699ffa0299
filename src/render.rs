use anyhow::Context as _;
use kuchiki::NodeRef;
use kuchiki::traits::TendrilSink as _;
use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::bootstrap::Bootstrapper;
use crate::builtin;
use crate::config::{LoginProvider, SiteConfig};
use crate::dom::DocumentPage;
use crate::page::{BINDING_ATTR, TOGGLE_ELEMENT_ID, YEAR_ELEMENT_ID};
use crate::theme::Theme;

/// Title used before the page configuration is applied.
const PLACEHOLDER_TITLE: &str = "Static";

/// Renders the built-in page.
pub fn build_page(site: &SiteConfig, css_href: &str) -> anyhow::Result<String> {
    let config_js = config_script(site)?;
    let auth_enabled = site.auth.enabled;
    let providers = &site.login.providers;

    let markup: Markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                meta name="color-scheme" content="light dark";
                title { (PLACEHOLDER_TITLE) }
                link rel="stylesheet" href=(css_href);
                script { (PreEscaped(&config_js)) }
            }
            body {
                header class="site-header" {
                    div class="site-container site-header-inner" {
                        span class="site-brand" data-config="companyShortName" { "Company" }
                        button type="button" id=(TOGGLE_ELEMENT_ID) class="theme-toggle" aria-label="Toggle theme" {
                            i class="fas fa-sun" aria-hidden="true" { "\u{2600}" }
                            i class="fas fa-moon" aria-hidden="true" { "\u{263E}" }
                        }
                    }
                }
                main class="site-container" {
                    section class="site-hero" {
                        h1 data-config="companyLongName" { "Company" }
                    }
                    section class="site-contact" {
                        (contact_card("Address", "companyAddress"))
                        (contact_card("Email", "companyEmail"))
                        (contact_card("Phone", "companyPhone"))
                    }
                    @if auth_enabled && !providers.is_empty() {
                        section class="site-login" {
                            h2 { (site.login_title()) }
                            div class="login-providers" {
                                @for p in providers {
                                    (login_button(p))
                                }
                            }
                        }
                    }
                }
                footer class="site-footer" {
                    div class="site-container" {
                        "\u{A9} "
                        span id=(YEAR_ELEMENT_ID) {}
                        " "
                        span data-config="companyLongName" {}
                    }
                }
                script { (PreEscaped(builtin::PAGE_RUNTIME_JS)) }
                @if auth_enabled {
                    script src=(builtin::SUPABASE_SDK_URL) {}
                    script { (PreEscaped(builtin::AUTH_RUNTIME_JS)) }
                }
            }
        }
    };
    Ok(markup.into_string())
}

fn contact_card(label: &str, key: &str) -> Markup {
    html! {
        div class="site-card" {
            h2 { (label) }
            p data-config=(key) {}
        }
    }
}

fn login_button(p: &LoginProvider) -> Markup {
    let class = match p.class.as_deref().map(str::trim) {
        Some(extra) if !extra.is_empty() => format!("login-button {extra}"),
        _ => "login-button".to_string(),
    };
    html! {
        button type="button" class=(class) data-provider=(p.id) {
            @if let Some(icon) = &p.icon {
                i class=(icon) aria-hidden="true" {}
                " "
            }
            (p.name)
        }
    }
}

/// Adds the stylesheet, configuration object and page runtime to a
/// user-supplied HTML template.
pub fn inject_runtime(template: &str, site: &SiteConfig, css_href: &str) -> anyhow::Result<String> {
    let document = kuchiki::parse_html().one(template);
    let config_js = config_script(site)?;

    let head_markup = html! {
        link rel="stylesheet" href=(css_href);
        script { (PreEscaped(&config_js)) }
    };
    let body_markup = html! {
        script { (PreEscaped(builtin::PAGE_RUNTIME_JS)) }
        @if site.auth.enabled {
            script src=(builtin::SUPABASE_SDK_URL) {}
            script { (PreEscaped(builtin::AUTH_RUNTIME_JS)) }
        }
    };

    let head = document
        .select_first("head")
        .map_err(|()| anyhow::anyhow!("template has no <head>"))?;
    append_parsed(head.as_node(), &head_markup.into_string());
    let body = document
        .select_first("body")
        .map_err(|()| anyhow::anyhow!("template has no <body>"))?;
    append_parsed(body.as_node(), &body_markup.into_string());

    let bound = document
        .select(&format!("[{BINDING_ATTR}]"))
        .map(|nodes| nodes.count())
        .unwrap_or(0);
    tracing::debug!(bound, "injected runtime into template");

    let mut out = Vec::new();
    document.serialize(&mut out).context("serialize template")?;
    String::from_utf8(out).context("template html not utf-8")
}

/// Moves the nodes parsed from `snippet` to the end of `target`.
fn append_parsed(target: &NodeRef, snippet: &str) {
    let scratch = kuchiki::parse_html().one(snippet);
    for container in ["head", "body"] {
        let Ok(parent) = scratch.select_first(container) else {
            continue;
        };
        for child in parent.as_node().children().collect::<Vec<_>>() {
            child.detach();
            target.append(child);
        }
    }
}

/// Runs the bootstrapper over the rendered page so it reads correctly before
/// any script executes.
pub fn prerender(html: &str, site: &SiteConfig, theme: Theme) -> anyhow::Result<String> {
    let mut page = DocumentPage::parse(html).with_prefers_dark(theme == Theme::Dark);
    let toggle = Bootstrapper::new(site.page.clone()).init(&mut page);
    tracing::debug!(theme = %toggle.theme(), "pre-rendered page");
    page.to_html()
}

fn config_script(site: &SiteConfig) -> anyhow::Result<String> {
    let config = script_json(&site.page).context("encode page config")?;
    let auth = script_json(&site.auth).context("encode auth config")?;
    Ok(format!(
        "window.CONFIG = {config};\nwindow.AUTH_CONFIG = {auth};"
    ))
}

/// JSON safe to embed inside a `<script>` element: no `<` survives, so
/// neither `</script>` nor `<!--` can reach the HTML parser.
fn script_json<T: serde::Serialize>(value: &T) -> anyhow::Result<String> {
    let json = serde_json::to_string(value)?;
    Ok(json.replace('<', "\\u003c"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(yaml: &str) -> SiteConfig {
        SiteConfig::from_yaml(yaml).unwrap()
    }

    #[test]
    fn config_script_escapes_closing_tags() {
        let cfg = site("title: \"a</script>b\"\n");
        let js = config_script(&cfg).unwrap();
        assert!(js.contains(r#"window.CONFIG = {"title":"a\u003c/script>b","company":{}};"#));
        assert!(js.contains(
            r#"window.AUTH_CONFIG = {"enabled":false,"supabaseUrl":"","supabaseKey":""};"#
        ));
    }

    #[test]
    fn config_script_escapes_comment_openers() {
        let cfg = site("company:\n  companyLongName: \"x<!--<script>y\"\n");
        let js = config_script(&cfg).unwrap();
        assert!(!js.contains('<'));
        assert!(js.contains(r#""companyLongName":"x\u003c!--\u003cscript>y""#));

        let html = build_page(&cfg, "static/css/site.css").unwrap();
        let html = prerender(&html, &cfg, Theme::Light).unwrap();
        assert!(html.contains(r#"<h1 data-config="companyLongName">x&lt;!--&lt;script&gt;y</h1>"#));
        assert!(html.contains("var storageKey = \"theme\";"));
    }

    #[test]
    fn builtin_css_does_not_hide_prerendered_body() {
        assert!(!builtin::BUILTIN_CSS.contains("opacity: 0"));
    }

    #[test]
    fn login_section_only_when_enabled() {
        let disabled = site(
            "login:\n  providers:\n    - { name: GitHub, id: github }\n",
        );
        let html = build_page(&disabled, "static/css/site.css").unwrap();
        assert!(!html.contains("data-provider"));
        assert!(!html.contains(builtin::SUPABASE_SDK_URL));

        let enabled = site(
            "auth:\n  enabled: true\nlogin:\n  providers:\n    - { name: GitHub, id: github, icon: fab fa-github, class: btn-dark }\n",
        );
        let html = build_page(&enabled, "static/css/site.css").unwrap();
        assert!(html.contains(r#"class="login-button btn-dark" data-provider="github""#));
        assert!(html.contains(r#"<i class="fab fa-github" aria-hidden="true"></i>"#));
        assert!(html.contains(builtin::SUPABASE_SDK_URL));
        assert!(html.contains("window.handleLogin"));
    }

    #[test]
    fn prerender_applies_configuration() {
        let cfg = site(
            "company:\n  companyShortName: Acme\n  companyLongName: Acme Corp\n  companyYear: 2024\n",
        );
        let html = build_page(&cfg, "static/css/site.css").unwrap();
        let html = prerender(&html, &cfg, Theme::Dark).unwrap();

        assert!(html.contains(r#"data-theme="dark""#));
        assert!(html.contains("<title>Acme - Static</title>"));
        assert!(html.contains(r#"<h1 data-config="companyLongName">Acme Corp</h1>"#));
        assert!(html.contains(r#"<span id="year">2024</span>"#));
        assert!(html.contains(r#"<body style="opacity: 1">"#));
        assert!(html.contains(r#"<p data-config="companyEmail"></p>"#));
    }

    #[test]
    fn template_gets_runtime_injected() {
        let cfg = site("title: Custom\n");
        let template = "<!DOCTYPE html><html><head><title>T</title></head><body><p data-config=\"title\">x</p></body></html>";
        let html = inject_runtime(template, &cfg, "static/css/site.css").unwrap();

        let head_end = html.find("</head>").unwrap();
        let css_at = html.find(r#"href="static/css/site.css""#).unwrap();
        assert!(css_at < head_end);
        assert!(html.contains("window.CONFIG"));
        let runtime_at = html.find("document.getElementById(\"theme-toggle\")").unwrap();
        assert!(runtime_at > html.find("<body>").unwrap());
        assert!(!html.contains("window.handleLogin"));

        let html = prerender(&html, &cfg, Theme::Light).unwrap();
        assert!(html.contains(r#"<p data-config="title">Custom</p>"#));
        assert!(html.contains("<title>Custom</title>"));
    }
}
