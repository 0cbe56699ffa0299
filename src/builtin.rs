pub const BUILTIN_CSS: &str = include_str!("builtin.css");

/// Supabase JS client loaded when authentication is enabled.
pub const SUPABASE_SDK_URL: &str = "https://cdn.jsdelivr.net/npm/@supabase/supabase-js@2";

pub const PAGE_RUNTIME_JS: &str = r#"(function () {
  var storageKey = "theme";
  var root = document.documentElement;
  var button = document.getElementById("theme-toggle");
  var iconSun = button ? button.querySelectorAll(".fa-sun") : [];
  var iconMoon = button ? button.querySelectorAll(".fa-moon") : [];

  function setVisible(nodes, visible) {
    for (var i = 0; i < nodes.length; i++) {
      nodes[i].style.display = visible ? "" : "none";
    }
  }

  function apply(theme) {
    root.setAttribute("data-theme", theme);
    setVisible(iconSun, theme === "dark");
    setVisible(iconMoon, theme !== "dark");
  }

  function systemTheme() {
    try {
      return window.matchMedia && window.matchMedia("(prefers-color-scheme: dark)").matches
        ? "dark"
        : "light";
    } catch (_) {
      return "light";
    }
  }

  function init() {
    var saved = null;
    try {
      saved = localStorage.getItem(storageKey);
    } catch (_) {
      saved = null;
    }
    apply((saved || systemTheme()) === "dark" ? "dark" : "light");

    if (button) {
      button.addEventListener("click", function () {
        var next = root.getAttribute("data-theme") === "dark" ? "light" : "dark";
        try {
          localStorage.setItem(storageKey, next);
        } catch (_) {}
        apply(next);
      });
    }

    var data = window.CONFIG || {};
    var company = data.company || {};

    var bound = document.querySelectorAll("[data-config]");
    for (var i = 0; i < bound.length; i++) {
      var key = bound[i].getAttribute("data-config");
      if (company[key]) {
        bound[i].textContent = company[key];
      } else if (data[key]) {
        bound[i].textContent = data[key];
      }
    }

    if (data.title) {
      document.title = data.title;
    } else if (company.companyShortName) {
      document.title = company.companyShortName + " - Static";
    }

    if (company.companyYear) {
      var year = document.getElementById("year");
      if (year) year.textContent = company.companyYear;
    }

    (document.body || root).style.opacity = "1";
  }

  if (document.readyState === "loading") {
    document.addEventListener("DOMContentLoaded", init);
  } else {
    init();
  }
})();"#;

pub const AUTH_RUNTIME_JS: &str = r#"(function () {
  var client = null;

  function initAuth() {
    var cfg = window.AUTH_CONFIG;
    if (!cfg || !cfg.enabled) return;
    if (window.supabase && window.supabase.createClient) {
      client = window.supabase.createClient(cfg.supabaseUrl, cfg.supabaseKey);
      console.log("Supabase initialized");
    } else {
      console.error("Supabase SDK not loaded");
    }
  }

  window.handleLogin = async function (providerId) {
    if (!client) {
      alert("Authentication is not enabled or Supabase is not initialized.");
      return;
    }
    try {
      var result = await client.auth.signInWithOAuth({
        provider: providerId,
        options: { redirectTo: window.location.origin + window.location.pathname }
      });
      if (result.error) {
        console.error("Error logging in:", result.error.message);
        alert("Login failed: " + result.error.message);
      } else {
        console.log("Login initiated:", result.data);
      }
    } catch (err) {
      console.error("Unexpected error:", err);
      alert("An unexpected error occurred.");
    }
  };

  document.addEventListener("click", function (event) {
    var target = event.target && event.target.closest
      ? event.target.closest("[data-provider]")
      : null;
    if (target) window.handleLogin(target.getAttribute("data-provider"));
  });

  if (document.readyState === "loading") {
    document.addEventListener("DOMContentLoaded", initAuth);
  } else {
    initAuth();
  }
})();"#;
