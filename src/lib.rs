mod assets;
pub mod auth;
pub mod bootstrap;
mod builtin;
mod cli;
pub mod config;
pub mod dom;
pub mod page;
mod progress;
mod render;
pub mod supabase;
pub mod theme;

use anyhow::Context as _;
use auth::{LoginOutcome, LoginTrigger, Notifier};
use config::SiteConfig;
use supabase::SupabaseClient;

pub use cli::ProgressMode;
pub use cli::{Args as CliArgs, BuildArgs, Command, LoginArgs};

pub async fn run(args: CliArgs) -> anyhow::Result<()> {
    match args.command {
        Command::Build(build_args) => build(&build_args),
        Command::Login(login_args) => login(&login_args).await.map(|_| ()),
    }
}

pub fn build(args: &BuildArgs) -> anyhow::Result<()> {
    use std::io::IsTerminal as _;

    let progress_enabled = match args.progress {
        ProgressMode::Always => true,
        ProgressMode::Never => false,
        ProgressMode::Auto => std::io::stderr().is_terminal(),
    };
    let progress = progress::Progress::new(progress_enabled);
    let res = build_site(args, &progress);
    progress.finish();
    res
}

fn build_site(args: &BuildArgs, progress: &progress::Progress) -> anyhow::Result<()> {
    progress.set_stage("reading config");
    let site = SiteConfig::load(&args.config)?;

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create {}", args.out.display()))?;
    let css_href = assets::write_site_css(&args.out)?;

    progress.set_stage("rendering page");
    let html = match &args.template {
        Some(path) => {
            let template = std::fs::read_to_string(path)
                .with_context(|| format!("read {}", path.display()))?;
            render::inject_runtime(&template, &site, css_href)?
        }
        None => render::build_page(&site, css_href)?,
    };
    let html = render::prerender(&html, &site, args.theme)?;

    progress.set_stage("writing output");
    let html_path = args.out.join("index.html");
    std::fs::write(&html_path, html).with_context(|| format!("write {}", html_path.display()))?;

    progress.set_stage("copying assets");
    assets::copy_dir(&args.assets, &args.out.join("static"))
        .with_context(|| format!("copy static assets from {}", args.assets.display()))?;

    tracing::info!(out = %html_path.display(), "generated site");
    Ok(())
}

/// Prints notices to stderr, where a terminal user sees them.
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, message: &str) {
        eprintln!("alert: {message}");
    }
}

pub async fn login(args: &LoginArgs) -> anyhow::Result<LoginOutcome> {
    let site = SiteConfig::load(&args.config)?;
    let client = if site.auth.enabled {
        SupabaseClient::from_config(&site.auth, &args.user_agent)
    } else {
        None
    };

    let trigger = LoginTrigger::new(&site.auth, client, StderrNotifier, args.page_url.clone());
    let outcome = trigger.begin_login(&args.provider).await;
    if let LoginOutcome::Redirect(redirect) = &outcome {
        println!("{}", redirect.url);
    }
    Ok(outcome)
}
