use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use url::Url;

use crate::theme::Theme;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProgressMode {
    /// Enable progress UI when stderr is a TTY.
    Auto,
    /// Always enable progress UI (even when piped).
    Always,
    /// Never show progress UI.
    Never,
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate the site into an output directory.
    Build(BuildArgs),
    /// Start an OAuth login with the configured auth provider and print the redirect URL.
    Login(LoginArgs),
}

#[derive(Debug, Clone, ClapArgs)]
pub struct BuildArgs {
    /// Site configuration file.
    #[arg(long, default_value = "config.yaml")]
    pub config: PathBuf,

    /// Output directory; receives `index.html` and `static/`.
    #[arg(long, default_value = "web")]
    pub out: PathBuf,

    /// Static asset directory copied to `<out>/static`.
    #[arg(long, default_value = "src")]
    pub assets: PathBuf,

    /// HTML template to use instead of the built-in page.
    ///
    /// Elements opt into configuration values with `data-config="<key>"`; the theme
    /// toggle is `#theme-toggle` with `.fa-sun` / `.fa-moon` icons.
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Theme the page is pre-rendered with, before visitor preferences apply.
    #[arg(long, value_enum, default_value = "light")]
    pub theme: Theme,

    /// Progress display: `auto`, `always`, or `never`.
    #[arg(long, value_enum, default_value = "auto")]
    pub progress: ProgressMode,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct LoginArgs {
    /// Site configuration file.
    #[arg(long, default_value = "config.yaml")]
    pub config: PathBuf,

    /// OAuth provider id (e.g. `github`).
    #[arg(long)]
    pub provider: String,

    /// URL of the page the login starts from; its origin and path become the redirect target.
    #[arg(long)]
    pub page_url: Url,

    /// HTTP User-Agent used for auth requests.
    #[arg(long, default_value = "static-site/0.1")]
    pub user_agent: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_defaults() {
        let args = Args::parse_from(["static-site", "build"]);
        let Command::Build(build) = args.command else {
            panic!("expected build");
        };
        assert_eq!(build.config, PathBuf::from("config.yaml"));
        assert_eq!(build.out, PathBuf::from("web"));
        assert_eq!(build.assets, PathBuf::from("src"));
        assert_eq!(build.theme, Theme::Light);
        assert!(build.template.is_none());
    }

    #[test]
    fn build_accepts_dark_theme() {
        let args = Args::parse_from(["static-site", "build", "--theme", "dark", "--progress", "never"]);
        let Command::Build(build) = args.command else {
            panic!("expected build");
        };
        assert_eq!(build.theme, Theme::Dark);
        assert!(matches!(build.progress, ProgressMode::Never));
    }

    #[test]
    fn login_requires_provider_and_page() {
        assert!(Args::try_parse_from(["static-site", "login", "--provider", "github"]).is_err());
        let args = Args::parse_from([
            "static-site",
            "login",
            "--provider",
            "github",
            "--page-url",
            "https://example.com/index.html",
        ]);
        let Command::Login(login) = args.command else {
            panic!("expected login");
        };
        assert_eq!(login.provider, "github");
        assert_eq!(login.page_url.as_str(), "https://example.com/index.html");
    }
}
