use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::builtin;

/// Relative path of the built-in stylesheet inside the output directory.
pub const SITE_CSS_REL: &str = "static/css/site.css";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CopyStats {
    pub files: u64,
    pub dirs: u64,
    pub skipped_links: u64,
}

/// Recursively copies `src` into `dst`, creating directories as needed.
/// Symlinks are skipped.
pub fn copy_dir(src: &Path, dst: &Path) -> anyhow::Result<CopyStats> {
    let meta = std::fs::metadata(src).with_context(|| format!("stat {}", src.display()))?;
    if !meta.is_dir() {
        anyhow::bail!("{} is not a directory", src.display());
    }

    let mut stats = CopyStats::default();
    copy_dir_inner(src, dst, &mut stats)?;
    tracing::info!(
        files = stats.files,
        dirs = stats.dirs,
        skipped_links = stats.skipped_links,
        from = %src.display(),
        to = %dst.display(),
        "copied static assets"
    );
    Ok(stats)
}

fn copy_dir_inner(src: &Path, dst: &Path, stats: &mut CopyStats) -> anyhow::Result<()> {
    std::fs::create_dir_all(dst).with_context(|| format!("create {}", dst.display()))?;
    stats.dirs += 1;

    let entries = std::fs::read_dir(src).with_context(|| format!("read {}", src.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("read entry in {}", src.display()))?;
        let file_type = entry
            .file_type()
            .with_context(|| format!("stat {}", entry.path().display()))?;
        let from = entry.path();
        let to: PathBuf = dst.join(entry.file_name());

        if file_type.is_symlink() {
            tracing::debug!(path = %from.display(), "skipping symlink");
            stats.skipped_links += 1;
        } else if file_type.is_dir() {
            copy_dir_inner(&from, &to, stats)?;
        } else {
            std::fs::copy(&from, &to)
                .with_context(|| format!("copy {} to {}", from.display(), to.display()))?;
            stats.files += 1;
        }
    }
    Ok(())
}

/// Writes the built-in stylesheet and returns its href relative to the page.
pub fn write_site_css(out_dir: &Path) -> anyhow::Result<&'static str> {
    let abs = out_dir.join(SITE_CSS_REL);
    if let Some(parent) = abs.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    std::fs::write(&abs, builtin::BUILTIN_CSS)
        .with_context(|| format!("write {}", abs.display()))?;
    Ok(SITE_CSS_REL)
}
