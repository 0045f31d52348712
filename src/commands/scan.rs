//! Scan command handler

use std::fmt::Write;

use crate::cli::{OutputFormat, ScanArgs};
use crate::error::{GalleryError, Result};
use crate::gallery::{build_index_with_stats, GalleryIndex};

use super::CommandContext;

/// Scan the asset root and format the resulting index
pub fn run_scan(ctx: &CommandContext, args: &ScanArgs) -> Result<String> {
    let mut config = ctx.config.clone();
    if let Some(root) = &args.root {
        config.scan.root = root.clone();
    }
    let root = config.resolved_root(&ctx.cwd);

    let (index, stats) = build_index_with_stats(&root)?;
    tracing::info!(
        "Found {} assets in {} folders under {} ({}ms)",
        stats.assets,
        stats.folders,
        root.display(),
        stats.duration_ms
    );

    match ctx.format {
        OutputFormat::Json => format_json(&index),
        OutputFormat::Text => Ok(format_text(&index)),
    }
}

fn format_json(index: &GalleryIndex) -> Result<String> {
    let mut json = serde_json::to_string_pretty(index).map_err(|e| GalleryError::Output {
        message: format!("Failed to serialize index: {}", e),
    })?;
    json.push('\n');
    Ok(json)
}

fn format_text(index: &GalleryIndex) -> String {
    let mut out = String::new();
    for group in index.groups() {
        let _ = writeln!(out, "{} ({})", group.folder, group.assets.len());
        for asset in &group.assets {
            let _ = writeln!(out, "  {}", asset);
        }
    }
    let _ = writeln!(
        out,
        "{} assets in {} folders",
        index.asset_count(),
        index.folder_count()
    );
    out
}
