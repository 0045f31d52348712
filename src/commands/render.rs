//! Render command handler
//!
//! Writes a one-off snapshot of the gallery page. The page has no live-reload
//! client since nothing would be serving the reload stream.

use std::fs;

use crate::cli::RenderArgs;
use crate::error::Result;
use crate::gallery::build_index;
use crate::render::render_gallery;

use super::CommandContext;

/// Render the gallery page to `--output` or return it for stdout
pub fn run_render(ctx: &CommandContext, args: &RenderArgs) -> Result<String> {
    let mut config = ctx.config.clone();
    if let Some(root) = &args.root {
        config.scan.root = root.clone();
    }
    args.page.apply(&mut config);
    config.validate()?;
    config.render.live_reload = false;

    let root = config.resolved_root(&ctx.cwd);
    let index = build_index(&root)?;
    let html = render_gallery(&index, &config.render);

    match &args.output {
        Some(path) => {
            fs::write(path, &html)?;
            tracing::info!(
                "Wrote {} folders to {}",
                index.folder_count(),
                path.display()
            );
            Ok(format!("{}\n", path.display()))
        }
        None => Ok(html),
    }
}
