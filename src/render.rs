//! HTML rendering of the gallery page
//!
//! One section per folder group, one tile per image. Clicking a tile copies
//! `alias_prefix + asset` (e.g. `@/assets/icons/x.svg`) to the clipboard and
//! flashes a toast.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::error::{GalleryError, Result};
use crate::gallery::{FolderGroup, GalleryIndex};

/// Path of the Server-Sent Events stream the reload client listens on
pub const LIVE_RELOAD_PATH: &str = "/__livereload";

/// Label shown for the scan root group
pub const ROOT_LABEL: &str = "Root";

const BACKGROUND_COLORS: &[&str] = &["white", "lightgray", "lightblue", "lightgreen", "lightpink"];

/// Presentation settings for the gallery page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Page title and heading
    pub title: String,
    /// Prefix prepended to an asset path when copying it
    pub alias_prefix: String,
    /// URL prefix under which the scan root is served
    pub asset_mount: String,
    /// External stylesheet href; replaces the inline styles when set
    pub stylesheet: Option<String>,
    /// Show the background colour picker
    pub color_picker: bool,
    /// Toast text shown after a successful copy
    pub notification: String,
    /// Include the live-reload client script
    pub live_reload: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: "Icons".to_string(),
            alias_prefix: "@/assets".to_string(),
            asset_mount: "/src/assets".to_string(),
            stylesheet: None,
            color_picker: true,
            notification: "Copied to clipboard".to_string(),
            live_reload: true,
        }
    }
}

/// Render the full gallery document
pub fn render_gallery(index: &GalleryIndex, options: &RenderOptions) -> String {
    let mut html = String::with_capacity(8 * 1024 + index.asset_count() * 256);
    let title = escape_html(&options.title);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("  <meta charset=\"UTF-8\">\n");
    html.push_str(
        "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    let _ = writeln!(html, "  <title>{}</title>", title);
    match &options.stylesheet {
        Some(href) => {
            let _ = writeln!(html, "  <link rel=\"stylesheet\" href=\"{}\">", escape_html(href));
        }
        None => {
            html.push_str("  <style>");
            html.push_str(INLINE_STYLES);
            html.push_str("</style>\n");
        }
    }
    html.push_str("</head>\n<body>\n");
    let _ = writeln!(html, "  <h1>{}</h1>", title);
    let _ = writeln!(
        html,
        "  <div id=\"notification\">{}</div>",
        escape_html(&options.notification)
    );

    for group in index.groups() {
        render_group(&mut html, group, options);
    }

    if options.color_picker {
        render_color_picker(&mut html);
    }

    html.push_str("  <script>");
    html.push_str(CLIPBOARD_SCRIPT);
    if options.live_reload {
        let _ = write!(
            html,
            "\n    new EventSource('{}').addEventListener('reload', () => location.reload());",
            LIVE_RELOAD_PATH
        );
    }
    html.push_str("\n  </script>\n</body>\n</html>\n");
    html
}

fn render_group(html: &mut String, group: &FolderGroup, options: &RenderOptions) {
    let label = if group.is_root() {
        ROOT_LABEL
    } else {
        group.folder.as_str()
    };

    html.push_str("  <div class=\"folder\">\n");
    let _ = writeln!(html, "    <h2>{}</h2>", escape_html(label));
    html.push_str("    <div class=\"container\">\n");

    for asset in &group.assets {
        let src = format!(
            "{}{}",
            options.asset_mount.trim_end_matches('/'),
            encode_url_path(asset)
        );
        let copy_text = format!("{}{}", options.alias_prefix.trim_end_matches('/'), asset);
        let name = asset.rsplit('/').next().unwrap_or(asset);

        html.push_str("      <div class=\"icon\">\n");
        let _ = writeln!(
            html,
            "        <img src=\"{}\" onclick=\"copyToClipboard('{}')\" alt=\"{}\"/>",
            escape_html(&src),
            escape_html(&escape_js(&copy_text)),
            escape_html(name)
        );
        let _ = writeln!(html, "        <p>{}</p>", escape_html(name));
        html.push_str("      </div>\n");
    }

    html.push_str("    </div>\n  </div>\n");
}

fn render_color_picker(html: &mut String) {
    html.push_str("  <div class=\"color-picker\">\n    Change Background\n");
    html.push_str("    <div class=\"colors\">\n");
    for color in BACKGROUND_COLORS {
        let _ = writeln!(
            html,
            "      <div class=\"color\" style=\"background-color: {c};\" onclick=\"changeBackgroundColor('{c}')\"></div>",
            c = color
        );
    }
    html.push_str("    </div>\n  </div>\n");
}

/// Normalize an asset mount into a route prefix
///
/// The result is empty (serve the root at `/`) or starts with `/` and has no
/// trailing slash. Empty segments and route syntax (`:` or `*`) are rejected.
pub fn normalize_asset_mount(mount: &str) -> Result<String> {
    let trimmed = mount.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Ok(String::new());
    }

    for segment in trimmed.split('/') {
        if segment.is_empty() || segment.contains(&[':', '*'][..]) {
            return Err(GalleryError::Config {
                message: format!("Invalid asset mount '{}'", mount),
            });
        }
    }
    Ok(format!("/{}", trimmed))
}

/// Escape text for use in HTML content and attribute values
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape text for a single-quoted JavaScript string literal
fn escape_js(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out
}

/// Percent-encode each segment of a `/`-separated path
fn encode_url_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

const CLIPBOARD_SCRIPT: &str = r#"
    function copyToClipboard(text) {
      navigator.clipboard.writeText(text).then(() => {
        const notification = document.getElementById('notification');
        notification.classList.add('show');
        setTimeout(() => notification.classList.remove('show'), 3000);
      }).catch(() => {});
    }
    function changeBackgroundColor(color) {
      document.body.style.backgroundColor = color;
    }"#;

const INLINE_STYLES: &str = r#"
    body { font-family: "Roboto", "PingFang SC", "Microsoft YaHei", sans-serif; margin: 0; padding: 20px; }
    h1 { text-align: center; margin-bottom: 30px; font-style: italic; }
    .folder { margin-bottom: 40px; }
    .folder h2 { background: linear-gradient(to right, #1D41E7, #F42F3B); opacity: 0.8; color: #fff; padding: 10px; border-radius: 5px; }
    .container { display: flex; flex-wrap: wrap; gap: 20px; }
    .icon { background-color: #fff; padding: 10px; border-radius: 10px; width: 100px; text-align: center;
            box-shadow: 0 4px 6px rgba(0, 0, 0, 0.1); transition: transform 0.3s, box-shadow 0.3s; }
    .icon:hover { transform: translateY(-4px); box-shadow: 0 8px 12px rgba(0, 0, 0, 0.2); }
    img { width: 70px; height: 70px; cursor: pointer; background-color: #fff; border-radius: 5px; margin-bottom: 5px; }
    p { margin: 0; font-size: 12px; word-wrap: break-word; }
    #notification { visibility: hidden; min-width: 250px; background: linear-gradient(to right, #eebd89, #d13abd);
                    color: #fff; text-align: center; border-radius: 5px; padding: 10px; position: fixed; z-index: 1;
                    bottom: 30px; left: 50%; transform: translateX(-50%); box-shadow: 0 4px 6px rgba(0, 0, 0, 0.1); }
    #notification.show { visibility: visible; animation: fadein 0.5s, fadeout 0.5s 2.5s; }
    @keyframes fadein { from { bottom: 20px; opacity: 0; } to { bottom: 30px; opacity: 1; } }
    @keyframes fadeout { from { bottom: 30px; opacity: 1; } to { bottom: 40px; opacity: 0; } }
    .color-picker { position: fixed; bottom: 20px; right: 20px; background-color: white; border: 1px solid #ccc;
                    border-radius: 5px; padding: 10px; box-shadow: 0 4px 8px rgba(0, 0, 0, 0.2); transition: transform 0.3s; }
    .color-picker:hover { transform: scale(1.1); }
    .colors { display: none; margin-top: 10px; }
    .color-picker:hover .colors { display: flex; gap: 10px; }
    .color { width: 20px; height: 20px; border-radius: 50%; cursor: pointer; }
  "#;
