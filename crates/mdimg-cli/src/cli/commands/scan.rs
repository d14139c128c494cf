//! `mdimg scan` – list Markdown files and their image references.

use anyhow::Result;
use mdimg_core::config::MdimgConfig;
use mdimg_core::run::{inspect, InspectedFile};
use mdimg_core::url_model::link_text;

pub(crate) fn render_text(files: &[InspectedFile], cfg: &MdimgConfig) -> String {
    let mut out = String::new();
    if files.is_empty() {
        out.push_str("No Markdown files found.\n");
        return out;
    }
    for f in files {
        let name = f
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| f.path.display().to_string());
        out.push_str(&format!("{} ({} image(s))\n", name, f.images.len()));
        for img in &f.images {
            let mut line = match &img.local_name {
                Some(local) => {
                    let state = if img.exists { "local" } else { "fetch" };
                    format!(
                        "  {:<6} {} -> {}",
                        state,
                        img.url,
                        link_text(&cfg.images_dir, local)
                    )
                }
                None => format!("  {:<6} {}", "skip", img.matched),
            };
            if !img.alt.is_empty() && img.local_name.is_some() {
                line.push_str(&format!("  [{}]", img.alt));
            }
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

pub fn run_scan(cfg: &MdimgConfig, json: bool) -> Result<()> {
    let files = inspect(cfg)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&files)?);
    } else {
        print!("{}", render_text(&files, cfg));
    }
    Ok(())
}
