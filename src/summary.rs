use crate::config::Config;
use crate::errors::AppError;
use crate::models::GdpRanked;
use crate::storage::CountryStorage;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use resvg::{tiny_skia, usvg};
use sqlx::PgPool;
use std::path::{Path, PathBuf};

const SVG_WIDTH: u32 = 1000;
const SVG_HEIGHT: u32 = 600;
const TOP_N: i64 = 5;

/// Renders the summary artifact: a fixed-layout SVG ranking the top
/// countries by estimated GDP, rasterized to a PNG at the configured path.
pub struct SummaryRenderer {
    storage: CountryStorage,
    artifact_path: PathBuf,
}

impl SummaryRenderer {
    pub fn new(config: &Config, pool: PgPool) -> Self {
        Self {
            storage: CountryStorage::new(pool),
            artifact_path: PathBuf::from(&config.summary_image_path),
        }
    }

    /// Rebuild the artifact from persisted state as of the given timestamp.
    ///
    /// Overwrites the PNG on disk (creating parent directories as needed) and
    /// returns the SVG source base64-encoded for inline transport.
    pub async fn render(&self, as_of_iso: &str) -> Result<String, AppError> {
        let ranked = self.storage.top_by_gdp(TOP_N).await?;
        let total = self.storage.count().await?;

        let svg = compose_svg(total, &ranked, as_of_iso);

        if let Some(parent) = self.artifact_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::InternalError(format!("Failed to create artifact directory: {}", e))
            })?;
        }

        rasterize_png(&svg, &self.artifact_path)?;
        tracing::info!("Summary artifact written to {}", self.artifact_path.display());

        Ok(STANDARD.encode(svg.as_bytes()))
    }
}

/// Escape the five reserved markup characters for embedding in SVG text.
pub fn escape_markup(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Round to a whole figure and group thousands with commas.
pub fn format_gdp(value: f64) -> String {
    let rounded = value.round() as i128;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Compose the fixed-layout vector summary: title, total count, one ranked
/// line per entry, and an as-of footer.
pub fn compose_svg(total: i64, ranked: &[GdpRanked], as_of_iso: &str) -> String {
    let header = r##"<text x="40" y="60" font-size="28" fill="#111827">Countries Summary</text>"##
        .to_string();
    let total_text = format!(
        r##"<text x="40" y="100" font-size="18" fill="#374151">Total countries: {}</text>"##,
        total
    );
    let rows: String = ranked
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                r##"<text x="40" y="{}" font-size="18" fill="#111827">{}. {} — {}</text>"##,
                150 + i * 36,
                i + 1,
                escape_markup(&r.name),
                format_gdp(r.estimated_gdp)
            )
        })
        .collect();
    let footer = format!(
        r##"<text x="40" y="{}" font-size="14" fill="#6b7280">Last refresh: {}</text>"##,
        SVG_HEIGHT - 40,
        escape_markup(as_of_iso)
    );

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">
  <rect width="100%" height="100%" fill="#fff"/>
  {}
  {}
  {}
  {}
</svg>"##,
        SVG_WIDTH, SVG_HEIGHT, header, total_text, rows, footer
    )
}

/// Rasterize an SVG string to a PNG file.
pub fn rasterize_png(svg: &str, path: &Path) -> Result<(), AppError> {
    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &options)
        .map_err(|e| AppError::InternalError(format!("Failed to parse summary SVG: {}", e)))?;

    let mut pixmap = tiny_skia::Pixmap::new(SVG_WIDTH, SVG_HEIGHT)
        .ok_or_else(|| AppError::InternalError("Failed to allocate pixmap".to_string()))?;

    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    pixmap
        .save_png(path)
        .map_err(|e| AppError::InternalError(format!("Failed to write summary PNG: {}", e)))?;

    Ok(())
}
