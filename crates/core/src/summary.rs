//! Summary image rendered after every refresh.
//!
//! The image shows the total country count, the refresh timestamp and the
//! top countries by estimated GDP, each with a bar scaled against the
//! largest value. Text is drawn with a built-in 5x7 bitmap font so the
//! renderer needs nothing beyond the PNG encoder.

use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Number of countries listed in the summary.
pub const TOP_COUNTRIES: i64 = 5;

pub const IMAGE_WIDTH: u32 = 600;
pub const IMAGE_HEIGHT: u32 = 400;

const BACKGROUND: Rgb<u8> = Rgb([30, 30, 30]);
const TITLE: Rgb<u8> = Rgb([255, 255, 255]);
const TEXT: Rgb<u8> = Rgb([200, 200, 200]);
const HEADING: Rgb<u8> = Rgb([255, 215, 0]);
const ENTRY: Rgb<u8> = Rgb([180, 180, 255]);
const BAR: Rgb<u8> = Rgb([90, 140, 230]);

const MARGIN: u32 = 20;
const SCALE: u32 = 2;
const GLYPH_W: u32 = 5;
const GLYPH_H: u32 = 7;
const ADVANCE: u32 = (GLYPH_W + 1) * SCALE;

const FIRST_ENTRY_Y: u32 = 160;
const ENTRY_SPACING: u32 = 44;
const BAR_OFFSET: u32 = 18;
const BAR_HEIGHT: u32 = 8;
const BAR_X: u32 = 40;
const BAR_MAX_WIDTH: u32 = IMAGE_WIDTH - BAR_X - MARGIN;

/// One line of the top-N list.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCountry {
    pub name: String,
    pub estimated_gdp: f64,
}

/// Aggregate state captured at the end of a refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshSummary {
    pub total_countries: i64,
    pub top_countries: Vec<RankedCountry>,
    pub last_refreshed_at: Option<Timestamp>,
}

/// Produces the summary artifact at a given path, replacing any previous one.
pub trait SummaryRenderer: Send + Sync {
    fn render(&self, summary: &RefreshSummary, path: &Path) -> Result<(), CoreError>;
}

/// Renders the summary as a PNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngSummaryRenderer;

impl PngSummaryRenderer {
    /// Draw the summary into an in-memory image.
    pub fn draw(&self, summary: &RefreshSummary) -> RgbImage {
        let mut img = RgbImage::from_pixel(IMAGE_WIDTH, IMAGE_HEIGHT, BACKGROUND);

        draw_text(&mut img, MARGIN, 20, "Country Currency Summary", TITLE);
        draw_text(
            &mut img,
            MARGIN,
            60,
            &format!("Total Countries: {}", summary.total_countries),
            TEXT,
        );
        let refreshed = summary
            .last_refreshed_at
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "never".to_string());
        draw_text(&mut img, MARGIN, 90, &format!("Last Refresh: {refreshed}"), TEXT);
        draw_text(
            &mut img,
            MARGIN,
            130,
            &format!("Top {TOP_COUNTRIES} by Estimated GDP:"),
            HEADING,
        );

        let max_gdp = summary
            .top_countries
            .iter()
            .map(|c| c.estimated_gdp)
            .fold(0.0_f64, f64::max);

        for (idx, country) in summary
            .top_countries
            .iter()
            .take(TOP_COUNTRIES as usize)
            .enumerate()
        {
            let y = FIRST_ENTRY_Y + idx as u32 * ENTRY_SPACING;
            let line = format!(
                "{}. {} - {}",
                idx + 1,
                country.name,
                format_gdp(country.estimated_gdp)
            );
            draw_text(&mut img, BAR_X, y, &line, ENTRY);

            let width = bar_width(country.estimated_gdp, max_gdp);
            fill_rect(&mut img, BAR_X, y + BAR_OFFSET, width, BAR_HEIGHT, BAR);
        }

        img
    }
}

impl SummaryRenderer for PngSummaryRenderer {
    fn render(&self, summary: &RefreshSummary, path: &Path) -> Result<(), CoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                CoreError::Internal(format!(
                    "failed to create summary directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        self.draw(summary)
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| {
                CoreError::Internal(format!(
                    "failed to write summary image {}: {e}",
                    path.display()
                ))
            })
    }
}

/// Format a GDP value with thousands separators and two decimals.
pub fn format_gdp(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

fn bar_width(value: f64, max: f64) -> u32 {
    if max <= 0.0 || value <= 0.0 {
        return 0;
    }
    let ratio = (value / max).clamp(0.0, 1.0);
    ((BAR_MAX_WIDTH as f64) * ratio).round().max(1.0) as u32
}

fn fill_rect(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    let x_end = (x + w).min(img.width());
    let y_end = (y + h).min(img.height());
    for py in y..y_end {
        for px in x..x_end {
            img.put_pixel(px, py, color);
        }
    }
}

/// Draw `text` with its top-left corner at `(x, y)`, clipped to the image.
fn draw_text(img: &mut RgbImage, x: u32, y: u32, text: &str, color: Rgb<u8>) {
    let max_chars = (img.width().saturating_sub(x + MARGIN) / ADVANCE) as usize;

    for (i, ch) in text.chars().take(max_chars).enumerate() {
        let rows = glyph(ch);
        let gx = x + i as u32 * ADVANCE;
        for (row, &bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_W {
                if bits & (1 << (GLYPH_W - 1 - col)) != 0 {
                    fill_rect(
                        img,
                        gx + col * SCALE,
                        y + row as u32 * SCALE,
                        SCALE,
                        SCALE,
                        color,
                    );
                }
            }
        }
    }
}

/// 5x7 bitmap for a character. Letters are drawn upper-case; characters
/// outside the table render as `?`.
fn glyph(ch: char) -> [u8; GLYPH_H as usize] {
    match ch.to_ascii_uppercase() {
        ' ' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        'A' => [0x0E, 0x11, 0x11, 0x11, 0x1F, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '(' => [0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02],
        ')' => [0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08],
        '\'' => [0x0C, 0x04, 0x08, 0x00, 0x00, 0x00, 0x00],
        '/' => [0x00, 0x01, 0x02, 0x04, 0x08, 0x10, 0x00],
        _ => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
    }
}
