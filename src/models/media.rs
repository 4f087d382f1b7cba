//! Media uploads and their computed size variants.

use serde::{Deserialize, Serialize};

/// An original upload as recorded in the content store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRecord {
    pub id: i64,
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub alt: Option<String>,
}

/// A single rendition of an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// Renditions of one image keyed by named size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaVariantSet {
    pub thumbnail: ImageSize,
    pub medium: ImageSize,
    pub large: ImageSize,
    pub full: ImageSize,
}

#[derive(Debug, Clone, Copy)]
enum SizeRule {
    /// Cut to exactly these bounds (or the original, if smaller)
    Crop(u32, u32),
    /// Scale down proportionally to fit inside these bounds
    Fit(u32, u32),
}

const THUMBNAIL: SizeRule = SizeRule::Crop(150, 150);
const MEDIUM: SizeRule = SizeRule::Fit(300, 300);
const LARGE: SizeRule = SizeRule::Fit(1024, 1024);

impl MediaVariantSet {
    /// Derive every named size from the original upload.
    pub fn from_original(media: &MediaRecord) -> Self {
        Self {
            thumbnail: variant(media, THUMBNAIL),
            medium: variant(media, MEDIUM),
            large: variant(media, LARGE),
            full: original(media),
        }
    }
}

fn original(media: &MediaRecord) -> ImageSize {
    ImageSize {
        url: media.url.clone(),
        width: media.width,
        height: media.height,
    }
}

fn variant(media: &MediaRecord, rule: SizeRule) -> ImageSize {
    let (width, height) = match rule {
        SizeRule::Crop(w, h) => (media.width.min(w), media.height.min(h)),
        SizeRule::Fit(w, h) => fit_within(media.width, media.height, w, h),
    };

    // Only downscaled renditions exist as separate files.
    if (width, height) == (media.width, media.height) {
        return original(media);
    }

    ImageSize {
        url: sized_url(&media.url, width, height),
        width,
        height,
    }
}

fn fit_within(width: u32, height: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if width == 0 || height == 0 || (width <= max_w && height <= max_h) {
        return (width, height);
    }

    let ratio = f64::min(
        f64::from(max_w) / f64::from(width),
        f64::from(max_h) / f64::from(height),
    );
    let scaled = |v: u32| ((f64::from(v) * ratio).round() as u32).max(1);

    (scaled(width), scaled(height))
}

/// `/a/photo.jpg` -> `/a/photo-300x200.jpg`
fn sized_url(url: &str, width: u32, height: u32) -> String {
    let (base, query) = match url.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (url, None),
    };

    let file_start = base.rfind('/').map_or(0, |i| i + 1);
    let suffix = format!("-{}x{}", width, height);

    let mut sized = match base[file_start..].rfind('.') {
        Some(dot) => {
            let dot = file_start + dot;
            format!("{}{}{}", &base[..dot], suffix, &base[dot..])
        }
        None => format!("{}{}", base, suffix),
    };

    if let Some(query) = query {
        sized.push('?');
        sized.push_str(query);
    }
    sized
}
