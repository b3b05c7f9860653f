//! Font coverage catalog parsed from the upstream JSON metadata.
//!
//! The upstream catalog is a JSON array of font families, each with the
//! codepoint ranges it covers and enough naming metadata to construct
//! download URLs and file names:
//!
//! ```json
//! [{
//!   "family": "Noto Kufi Arabic",
//!   "ranges": ["0600-06FF", "0750-077F"],
//!   "fileBase": "NotoKufiArabic",
//!   "dirBase": "https://example.org/fonts/notokufiarabic",
//!   "extension": "ttf",
//!   "styles": { "regular": "Regular", "bold": "Bold" }
//! }]
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    Progress,
    error::{Error, Result},
};

/// Style name suffixes used in a family's font file names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontStyles {
    pub regular: String,
    pub bold: Option<String>,
    pub italic: Option<String>,
    pub bold_italic: Option<String>,
}

impl Default for FontStyles {
    fn default() -> Self {
        Self {
            regular: "Regular".to_string(),
            bold: None,
            italic: None,
            bold_italic: None,
        }
    }
}

/// One external font family and the codepoints it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontCoverage {
    /// Family name (e.g. "Noto Kufi Arabic").
    pub family: String,
    /// Covered codepoint ranges, inclusive on both ends.
    pub ranges: Vec<(u32, u32)>,
    /// File name stem, styles appended after a hyphen.
    pub file_base: String,
    /// Base URL or directory the family's files live under.
    pub dir_base: String,
    /// Font file extension without the dot.
    pub extension: String,
    /// Archive URL when the family ships only inside a ZIP; files are
    /// extracted by member-path probing.
    pub archive: Option<String>,
    /// Style suffixes available for this family.
    pub styles: FontStyles,
}

impl FontCoverage {
    /// Whether any covered range contains the codepoint.
    pub fn covers(&self, cp: u32) -> bool {
        self.ranges.iter().any(|&(start, end)| start <= cp && cp <= end)
    }

    /// File name for a style suffix, e.g. `NotoKufiArabic-Regular.ttf`.
    pub fn file_name(&self, style: &str) -> String {
        format!("{}-{}.{}", self.file_base, style, self.extension)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFamily {
    family: String,
    ranges: Vec<String>,
    file_base: String,
    dir_base: String,
    #[serde(default = "default_extension")]
    extension: String,
    #[serde(default)]
    archive: Option<String>,
    #[serde(default)]
    styles: FontStyles,
}

fn default_extension() -> String {
    "ttf".to_string()
}

/// Parse the upstream font catalog JSON.
pub fn parse_catalog(input: &str, progress: Option<Progress<'_>>) -> Result<Vec<FontCoverage>> {
    let raw: Vec<RawFamily> = serde_json::from_str(input)?;
    let total = raw.len();
    let mut catalog = Vec::with_capacity(total);

    for (i, family) in raw.into_iter().enumerate() {
        if let Some(report) = progress {
            report(i + 1, total);
        }
        let ranges = family
            .ranges
            .iter()
            .map(|r| parse_range(r))
            .collect::<Result<Vec<_>>>()?;
        catalog.push(FontCoverage {
            family: family.family,
            ranges,
            file_base: family.file_base,
            dir_base: family.dir_base,
            extension: family.extension,
            archive: family.archive,
            styles: family.styles,
        });
    }

    Ok(catalog)
}

/// Parse a `"XXXX-YYYY"` (or single `"XXXX"`) hex range string.
fn parse_range(input: &str) -> Result<(u32, u32)> {
    let err = || Error::InvalidRange(input.to_string());
    let (start, end) = match input.split_once('-') {
        Some((a, b)) => (
            u32::from_str_radix(a.trim(), 16).map_err(|_| err())?,
            u32::from_str_radix(b.trim(), 16).map_err(|_| err())?,
        ),
        None => {
            let cp = u32::from_str_radix(input.trim(), 16).map_err(|_| err())?;
            (cp, cp)
        }
    };
    if start > end {
        return Err(err());
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "family": "Noto Kufi Arabic",
            "ranges": ["0600-06FF", "FB50"],
            "fileBase": "NotoKufiArabic",
            "dirBase": "https://example.org/fonts/notokufiarabic",
            "styles": { "regular": "Regular", "bold": "Bold", "italic": null, "boldItalic": null }
        },
        {
            "family": "Noto Sans SC",
            "ranges": ["4E00-9FFF"],
            "fileBase": "NotoSansSC",
            "dirBase": "https://example.org/fonts/notosanssc",
            "extension": "otf",
            "archive": "https://example.org/archives/NotoSansSC.zip"
        }
    ]"#;

    #[test]
    fn test_parse_catalog() {
        let catalog = parse_catalog(SAMPLE, None).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].family, "Noto Kufi Arabic");
        assert_eq!(catalog[0].ranges, vec![(0x0600, 0x06FF), (0xFB50, 0xFB50)]);
        assert_eq!(catalog[0].extension, "ttf");
        assert_eq!(catalog[0].styles.bold.as_deref(), Some("Bold"));
        assert_eq!(catalog[1].extension, "otf");
        assert!(catalog[1].archive.is_some());
    }

    #[test]
    fn test_covers() {
        let catalog = parse_catalog(SAMPLE, None).unwrap();
        assert!(catalog[0].covers(0x0627));
        assert!(catalog[0].covers(0xFB50));
        assert!(!catalog[0].covers(0x4E00));
    }

    #[test]
    fn test_file_name() {
        let catalog = parse_catalog(SAMPLE, None).unwrap();
        assert_eq!(catalog[0].file_name("Bold"), "NotoKufiArabic-Bold.ttf");
    }

    #[test]
    fn test_invalid_range() {
        let input = r#"[{"family":"X","ranges":["GGGG"],"fileBase":"X","dirBase":"x"}]"#;
        assert!(matches!(parse_catalog(input, None), Err(Error::InvalidRange(_))));
    }

    #[test]
    fn test_backwards_range() {
        let input = r#"[{"family":"X","ranges":["06FF-0600"],"fileBase":"X","dirBase":"x"}]"#;
        assert!(parse_catalog(input, None).is_err());
    }
}
