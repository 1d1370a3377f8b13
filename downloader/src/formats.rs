/// Best-effort scraping of `yt-dlp --list-formats` text output.
///
/// Rows are recognised by tokens rather than columns, so the parser
/// tolerates column reordering but breaks silently (zero rows) if the
/// tool changes its token shapes.
use once_cell::sync::Lazy;
use regex::Regex;

use vidfetch_shared::models::FormatRecord;

/// Minimum whitespace-separated tokens for a candidate row.
pub const MIN_ROW_TOKENS: usize = 5;

pub const AUDIO_ONLY: &str = "Audio Only";

// ====== REGEX PATTERNS ======

static SIZE_UNIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)MiB|KiB|GiB").unwrap());

/// Column header fragments. Any row containing one is skipped.
static HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)format code|resolution|ext").unwrap());

static RESOLUTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+x(\d+)").unwrap());

static FILESIZE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^([\d.]+)(MiB|KiB|GiB|MB|KB)").unwrap());

static EXT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\w{2,4}$").unwrap());

/// What a single row token was recognised as.
#[derive(Debug, Clone, PartialEq)]
enum Token<'a> {
    Quality(String),
    Filesize(&'a str),
    Ext(&'a str),
    Other,
}

fn classify(token: &str) -> Token<'_> {
    if let Some(caps) = RESOLUTION_RE.captures(token) {
        return Token::Quality(format!("{}p", &caps[1]));
    }
    if token == "audio" || token == "audio-only" {
        return Token::Quality(AUDIO_ONLY.to_string());
    }
    if FILESIZE_RE.is_match(token) {
        return Token::Filesize(token);
    }
    if EXT_RE.is_match(token) {
        let lower = token.to_lowercase();
        if lower != "none" && lower != "n/a" {
            return Token::Ext(token);
        }
    }
    Token::Other
}

/// Parse the full listing into records, in encounter order.
///
/// Rows lacking a quality marker, an extension, or a size are dropped.
pub fn parse_format_listing(text: &str) -> Vec<FormatRecord> {
    text.lines().filter_map(parse_format_row).collect()
}

/// Parse one listing line. `None` if it is not a complete format row.
pub fn parse_format_row(line: &str) -> Option<FormatRecord> {
    if !SIZE_UNIT_RE.is_match(line) || HEADER_RE.is_match(line) {
        return None;
    }

    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < MIN_ROW_TOKENS {
        return None;
    }
    let format_id = parts[0];
    if !format_id.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let mut quality: Option<String> = None;
    let mut filesize: Option<&str> = None;
    let mut ext: Option<&str> = None;

    // First token of each kind wins.
    for part in &parts[1..] {
        match classify(part) {
            Token::Quality(q) => {
                quality.get_or_insert(q);
            }
            Token::Filesize(s) => {
                filesize.get_or_insert(s);
            }
            Token::Ext(e) => {
                ext.get_or_insert(e);
            }
            Token::Other => {}
        }
    }

    let filesize_mb = parse_filesize_mb(filesize?)?;

    Some(FormatRecord {
        format_id: format_id.to_string(),
        quality: quality?,
        ext: ext?.to_string(),
        filesize_mb,
    })
}

/// Convert a size token such as `10.50MiB` to megabytes, 2 decimals.
pub fn parse_filesize_mb(token: &str) -> Option<f64> {
    let caps = FILESIZE_RE.captures(token)?;
    let value: f64 = caps[1].parse().ok()?;
    let mb = match caps[2].to_uppercase().as_str() {
        "GIB" | "GB" => value * 1024.0,
        "KIB" | "KB" => value / 1024.0,
        _ => value,
    };
    Some(round2(mb))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "\
[youtube] Extracting URL: https://www.youtube.com/watch?v=dQw4w9WgXcQ
[info] Available formats for dQw4w9WgXcQ:
ID  EXT   RESOLUTION FPS CH |   FILESIZE   TBR PROTO | VCODEC          VBR ACODEC      ABR ASR MORE INFO
------------------------------------------------------------------------------------------------------------
sb0 mhtml 48x27        0    |                  mhtml | images                                  storyboard
139 m4a   audio only      2 |    1.23MiB   49k https | audio only          mp4a.40.5   49k 22k low, m4a_dash
18  mp4   640x360     30  2 |   12.01MiB  476k https | avc1.42001E         mp4a.40.2       44k 360p
137 mp4   1920x1080   30    |  120.50MiB 4800k https | avc1.640028   4800k video only          1080p, mp4_dash
";

    #[test]
    fn test_single_row() {
        let records = parse_format_listing("22  1280x720  mp4  |  10.50MiB");
        assert_eq!(
            records,
            vec![FormatRecord {
                format_id: "22".into(),
                quality: "720p".into(),
                ext: "mp4".into(),
                filesize_mb: 10.5,
            }]
        );
    }

    #[test]
    fn test_realistic_listing_in_order() {
        let records = parse_format_listing(LISTING);
        let ids: Vec<&str> = records.iter().map(|r| r.format_id.as_str()).collect();
        assert_eq!(ids, vec!["139", "18", "137"]);

        assert_eq!(records[0].quality, AUDIO_ONLY);
        assert_eq!(records[0].ext, "m4a");
        assert_eq!(records[0].filesize_mb, 1.23);

        assert_eq!(records[1].quality, "360p");
        assert_eq!(records[1].ext, "mp4");

        assert_eq!(records[2].quality, "1080p");
        assert_eq!(records[2].filesize_mb, 120.5);
    }

    #[test]
    fn test_unit_normalization() {
        let gib = parse_format_row("401  3840x2160  webm  |  1GiB  https").unwrap();
        assert_eq!(gib.filesize_mb, 1024.0);

        let kib = parse_format_row("599  audio-only  m4a  |  1024KiB  https").unwrap();
        assert_eq!(kib.filesize_mb, 1.0);
        assert_eq!(kib.quality, AUDIO_ONLY);
    }

    #[test]
    fn test_parse_filesize_rounding() {
        assert_eq!(parse_filesize_mb("3.14159MiB"), Some(3.14));
        assert_eq!(parse_filesize_mb("512KiB"), Some(0.5));
        assert_eq!(parse_filesize_mb("2.5gib"), Some(2560.0));
        assert_eq!(parse_filesize_mb("100KB"), Some(0.1));
        assert_eq!(parse_filesize_mb("~10MiB"), None);
        assert_eq!(parse_filesize_mb("1.2.3MiB"), None);
    }

    #[test]
    fn test_incomplete_rows_dropped() {
        // no resolution or audio marker
        assert!(parse_format_row("22  mp4  |  10.50MiB  https  avc1").is_none());
        // no extension
        assert!(parse_format_row("22  1280x720  |  10.50MiB  https  avc1.4d401f").is_none());
        // size unit only in a non-size token
        assert!(parse_format_row("22  1280x720  mp4  |  sizeMiB  https").is_none());
    }

    #[test]
    fn test_non_candidate_lines_skipped() {
        // non-numeric id
        assert!(parse_format_row("hls-720  1280x720  mp4  |  10.50MiB  m3u8").is_none());
        // header token present
        assert!(parse_format_row("format code  extension  resolution  10MiB  x  y").is_none());
        // too few tokens
        assert!(parse_format_row("22  1280x720  10.50MiB").is_none());
        // no size unit at all
        assert!(parse_format_row("22  1280x720  mp4  |  ~  https  avc1").is_none());
    }

    #[test]
    fn test_none_is_not_an_extension() {
        assert!(parse_format_row("22  1280x720  none  |  10.50MiB  https.x").is_none());
        assert!(parse_format_row("22  1280x720  n/a  |  10.50MiB  https.x").is_none());
    }

    #[test]
    fn test_first_extension_wins() {
        let row = parse_format_row("18  mp4  640x360  30  |  12.01MiB  https  720p").unwrap();
        assert_eq!(row.ext, "mp4");
        assert_eq!(row.quality, "360p");
    }

    #[test]
    fn test_empty_listing() {
        assert!(parse_format_listing("").is_empty());
        assert!(parse_format_listing("ERROR: nothing here\n").is_empty());
    }
}
