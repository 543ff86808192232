//! URL extraction and embed assembly.
//!
//! URLs found in the cast text are pulled out into embeds and removed from the
//! text that is actually posted. A media embed, when present, always takes slot 0.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::types::{Embed, MAX_EMBEDS};

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s]+").expect("URL pattern compiles"));

/// Text with URLs removed, plus the URLs in order of first appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedEmbeds {
    pub display_text: String,
    pub urls: Vec<String>,
}

/// Find every bare `http(s)://` URL in `text` and strip it from the display text.
///
/// Whitespace around a removed URL collapses to one separator: a newline if the
/// gap contained one, otherwise a space. Text without URLs is returned as is.
pub fn extract_embeds(text: &str) -> ExtractedEmbeds {
    let mut urls: Vec<String> = Vec::new();
    let mut segments: Vec<&str> = Vec::new();
    let mut cursor = 0;

    for m in URL_PATTERN.find_iter(text) {
        if !urls.iter().any(|u| u == m.as_str()) {
            urls.push(m.as_str().to_string());
        }
        segments.push(&text[cursor..m.start()]);
        cursor = m.end();
    }

    if urls.is_empty() {
        return ExtractedEmbeds {
            display_text: text.to_string(),
            urls,
        };
    }
    segments.push(&text[cursor..]);

    let mut display = segments[0].to_string();
    for segment in &segments[1..] {
        display = join_gap(&display, segment);
    }

    ExtractedEmbeds {
        display_text: display.trim().to_string(),
        urls,
    }
}

fn join_gap(left: &str, right: &str) -> String {
    let kept_left = left.trim_end();
    let kept_right = right.trim_start();

    // Adjacent URLs: keep the whitespace so the next gap still sees it.
    if kept_right.is_empty() {
        return format!("{left}{right}");
    }
    if kept_left.is_empty() {
        return kept_right.to_string();
    }

    let gap_has_newline = left[kept_left.len()..].contains('\n')
        || right[..right.len() - kept_right.len()].contains('\n');
    let separator = if gap_has_newline { "\n" } else { " " };
    format!("{kept_left}{separator}{kept_right}")
}

/// Build the final embed list: media first, then URLs until the cap is reached.
///
/// URLs beyond the cap are dropped with a diagnostic.
pub fn assemble_embeds(media_url: Option<String>, urls: &[String]) -> Vec<Embed> {
    let mut embeds: Vec<Embed> = media_url.into_iter().map(Embed::new).collect();
    let room = MAX_EMBEDS.saturating_sub(embeds.len());

    embeds.extend(urls.iter().take(room).map(|u| Embed::new(u.as_str())));

    if urls.len() > room {
        warn!(
            dropped = urls.len() - room,
            kept = embeds.len(),
            max = MAX_EMBEDS,
            "embed cap reached, extra URLs dropped"
        );
    }
    embeds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_urls_is_untouched() {
        let out = extract_embeds("  just words  ");
        assert_eq!(out.display_text, "  just words  ");
        assert!(out.urls.is_empty());
    }

    #[test]
    fn trailing_url_is_removed() {
        let out = extract_embeds("check this https://x.example");
        assert_eq!(out.display_text, "check this");
        assert_eq!(out.urls, vec!["https://x.example"]);
    }

    #[test]
    fn urls_in_the_middle_collapse_to_one_space() {
        let out = extract_embeds("read http://a.example/p?q=1 and https://b.example now");
        assert_eq!(out.display_text, "read and now");
        assert_eq!(out.urls, vec!["http://a.example/p?q=1", "https://b.example"]);
    }

    #[test]
    fn newline_gap_is_preserved() {
        let out = extract_embeds("headline\nhttps://a.example\nmore");
        assert_eq!(out.display_text, "headline\nmore");
    }

    #[test]
    fn url_only_text_becomes_empty() {
        let out = extract_embeds("https://a.example https://b.example");
        assert_eq!(out.display_text, "");
        assert_eq!(out.urls.len(), 2);
    }

    #[test]
    fn repeated_url_is_listed_once() {
        let out = extract_embeds("https://a.example x https://a.example");
        assert_eq!(out.urls, vec!["https://a.example"]);
        assert_eq!(out.display_text, "x");
    }

    #[test]
    fn scheme_is_required() {
        let out = extract_embeds("see www.example.com or ftp://files.example");
        assert!(out.urls.is_empty());
    }

    #[test]
    fn assemble_puts_media_first() {
        let urls = vec!["https://u.example".to_string()];
        let embeds = assemble_embeds(Some("https://i.imgur.com/m.jpg".into()), &urls);
        assert_eq!(
            embeds,
            vec![Embed::new("https://i.imgur.com/m.jpg"), Embed::new("https://u.example")]
        );
    }

    #[test]
    fn assemble_caps_at_two() {
        let urls: Vec<String> = (1..=4).map(|i| format!("https://u{i}.example")).collect();
        let embeds = assemble_embeds(None, &urls);
        assert_eq!(embeds, vec![Embed::new("https://u1.example"), Embed::new("https://u2.example")]);

        let with_media = assemble_embeds(Some("https://m.example".into()), &urls);
        assert_eq!(with_media.len(), 2);
        assert_eq!(with_media[1].url, "https://u1.example");
    }

    #[test]
    fn assemble_empty() {
        assert!(assemble_embeds(None, &[]).is_empty());
    }
}
