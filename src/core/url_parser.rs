//! Instagram URL surgery: cleaning, shortcode extraction and the embed
//! rewrite used by the scrape strategies.

/// Strips the query string and guarantees a trailing slash, the canonical
/// form the scrape strategies operate on.
pub fn clean_instagram_url(url: &str) -> String {
    let mut clean = url.split('?').next().unwrap_or(url).to_string();
    if !clean.ends_with('/') {
        clean.push('/');
    }
    clean
}

/// Shortcode embedded in `/reel/<id>` or `/p/<id>` paths, reel taking
/// priority. Expects an already cleaned URL.
pub fn instagram_shortcode(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segments: Vec<&str> = parsed.path().split('/').filter(|s| !s.is_empty()).collect();

    for marker in ["reel", "p"] {
        if let Some(pos) = segments.iter().position(|s| *s == marker) {
            if let Some(id) = segments.get(pos + 1) {
                return Some((*id).to_string());
            }
        }
    }

    None
}

/// Rewrites a cleaned post URL to its `/embed/` variant, converting reels
/// to the plain post form on the way.
pub fn instagram_embed_url(clean_url: &str) -> String {
    let rewritten = clean_url.replace("/reel/", "/p/");
    format!("{}/embed/", rewritten.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_strips_query_and_adds_slash() {
        assert_eq!(
            clean_instagram_url("https://www.instagram.com/reel/Cxyz?igsh=token"),
            "https://www.instagram.com/reel/Cxyz/"
        );
        assert_eq!(
            clean_instagram_url("https://www.instagram.com/p/Babc/"),
            "https://www.instagram.com/p/Babc/"
        );
    }

    #[test]
    fn shortcode_from_reel_path() {
        assert_eq!(
            instagram_shortcode("https://www.instagram.com/reel/Cxyz123/"),
            Some("Cxyz123".to_string())
        );
    }

    #[test]
    fn shortcode_from_post_path() {
        assert_eq!(
            instagram_shortcode("https://www.instagram.com/p/Babc456/"),
            Some("Babc456".to_string())
        );
    }

    #[test]
    fn shortcode_from_nested_reel_path() {
        assert_eq!(
            instagram_shortcode("https://www.instagram.com/someuser/reel/Cnest/"),
            Some("Cnest".to_string())
        );
    }

    #[test]
    fn no_shortcode_without_post_markers() {
        assert_eq!(instagram_shortcode("https://www.instagram.com/someuser/"), None);
        assert_eq!(instagram_shortcode("not a url"), None);
    }

    #[test]
    fn embed_rewrite_converts_reel_to_post() {
        assert_eq!(
            instagram_embed_url("https://www.instagram.com/reel/Cxyz/"),
            "https://www.instagram.com/p/Cxyz/embed/"
        );
        assert_eq!(
            instagram_embed_url("https://www.instagram.com/p/Babc/"),
            "https://www.instagram.com/p/Babc/embed/"
        );
    }
}
