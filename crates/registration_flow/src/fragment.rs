//! Signup-token parsing from the page URL fragment
//!
//! Confirmation links land the user on the site with a fragment of the
//! form `#access_token=...&type=signup`. The token must be taken out of
//! the visible address immediately so it cannot leak through copy/share;
//! callers replace the address with `stripped_url` (replace, not
//! navigate).

use url::Url;

/// A signup access token lifted out of a page URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupToken {
    pub access_token: String,
    /// The same URL with the fragment removed; path and query are kept.
    pub stripped_url: String,
}

/// Extract a signup token from `page_url`, if one is present.
///
/// Only fragments that carry both an `access_token` and `type=signup`
/// qualify; recovery links and unrelated fragments are left alone.
pub fn parse_signup_fragment(page_url: &str) -> Option<SignupToken> {
    let mut url = Url::parse(page_url).ok()?;
    let fragment = url.fragment()?.to_string();

    let mut access_token = None;
    let mut kind = None;
    for (key, value) in url::form_urlencoded::parse(fragment.as_bytes()) {
        match key.as_ref() {
            "access_token" => access_token = Some(value.into_owned()),
            "type" => kind = Some(value.into_owned()),
            _ => {}
        }
    }

    let access_token = access_token.filter(|token| !token.is_empty())?;
    if kind.as_deref() != Some("signup") {
        return None;
    }

    url.set_fragment(None);
    Some(SignupToken {
        access_token,
        stripped_url: url.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_signup_fragment() {
        let token =
            parse_signup_fragment("https://example.com/community#access_token=abc123&type=signup")
                .unwrap();
        assert_eq!(token.access_token, "abc123");
        assert_eq!(token.stripped_url, "https://example.com/community");
    }

    #[test]
    fn test_stripping_preserves_path_and_query() {
        let token = parse_signup_fragment(
            "https://example.com/community?tab=latest#access_token=abc&type=signup",
        )
        .unwrap();
        assert_eq!(token.stripped_url, "https://example.com/community?tab=latest");
    }

    #[test]
    fn test_ignores_non_signup_tokens() {
        assert!(parse_signup_fragment(
            "https://example.com/#access_token=abc&type=recovery"
        )
        .is_none());
        assert!(parse_signup_fragment("https://example.com/#type=signup").is_none());
        assert!(parse_signup_fragment("https://example.com/#section-about").is_none());
    }

    #[test]
    fn test_ignores_missing_fragment_and_bad_urls() {
        assert!(parse_signup_fragment("https://example.com/community").is_none());
        assert!(parse_signup_fragment("not a url").is_none());
    }
}
