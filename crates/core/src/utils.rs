//! Small helpers shared by the output converters.

use std::borrow::Cow;

use crate::model::Coords;

/// Encodes a string for HTML by escaping special characters.
///
/// Returns `Cow::Borrowed` if no escaping needed (zero allocation),
/// or `Cow::Owned` with escaped string (single allocation).
pub fn enc(x: &str) -> Cow<'_, str> {
    html_escape::encode_quoted_attribute(x)
}

/// Make a decoded string safe for markup output by removing NUL characters.
pub fn make_compat_str(s: &str) -> Cow<'_, str> {
    if s.contains('\0') {
        Cow::Owned(s.chars().filter(|&c| c != '\0').collect())
    } else {
        Cow::Borrowed(s)
    }
}

/// CSS geometry for an absolutely positioned element.
pub fn css_box(position: Coords, size: Coords, scale: f64) -> String {
    format!(
        "left:{}px; top:{}px; width:{}px; height:{}px;",
        (f64::from(position.x) * scale) as i64,
        (f64::from(position.y) * scale) as i64,
        (f64::from(size.x) * scale) as i64,
        (f64::from(size.y) * scale) as i64
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enc() {
        assert_eq!(enc("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
        assert!(matches!(enc("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_make_compat_str() {
        assert_eq!(make_compat_str("a\0b"), "ab");
        assert!(matches!(make_compat_str("ab"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_css_box_scale() {
        let css = css_box(Coords::new(10, 20), Coords::new(30, 40), 2.0);
        assert_eq!(css, "left:20px; top:40px; width:60px; height:80px;");
    }
}
