//! Live-preview document assembly.
//!
//! The converter links its stylesheet with a relative `<link>`, which does not
//! resolve when the markup is served from another path. The preview therefore
//! inlines the stylesheet into the document head.

const HEAD_CLOSE: &str = "</head>";

/// Build the preview document for `markup` styled by `stylesheet`.
///
/// * empty stylesheet → `markup` unchanged
/// * otherwise `<style>…</style>` is inserted before every `</head>`
/// * markup without a `</head>` gets the style block prepended
pub fn build_preview(markup: &str, stylesheet: &str) -> String {
    if stylesheet.is_empty() {
        return markup.to_string();
    }
    let style_block = format!("<style>{stylesheet}</style>");
    if markup.contains(HEAD_CLOSE) {
        markup.replace(HEAD_CLOSE, &format!("{style_block}{HEAD_CLOSE}"))
    } else {
        format!("{style_block}{markup}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn injects_before_head_close() {
        let html = "<html><head><title>t</title></head><body></body></html>";
        let out = build_preview(html, "body{margin:0}");
        assert_eq!(
            out,
            "<html><head><title>t</title><style>body{margin:0}</style></head><body></body></html>"
        );
    }

    #[test]
    fn empty_stylesheet_leaves_markup_unmodified() {
        let html = "<html><head></head><body><div></div></body></html>";
        assert_eq!(build_preview(html, ""), html);
    }

    #[test]
    fn headless_markup_gets_style_prepended() {
        assert_eq!(
            build_preview("<div>x</div>", ".a{}"),
            "<style>.a{}</style><div>x</div>"
        );
    }

    #[test]
    fn head_close_is_case_sensitive() {
        let out = build_preview("<HEAD></HEAD>", "p{}");
        assert!(out.starts_with("<style>p{}</style>"));
    }
}
