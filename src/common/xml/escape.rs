use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

// Static initialization: automaton is built only once, thread-safe
static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'"])
        .expect("Failed to build XML escaper")
});

/// Escape the five XML special characters for text and attribute content.
///
/// # Examples
///
/// ```
/// use deckgen::common::xml::escape_xml;
/// assert_eq!(escape_xml("Blazor & WebAssembly"), "Blazor &amp; WebAssembly");
/// assert_eq!(escape_xml("<T>\"x\"</T>"), "&lt;T&gt;&quot;x&quot;&lt;/T&gt;");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> String {
    XML_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
}

/// Text of an entity or character reference reported by the XML reader
/// (`amp`, `#233`, `#x1F3AE`), or `None` when it is not one the reader can
/// resolve on its own.
pub fn resolve_reference(name: &str) -> Option<String> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }
    quick_xml::escape::resolve_predefined_entity(name).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_apostrophe() {
        assert_eq!(escape_xml("l'architettura"), "l&apos;architettura");
    }

    #[test]
    fn test_resolve_reference() {
        assert_eq!(resolve_reference("amp").as_deref(), Some("&"));
        assert_eq!(resolve_reference("apos").as_deref(), Some("'"));
        assert_eq!(resolve_reference("#232").as_deref(), Some("è"));
        assert_eq!(resolve_reference("#x2192").as_deref(), Some("→"));
        assert_eq!(resolve_reference("nbsp"), None);
        assert_eq!(resolve_reference("#xD800"), None);
    }
}
