//! Identifier quoting.

use std::borrow::Cow;

/// Wrap `ident` in double quotes, doubling any embedded quote.
pub fn quote_identifier(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote `ident` only when the target database treats identifiers as
/// case-sensitive.
pub fn maybe_quote(ident: &str, case_sensitive: bool) -> Cow<'_, str> {
    if case_sensitive {
        Cow::Owned(quote_identifier(ident))
    } else {
        Cow::Borrowed(ident)
    }
}
