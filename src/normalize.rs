use crate::locate::{QUOTED_LITERAL_PATTERN, VAR_PATTERN};
use regex::Regex;

/// Token a variable-bearing quoted literal is collapsed to. The surrounding
/// quote character is preserved, so the locator sees one quoted occurrence.
const NORMALIZED_VAR: &str = "$param";

/// Rewrites every quoted literal that contains a variable reference into one
/// atomic quoted variable span, so that a literal mixing a variable with
/// hardcoded text (e.g. `'${__from:date:YYYY-MM-DD} 00:00:00'`) is aligned as
/// a single opaque value region instead of character by character.
///
/// Quoted literals without a variable are left untouched. The scan is a
/// single forward pass over non-overlapping literals, first-match order,
/// materializing one output string.
///
/// Escaped quotes inside literals are not handled: a doubled quote closes the
/// literal early and the remainder is scanned as fresh input.
///
/// # Examples
///
/// ```
/// use sqlx_template_bind::normalize::normalize_quoted_literals;
///
/// let normalized = normalize_quoted_literals(
///     "WHERE name='Ahmed' AND date='${__from:date:YYYY-MM-DD} 00:00:00'",
/// )?;
/// assert_eq!(normalized, "WHERE name='Ahmed' AND date='$param'");
/// # Ok::<(), sqlx_template_bind::Error>(())
/// ```
pub fn normalize_quoted_literals(template: &str) -> crate::Result<String> {
    let quoted = Regex::new(QUOTED_LITERAL_PATTERN)?;
    let var = Regex::new(VAR_PATTERN)?;

    let mut normalized = String::with_capacity(template.len());
    let mut last = 0;
    for literal in quoted.find_iter(template) {
        if var.is_match(literal.as_str()) {
            let quote = &literal.as_str()[..1];
            normalized.push_str(&template[last..literal.start()]);
            normalized.push_str(quote);
            normalized.push_str(NORMALIZED_VAR);
            normalized.push_str(quote);
            last = literal.end();
        }
    }
    normalized.push_str(&template[last..]);
    Ok(normalized)
}
