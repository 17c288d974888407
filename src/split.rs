/// Splits a recovered value region on commas that are not enclosed in a
/// matching pair of single or double quotes, then unquotes each fragment.
///
/// Whitespace adjacent to a separator comma is consumed; whitespace inside
/// quotes or at the ends of the region is preserved. Empty segments survive:
/// an empty region yields exactly one empty-string value, never zero values.
///
/// # Examples
///
/// ```
/// use sqlx_template_bind::split::split_multi_value;
///
/// let values = split_multi_value("'a','b,c','d'");
/// assert_eq!(values, ["a", "b,c", "d"]);
/// ```
pub fn split_multi_value(region: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut after_separator = false;

    for c in region.chars() {
        if after_separator {
            if c == ' ' || c == '\t' {
                continue;
            }
            after_separator = false;
        }
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
                current.push(c);
            }
            None => match c {
                '\'' | '"' => {
                    quote = Some(c);
                    current.push(c);
                }
                ',' => {
                    current.truncate(current.trim_end_matches([' ', '\t']).len());
                    values.push(std::mem::take(&mut current));
                    after_separator = true;
                }
                _ => current.push(c),
            },
        }
    }
    values.push(current);

    values.iter().map(|v| unquote(v).to_owned()).collect()
}

/// Strips exactly one pair of matching surrounding quote characters, if
/// present; any other string is returned unchanged.
pub fn unquote(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2
        && (bytes[0] == b'\'' || bytes[0] == b'"')
        && bytes[bytes.len() - 1] == bytes[0]
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}
