use crate::locate::{QUOTED_LITERAL_PATTERN, VAR_PATTERN};
use regex::Regex;

/// Returns the variable tokens of a template, as written, in appearance
/// order. Purely informational bookkeeping over the original template; the
/// alignment pass never consults this.
///
/// Quoting is honored: surrounding quote characters are included only when a
/// variable occupies an entire quoted literal by itself. A variable inside a
/// composite literal (mixed with hardcoded text) is reported without the
/// literal's quotes.
///
/// # Examples
///
/// ```
/// use sqlx_template_bind::names::extract_variable_names;
///
/// let names = extract_variable_names(
///     "WHERE date='${__from:date:YYYY-MM-DD} 00:00:00' AND host='$host' AND id=$id",
/// )?;
/// assert_eq!(names, ["${__from:date:YYYY-MM-DD}", "'$host'", "$id"]);
/// # Ok::<(), sqlx_template_bind::Error>(())
/// ```
pub fn extract_variable_names(template: &str) -> crate::Result<Vec<String>> {
    let quoted = Regex::new(QUOTED_LITERAL_PATTERN)?;
    let var = Regex::new(VAR_PATTERN)?;

    let mut names = Vec::new();
    let mut last = 0;
    for literal in quoted.find_iter(template) {
        for m in var.find_iter(&template[last..literal.start()]) {
            names.push(m.as_str().to_owned());
        }
        let inner = &literal.as_str()[1..literal.as_str().len() - 1];
        match var.find(inner) {
            Some(m) if m.start() == 0 && m.end() == inner.len() => {
                // The literal is nothing but the variable; keep the quotes.
                names.push(literal.as_str().to_owned());
            }
            Some(_) => {
                for m in var.find_iter(inner) {
                    names.push(m.as_str().to_owned());
                }
            }
            None => {}
        }
        last = literal.end();
    }
    for m in var.find_iter(&template[last..]) {
        names.push(m.as_str().to_owned());
    }
    Ok(names)
}
