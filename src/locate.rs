use regex::Regex;

/// Matches a bare dashboard variable: `$ident` or the braced form `${...}`
/// (non-greedy, up to the first `}`).
pub(crate) const VAR_PATTERN: &str = r"\$\w+|\$\{.*?\}";

/// Matches one variable occurrence in a normalized template: a variable
/// optionally wrapped in exactly one pair of matching quotes with no other
/// content inside them. Quoted alternatives come first so that at a quote
/// character the whole quoted span wins over the inner bare variable.
pub(crate) const OCCURRENCE_PATTERN: &str =
    r#"'\$\w+'|'\$\{.*?\}'|"\$\w+"|"\$\{.*?\}"|\$\w+|\$\{.*?\}"#;

/// Matches a single- or double-quoted literal with non-empty content.
/// Non-greedy, so the literal ends at the first closing quote.
pub(crate) const QUOTED_LITERAL_PATTERN: &str = r#""(.+?)"|'(.+?)'"#;

/// How a variable occurrence is wrapped in the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quoting {
    /// Bare variable, e.g. `$host`
    None,
    /// Wrapped in single quotes, e.g. `'$host'`
    Single,
    /// Wrapped in double quotes, e.g. `"$host"`
    Double,
    /// Braced form, e.g. `${__from:date:YYYY-MM-DD}`
    Braced,
}

/// One variable occurrence found in a normalized template.
///
/// Offsets are byte positions into the normalized template string the
/// occurrence was located in; `text` is the matched token including any
/// surrounding quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableOccurrence {
    text: String,
    start: usize,
    quoting: Quoting,
}

impl VariableOccurrence {
    /// The matched token exactly as it appears in the template,
    /// quotes included for the quoted forms.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte offset of the first character of the token.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset one past the last character of the token.
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    /// The quoting kind of this occurrence.
    pub fn quoting(&self) -> Quoting {
        self.quoting
    }
}

/// Scans a normalized template and returns every variable occurrence in
/// left-to-right order. Matches are non-overlapping; at any position the
/// quoted forms take precedence over the bare forms.
///
/// # Examples
///
/// ```
/// use sqlx_template_bind::locate::locate_variables;
///
/// let occurrences = locate_variables("SELECT * FROM t WHERE id=$id AND host='$host'")?;
/// assert_eq!(occurrences.len(), 2);
/// assert_eq!(occurrences[0].text(), "$id");
/// assert_eq!(occurrences[1].text(), "'$host'");
/// # Ok::<(), sqlx_template_bind::Error>(())
/// ```
pub fn locate_variables(template: &str) -> crate::Result<Vec<VariableOccurrence>> {
    let occurrences = Regex::new(OCCURRENCE_PATTERN)?
        .find_iter(template)
        .map(|m| VariableOccurrence {
            text: m.as_str().to_owned(),
            start: m.start(),
            quoting: quoting_of(m.as_str()),
        })
        .collect();
    Ok(occurrences)
}

fn quoting_of(token: &str) -> Quoting {
    if token.starts_with('\'') {
        Quoting::Single
    } else if token.starts_with('"') {
        Quoting::Double
    } else if token.starts_with("${") {
        Quoting::Braced
    } else {
        Quoting::None
    }
}
