//! Quoting for values placed into systemd unit files.
//!
//! Two contexts exist:
//! - command lines (`ExecStart=`), which systemd splits into words, unquotes,
//!   C-unescapes and then expands `$VAR` in;
//! - plain settings (`Description=`, `WorkingDirectory=`, `User=`, ...),
//!   which are taken verbatim apart from `%` specifiers.
//!
//! Both expand `%` specifiers over the whole line first.

use std::fmt::Write;

use crate::error::{ServiceError, ServiceResult};

/// Quotes `arg` as a single `ExecStart=` word.
///
/// The result always parses back to exactly `arg`, whatever it contains.
pub fn escape_arg(arg: &str) -> String {
    let mut out = String::with_capacity(arg.len() + 2);
    out.push('"');
    for c in arg.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '%' => out.push_str("%%"),
            '$' => out.push_str("$$"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_ascii_control() => {
                // Writing into a String cannot fail.
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Escapes a plain setting value.
///
/// `field` names the setting and is only used for the error message. Values
/// that cannot be represented on a single unit-file line are rejected.
pub fn escape_value(field: &str, value: &str) -> ServiceResult<String> {
    if let Some(c) = value.chars().find(|c| c.is_control()) {
        return Err(ServiceError::Render(format!(
            "{} contains control character {:?}",
            field, c
        )));
    }
    // systemd strips surrounding blanks, which would silently change the value.
    if value.starts_with(' ') || value.ends_with(' ') {
        return Err(ServiceError::Render(format!(
            "{} has leading or trailing whitespace",
            field
        )));
    }
    // A trailing backslash continues the setting onto the next line.
    if value.ends_with('\\') {
        return Err(ServiceError::Render(format!("{} ends with a backslash", field)));
    }
    Ok(value.replace('%', "%%"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_word_is_only_quoted() {
        assert_eq!(escape_arg("--verbose"), "\"--verbose\"");
        assert_eq!(escape_arg(""), "\"\"");
    }

    #[test]
    fn quotes_and_backslashes() {
        assert_eq!(escape_arg(r#"say "hi"\now"#), r#""say \"hi\"\\now""#);
    }

    #[test]
    fn specifiers_and_variables() {
        assert_eq!(escape_arg("100%"), "\"100%%\"");
        assert_eq!(escape_arg("$HOME"), "\"$$HOME\"");
    }

    #[test]
    fn control_characters() {
        assert_eq!(escape_arg("a\nb\tc"), "\"a\\nb\\tc\"");
        assert_eq!(escape_arg("\u{1b}[0m"), "\"\\x1b[0m\"");
    }

    #[test]
    fn separator_stays_inside_quotes() {
        assert_eq!(escape_arg(";"), "\";\"");
        assert_eq!(escape_arg("-x"), "\"-x\"");
    }

    #[test]
    fn value_escapes_specifiers() {
        assert_eq!(escape_value("Description", "50% off").unwrap(), "50%% off");
        assert_eq!(escape_value("WorkingDirectory", "/srv/my app").unwrap(), "/srv/my app");
    }

    #[test]
    fn value_rejects_line_breaks() {
        let err = escape_value("Description", "x\nExecStartPre=/bin/evil").unwrap_err();
        assert!(matches!(err, ServiceError::Render(_)));
        assert!(escape_value("User", "root\\").is_err());
    }

    #[test]
    fn value_rejects_surrounding_whitespace() {
        for value in ["/srv/app ", " /srv/app", " "] {
            let err = escape_value("WorkingDirectory", value).unwrap_err();
            assert!(matches!(err, ServiceError::Render(_)), "{:?}", value);
        }
        assert_eq!(escape_value("Description", "").unwrap(), "");
    }
}
