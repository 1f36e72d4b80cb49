//! Markup attribute conventions.

use std::str::FromStr;

use crate::error::BuildError;

/// Parse a boolean attribute.
///
/// Absent, `"false"`, `"0"` and `"off"` are false. Any other present value,
/// including the empty string, is true.
pub fn parse_bool_attr(value: Option<&str>) -> bool {
    match value {
        None => false,
        Some(raw) => {
            let raw = raw.trim();
            !(raw.eq_ignore_ascii_case("false") || raw == "0" || raw.eq_ignore_ascii_case("off"))
        }
    }
}

/// Parse a numeric attribute. Absent yields `Ok(None)`.
pub fn parse_number_attr<T: FromStr>(name: &str, value: Option<&str>) -> Result<Option<T>, BuildError> {
    match value {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| BuildError::InvalidAttribute {
                name: name.to_string(),
                value: raw.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_attr_convention() {
        assert!(!parse_bool_attr(None));
        assert!(!parse_bool_attr(Some("false")));
        assert!(!parse_bool_attr(Some("FALSE")));
        assert!(!parse_bool_attr(Some("0")));
        assert!(!parse_bool_attr(Some("off")));
        assert!(parse_bool_attr(Some("")));
        assert!(parse_bool_attr(Some("true")));
        assert!(parse_bool_attr(Some("disabled")));
        assert!(parse_bool_attr(Some("1")));
    }

    #[test]
    fn test_number_attr() {
        assert_eq!(parse_number_attr::<usize>("min", Some(" 3 ")).unwrap(), Some(3));
        assert_eq!(parse_number_attr::<usize>("min", None).unwrap(), None);
        assert!(parse_number_attr::<usize>("min", Some("three")).is_err());
    }
}
