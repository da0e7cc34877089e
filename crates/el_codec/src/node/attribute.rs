//! Lenient attribute readers.
//!
//! A missing attribute yields the caller's default silently. A present but
//! unparsable attribute also yields the default, logged at `debug`, so one
//! corrupt value does not abort loading the rest of a document.

use alloc::string::String;
use core::str::FromStr;

use super::Node;

/// Parses `text`, falling back to `default` when it is not a valid `T`.
///
/// Surrounding whitespace is ignored.
///
/// # Examples
///
/// ```
/// use el_codec::node::parse_or;
///
/// assert_eq!(parse_or(" 12 ", 0_usize), 12);
/// assert_eq!(parse_or("twelve", 0_usize), 0);
/// ```
pub fn parse_or<T: FromStr>(text: &str, default: T) -> T {
    match text.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            log::debug!(
                "`{text}` is not a valid `{}`, using the default",
                core::any::type_name::<T>()
            );
            default
        }
    }
}

impl Node {
    /// The attribute value, or `default` when absent.
    pub fn attribute_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.attribute(key).unwrap_or(default)
    }

    /// Owned form of [`attribute_or`](Self::attribute_or).
    pub fn attribute_string(&self, key: &str, default: &str) -> String {
        String::from(self.attribute_or(key, default))
    }

    /// The attribute parsed as `T`, or `default` when absent or unparsable.
    ///
    /// # Examples
    ///
    /// ```
    /// use el_codec::node::Node;
    ///
    /// let node = Node::new("Font").with_attribute("Size", "12.5").with_attribute("Style", "x");
    ///
    /// assert_eq!(node.attribute_parsed("Size", 10.0_f32), 12.5);
    /// assert_eq!(node.attribute_parsed("Style", 0_i32), 0);
    /// assert_eq!(node.attribute_parsed("Weight", 400_i32), 400);
    /// ```
    pub fn attribute_parsed<T: FromStr>(&self, key: &str, default: T) -> T {
        match self.attribute(key) {
            Some(text) => parse_or(text, default),
            None => default,
        }
    }

    /// The attribute read as a boolean.
    ///
    /// Accepts `true`/`false` in any letter case and the integers `1`/`0`.
    pub fn attribute_bool(&self, key: &str, default: bool) -> bool {
        let Some(text) = self.attribute(key) else {
            return default;
        };
        let text = text.trim();
        if text.eq_ignore_ascii_case("true") {
            true
        } else if text.eq_ignore_ascii_case("false") {
            false
        } else {
            match text.parse::<i64>() {
                Ok(number) => number == 1,
                Err(_) => {
                    log::debug!("`{text}` of `{key}` is not a boolean, using the default");
                    default
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::node::Node;

    #[test]
    fn bool_accepts_words_and_numbers() {
        let node = Node::new("Flags")
            .with_attribute("A", "TRUE")
            .with_attribute("B", "0")
            .with_attribute("C", "1")
            .with_attribute("D", "maybe");

        assert!(node.attribute_bool("A", false));
        assert!(!node.attribute_bool("B", true));
        assert!(node.attribute_bool("C", false));
        assert!(node.attribute_bool("D", true));
        assert!(!node.attribute_bool("E", false));
    }

    #[test]
    fn string_defaults() {
        let node = Node::new("Font").with_attribute("Family", "Serif");
        assert_eq!(node.attribute_or("Family", "Sans"), "Serif");
        assert_eq!(node.attribute_string("Missing", "Sans"), "Sans");
    }
}
