//! Template formatting: embed an id in surrounding text with a single
//! `%`-placeholder.
//!
//! | Placeholder | Rendering                    |
//! |-------------|------------------------------|
//! | `%S`        | canonical, uppercase         |
//! | `%s`        | canonical, lowercase         |
//! | `%X`        | base 16, uppercase           |
//! | `%x`        | base 16, lowercase           |
//! | `%d`        | base 10                      |
//! | `%z`        | base 62                      |

use alloc::{borrow::ToOwned, format, string::String};

use crate::{Error, Result, SnowflakeId};

/// A parsed template: literal head, placeholder, literal tail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Template<'a> {
    head: &'a str,
    placeholder: Placeholder,
    tail: &'a str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Placeholder {
    CanonicalUpper,
    CanonicalLower,
    HexUpper,
    HexLower,
    Decimal,
    Base62,
}

impl<'a> Template<'a> {
    fn parse(template: &'a str) -> Result<Self> {
        let invalid = || Error::InvalidTemplate {
            template: template.to_owned(),
        };
        let i = template.find('%').ok_or_else(invalid)?;
        let mut rest = template[i + 1..].chars();
        let placeholder = match rest.next().ok_or_else(invalid)? {
            'S' => Placeholder::CanonicalUpper,
            's' => Placeholder::CanonicalLower,
            'X' => Placeholder::HexUpper,
            'x' => Placeholder::HexLower,
            'd' => Placeholder::Decimal,
            'z' => Placeholder::Base62,
            _ => return Err(invalid()),
        };
        Ok(Self {
            head: &template[..i],
            placeholder,
            tail: rest.as_str(),
        })
    }
}

impl SnowflakeId {
    /// Renders the id into `template`, replacing its `%`-placeholder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTemplate`] if the template has no `%`, ends
    /// with `%`, or uses an unknown placeholder.
    ///
    /// # Example
    /// ```
    /// use flakeid::SnowflakeId;
    ///
    /// let id = SnowflakeId::from_raw(255);
    /// assert_eq!(id.format("order/%d").unwrap(), "order/00000000000000000255");
    /// assert_eq!(id.format("%x.json").unwrap(), "00000000000000ff.json");
    /// ```
    pub fn format(&self, template: &str) -> Result<String> {
        let Template {
            head,
            placeholder,
            tail,
        } = Template::parse(template)?;
        let body = match placeholder {
            Placeholder::CanonicalUpper => String::from(self.encode()),
            Placeholder::CanonicalLower => self.to_lower(),
            Placeholder::HexUpper => self.encode_base(16)?,
            Placeholder::HexLower => self.encode_base(16)?.to_ascii_lowercase(),
            Placeholder::Decimal => self.encode_base(10)?,
            Placeholder::Base62 => self.encode_base(62)?,
        };
        Ok(format!("{head}{body}{tail}"))
    }

    /// Parses an id out of text produced by [`SnowflakeId::format`].
    ///
    /// Canonical and hexadecimal placeholders are matched case-insensitively.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidTemplate`] for a malformed template
    /// - [`Error::TemplateMismatch`] if `formatted` does not start with the
    ///   template's head and end with its tail
    /// - any decode error for the embedded id
    pub fn unformat(formatted: &str, template: &str) -> Result<Self> {
        let Template {
            head,
            placeholder,
            tail,
        } = Template::parse(template)?;
        let body = formatted
            .strip_prefix(head)
            .and_then(|rest| rest.strip_suffix(tail))
            .ok_or_else(|| Error::TemplateMismatch {
                input: formatted.to_owned(),
            })?;
        match placeholder {
            Placeholder::CanonicalUpper | Placeholder::CanonicalLower => Self::from_string(body),
            Placeholder::HexUpper | Placeholder::HexLower => {
                Self::decode_base(&body.to_ascii_uppercase(), 16)
            }
            Placeholder::Decimal => Self::decode_base(body, 10),
            Placeholder::Base62 => Self::decode_base(body, 62),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: SnowflakeId = SnowflakeId::from_raw(0x0123_4567_89AB_CDEF);

    #[test]
    fn every_placeholder_round_trips() {
        for template in [
            "%S", "%s", "%X", "%x", "%d", "%z", "id:%S", "%s.txt", "a/%X/b", "<%z>",
        ] {
            let formatted = ID.format(template).unwrap();
            assert_eq!(SnowflakeId::unformat(&formatted, template), Ok(ID), "{template}");
        }
    }

    #[test]
    fn renders_expected_bodies() {
        assert_eq!(ID.format("%X").unwrap(), "0123456789ABCDEF");
        assert_eq!(ID.format("%x").unwrap(), "0123456789abcdef");
        assert_eq!(ID.format("%S").unwrap(), ID.to_string());
        assert_eq!(ID.format("%s").unwrap(), ID.to_lower());
        assert_eq!(ID.format("%d").unwrap(), "00081985529216486895");
    }

    #[test]
    fn hex_and_canonical_are_case_insensitive() {
        assert_eq!(SnowflakeId::unformat("0123456789abcdef", "%X"), Ok(ID));
        assert_eq!(SnowflakeId::unformat("0123456789ABCDEF", "%x"), Ok(ID));
        assert_eq!(SnowflakeId::unformat(&ID.to_lower(), "%S"), Ok(ID));
    }

    #[test]
    fn rejects_bad_templates() {
        for template in ["", "no placeholder", "trailing %", "%q"] {
            assert_eq!(
                ID.format(template),
                Err(Error::InvalidTemplate {
                    template: template.to_owned()
                })
            );
        }
    }

    #[test]
    fn rejects_mismatched_input() {
        assert_eq!(
            SnowflakeId::unformat("xx0123456789ABCDEF", "id:%X"),
            Err(Error::TemplateMismatch {
                input: "xx0123456789ABCDEF".to_owned()
            })
        );
        assert_eq!(
            SnowflakeId::unformat("id:0123456789ABCDEF", "id:%X.json"),
            Err(Error::TemplateMismatch {
                input: "id:0123456789ABCDEF".to_owned()
            })
        );
    }
}
