//! Struct tag grammar: `key:"value"` pairs separated by spaces.
//!
//! Lookup follows the conventions of Go's `reflect.StructTag`: scanning stops
//! at the first malformed pair, and anything after it is invisible. Nothing
//! here normalizes or rewrites existing pairs.

/// Delimiter of the literal form this tool writes.
pub const RAW_DELIMITER: char = '`';

/// A tag string without its surrounding literal delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructTag<'a>(pub &'a str);

impl<'a> StructTag<'a> {
    /// Iterate over well-formed `(key, quoted_value)` pairs in order.
    ///
    /// The quoted value still carries its quotes and escapes.
    #[must_use]
    pub fn pairs(self) -> Pairs<'a> {
        Pairs { rest: self.0 }
    }

    /// Value of `key`, unquoted. `None` if absent or if the tag is malformed before it.
    #[must_use]
    pub fn lookup(self, key: &str) -> Option<String> {
        for (name, quoted) in self.pairs() {
            if name == key {
                return unquote(quoted);
            }
        }
        None
    }

    /// Whether the tag holds nothing but whitespace.
    #[must_use]
    pub fn is_blank(self) -> bool {
        self.0.trim().is_empty()
    }
}

/// Iterator returned by [`StructTag::pairs`].
#[derive(Debug, Clone)]
pub struct Pairs<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Pairs<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.rest.trim_start_matches(' ');
        if tag.is_empty() {
            self.rest = tag;
            return None;
        }

        let bytes = tag.as_bytes();
        let key_len = bytes.iter().take_while(|&&b| is_key_byte(b)).count();
        if key_len == 0
            || key_len + 1 >= bytes.len()
            || bytes[key_len] != b':'
            || bytes[key_len + 1] != b'"'
        {
            self.rest = "";
            return None;
        }
        let key = &tag[..key_len];
        let value_part = &tag[key_len + 1..];

        // Scan the quoted value, skipping escaped characters
        let vbytes = value_part.as_bytes();
        let mut i = 1;
        while i < vbytes.len() && vbytes[i] != b'"' {
            if vbytes[i] == b'\\' {
                i += 1;
            }
            i += 1;
        }
        if i >= vbytes.len() {
            self.rest = "";
            return None;
        }

        self.rest = &value_part[i + 1..];
        Some((key, &value_part[..=i]))
    }
}

/// Bytes allowed in a tag key: printable, not space, colon, or quote.
fn is_key_byte(b: u8) -> bool {
    b > b' ' && b != b':' && b != b'"' && b != 0x7f
}

/// Whether `name` can be written as a tag key inside a raw string literal.
#[must_use]
pub fn is_valid_key(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| is_key_byte(b) && b != b'`')
}

/// The two Go string literal forms a tag can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagLiteral {
    /// `` `json:"name"` ``
    Raw,
    /// `"json:\"name\""`
    Interpreted,
}

impl TagLiteral {
    /// Split a literal into its form and its tag content.
    ///
    /// Interpreted literals are unescaped; if that fails the inner text is
    /// used as-is so lookup degrades instead of erroring.
    #[must_use]
    pub fn split(literal: &str) -> Option<(Self, String)> {
        if literal.len() < 2 {
            return None;
        }
        let inner = &literal[1..literal.len() - 1];
        if literal.starts_with(RAW_DELIMITER) && literal.ends_with(RAW_DELIMITER) {
            Some((Self::Raw, inner.replace('\r', "")))
        } else if literal.starts_with('"') && literal.ends_with('"') {
            let content = unquote(literal).unwrap_or_else(|| inner.to_owned());
            Some((Self::Interpreted, content))
        } else {
            None
        }
    }

    /// Append `entry` to an existing non-empty literal, separated by one space.
    #[must_use]
    pub fn append(self, literal: &str, entry: &str) -> String {
        let body = &literal[..literal.len() - 1];
        match self {
            Self::Raw => format!("{body} {entry}{RAW_DELIMITER}"),
            Self::Interpreted => format!("{body} {}\"", escape_interpreted(entry)),
        }
    }
}

/// Render a fresh raw literal holding exactly one pair.
#[must_use]
pub fn raw_literal(entry: &str) -> String {
    format!("{RAW_DELIMITER}{entry}{RAW_DELIMITER}")
}

fn escape_interpreted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// Unquote a double-quoted Go string literal.
///
/// Supports the escapes Go accepts in interpreted strings; returns `None` on
/// anything malformed.
#[must_use]
pub fn unquote(quoted: &str) -> Option<String> {
    let inner = quoted.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' | '\n' => return None,
            '\\' => {
                let escaped = match chars.next()? {
                    'a' => '\u{07}',
                    'b' => '\u{08}',
                    'f' => '\u{0c}',
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    'v' => '\u{0b}',
                    '\\' => '\\',
                    '"' => '"',
                    'x' => hex_escape(&mut chars, 2)?,
                    'u' => hex_escape(&mut chars, 4)?,
                    'U' => hex_escape(&mut chars, 8)?,
                    d @ '0'..='7' => {
                        let mut value = d.to_digit(8)?;
                        for _ in 0..2 {
                            value = value * 8 + chars.next()?.to_digit(8)?;
                        }
                        char::from_u32(value).filter(|_| value <= 0xff)?
                    }
                    _ => return None,
                };
                out.push(escaped);
            }
            _ => out.push(c),
        }
    }
    Some(out)
}

fn hex_escape(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<char> {
    let mut value = 0u32;
    for _ in 0..digits {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    char::from_u32(value)
}
