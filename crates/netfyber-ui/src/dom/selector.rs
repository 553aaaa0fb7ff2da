//! The small CSS selector subset understood by [`super::MemoryDom`].
//!
//! Supported: comma-separated lists of compound selectors built from an
//! optional tag name, `#id`, `.class`, `[attr]`, `[attr="v"]` and
//! `[attr^="v"]`. Combinators (descendant, child, sibling) are not
//! supported; callers scope with [`super::Dom::query_within`] instead.

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AttrMatch {
    Exists(String),
    Equals(String, String),
    Prefix(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct Compound {
    pub(crate) tag: Option<String>,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: Vec<AttrMatch>,
}

/// Parses `selector` into its comma-separated compounds.
///
/// Returns `None` for syntax outside the supported subset, which the
/// memory document treats as matching nothing.
pub(crate) fn parse(selector: &str) -> Option<Vec<Compound>> {
    selector
        .split(',')
        .map(|part| parse_compound(part.trim()))
        .collect()
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_name(chars: &[char], pos: &mut usize) -> Option<String> {
    let start = *pos;
    while *pos < chars.len() && is_name_char(chars[*pos]) {
        *pos += 1;
    }
    (*pos > start).then(|| chars[start..*pos].iter().collect())
}

fn parse_compound(part: &str) -> Option<Compound> {
    if part.is_empty() {
        return None;
    }
    let chars: Vec<char> = part.chars().collect();
    let mut pos = 0;
    let mut compound = Compound::default();

    if chars[0] != '#' && chars[0] != '.' && chars[0] != '[' {
        compound.tag = Some(take_name(&chars, &mut pos)?.to_ascii_lowercase());
    }

    while pos < chars.len() {
        match chars[pos] {
            '#' => {
                pos += 1;
                compound.id = Some(take_name(&chars, &mut pos)?);
            }
            '.' => {
                pos += 1;
                compound.classes.push(take_name(&chars, &mut pos)?);
            }
            '[' => {
                pos += 1;
                compound.attrs.push(parse_attr(&chars, &mut pos)?);
            }
            _ => return None,
        }
    }
    Some(compound)
}

fn parse_attr(chars: &[char], pos: &mut usize) -> Option<AttrMatch> {
    let name = take_name(chars, pos)?;
    let prefix = match chars.get(*pos)? {
        ']' => {
            *pos += 1;
            return Some(AttrMatch::Exists(name));
        }
        '=' => {
            *pos += 1;
            false
        }
        '^' if chars.get(*pos + 1) == Some(&'=') => {
            *pos += 2;
            true
        }
        _ => return None,
    };

    let value = match chars.get(*pos)? {
        quote @ ('"' | '\'') => {
            let quote = *quote;
            *pos += 1;
            let start = *pos;
            while *pos < chars.len() && chars[*pos] != quote {
                *pos += 1;
            }
            let value: String = chars.get(start..*pos)?.iter().collect();
            *pos += 1;
            value
        }
        _ => take_name(chars, pos)?,
    };

    if chars.get(*pos) != Some(&']') {
        return None;
    }
    *pos += 1;

    Some(if prefix {
        AttrMatch::Prefix(name, value)
    } else {
        AttrMatch::Equals(name, value)
    })
}
