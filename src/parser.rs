//! Parse a single field token (`name[size]=default`) using PEST.

use crate::error::TemplateError;
use crate::field::Field;
use crate::value::FieldValue;
use pest::Parser;
use pest_derive::Parser as PestParser;

#[derive(PestParser)]
#[grammar = "template.pest"]
struct TemplateParser;

/// Largest accepted field width in bytes.
pub const MAX_FIELD_SIZE: usize = 65_535;

/// Parse one token into a [`Field`]. Whitespace is ignored, so spaced
/// numerals such as `0x1111 2222` read as a single value.
pub fn parse_field(token: &str) -> Result<Field, TemplateError> {
    let token: String = token.chars().filter(|c| !c.is_whitespace()).collect();
    let token = token.as_str();
    let (open, close) = match (token.find('['), token.find(']')) {
        (Some(open), Some(close)) => (open, close),
        _ => return Err(TemplateError::MissingBrackets(token.to_string())),
    };
    if close < open {
        return Err(TemplateError::InvalidSize {
            token: token.to_string(),
            size: String::new(),
        });
    }
    let pair = TemplateParser::parse(Rule::field, token)
        .map_err(|e| TemplateError::Syntax {
            token: token.to_string(),
            message: e.variant.message().to_string(),
        })?
        .next()
        .ok_or_else(|| TemplateError::Syntax {
            token: token.to_string(),
            message: "empty parse".to_string(),
        })?;

    let mut name = String::new();
    let mut size = None;
    let mut value = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::name => name = inner.as_str().to_string(),
            Rule::size => size = Some(parse_size(token, inner.as_str())?),
            Rule::default => {
                let numeral = inner.into_inner().next().map(|p| p.as_str()).unwrap_or("");
                value = Some(parse_default(token, numeral)?);
            }
            _ => {}
        }
    }
    let size = size.ok_or_else(|| TemplateError::InvalidSize {
        token: token.to_string(),
        size: String::new(),
    })?;
    Ok(Field { name, size, value })
}

/// Base-10 byte count in `1..=MAX_FIELD_SIZE`.
fn parse_size(token: &str, s: &str) -> Result<usize, TemplateError> {
    match s.parse::<usize>() {
        Ok(n) if n > 0 && n <= MAX_FIELD_SIZE => Ok(n),
        _ => Err(TemplateError::InvalidSize {
            token: token.to_string(),
            size: s.to_string(),
        }),
    }
}

fn parse_default(token: &str, s: &str) -> Result<FieldValue, TemplateError> {
    FieldValue::parse_numeral(s).ok_or_else(|| TemplateError::InvalidDefault {
        token: token.to_string(),
        value: s.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_text_between_bracket_and_equals() {
        let f = parse_field("foo[2]junk=7").expect("parse");
        assert_eq!(f.name, "foo");
        assert_eq!(f.size, 2);
        assert_eq!(f.value.and_then(|v| v.as_u64()), Some(7));
    }

    #[test]
    fn extra_closing_bracket_is_filler() {
        let f = parse_field("foo[1]]").expect("parse");
        assert_eq!(f.size, 1);
        assert!(f.value.is_none());
    }

    #[test]
    fn empty_name_is_allowed() {
        let f = parse_field("[3]=1").expect("parse");
        assert_eq!(f.name, "");
        assert_eq!(f.size, 3);
    }

    #[test]
    fn equals_before_brackets_is_rejected() {
        let err = parse_field("a=b[1]").unwrap_err();
        assert!(matches!(err, TemplateError::Syntax { .. }), "{:?}", err);
    }

    #[test]
    fn equals_inside_brackets_is_invalid_size() {
        let err = parse_field("foo[1=2]").unwrap_err();
        assert!(matches!(err, TemplateError::InvalidSize { .. }), "{:?}", err);
    }

    #[test]
    fn second_equals_makes_default_invalid() {
        let err = parse_field("foo[1]=2=3").unwrap_err();
        match err {
            TemplateError::InvalidDefault { value, .. } => assert_eq!(value, "2=3"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn closing_bracket_before_opening_is_invalid_size() {
        for token in ["a]b[1", "a]x[1]=5", "]foo[2]"] {
            let err = parse_field(token).unwrap_err();
            assert!(matches!(err, TemplateError::InvalidSize { .. }), "{}: {:?}", token, err);
        }
    }

    #[test]
    fn whitespace_inside_token_is_ignored() {
        let f = parse_field("foo[1] = 0x01").expect("parse");
        assert_eq!(f.value.and_then(|v| v.as_u64()), Some(1));
        let f = parse_field("foo[1]=      128").expect("parse");
        assert_eq!(f.value.and_then(|v| v.as_u64()), Some(128));
        let f = parse_field(" bar [ 2 ]").expect("parse");
        assert_eq!((f.name.as_str(), f.size), ("bar", 2));
    }

    #[test]
    fn size_limit() {
        assert_eq!(parse_field("big[65535]").map(|f| f.size).ok(), Some(MAX_FIELD_SIZE));
        for token in ["big[65536]", "big[18446744073709551615]", "big[99999999999999999999999]"] {
            assert!(matches!(parse_field(token), Err(TemplateError::InvalidSize { .. })), "{}", token);
        }
    }

    #[test]
    fn zero_and_negative_sizes() {
        assert!(matches!(parse_field("foo[0]"), Err(TemplateError::InvalidSize { .. })));
        assert!(matches!(parse_field("foo[-1]"), Err(TemplateError::InvalidSize { .. })));
        assert!(matches!(parse_field("foo[]"), Err(TemplateError::InvalidSize { .. })));
    }

    #[test]
    fn empty_default_is_invalid() {
        assert!(matches!(parse_field("foo[1]="), Err(TemplateError::InvalidDefault { .. })));
    }
}
