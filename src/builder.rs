//! Packet builder: a comma-separated template turned into ordered, named fields.
//!
//! Parsing is all-or-nothing. The first malformed token discards everything
//! parsed so far, logs a warning naming the token and its line, and leaves
//! the builder empty. The error stays available through [`Builder::last_error`].

use crate::error::TemplateError;
use crate::field::Field;
use crate::parser::MAX_FIELD_SIZE;
use crate::value::FieldValue;
use log::{debug, trace, warn};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

#[derive(Debug, Default)]
pub struct Builder {
    template: String,
    tokens: Vec<String>,
    fields: HashMap<String, Field>,
    order: Vec<String>,
    last_error: Option<TemplateError>,
}

/// Result of tokenizing a template, before it replaces the builder state.
struct Parsed {
    tokens: Vec<String>,
    fields: HashMap<String, Field>,
    order: Vec<String>,
}

impl Builder {
    pub fn new() -> Self {
        Builder::default()
    }

    /// Builder with an initial template. A malformed template yields an empty
    /// builder; see [`Builder::last_error`].
    pub fn with_template(template: &str) -> Self {
        let mut b = Builder::new();
        b.set_template(template);
        b
    }

    /// Like [`Builder::with_template`], but a malformed template is an error.
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        let mut b = Builder::with_template(template);
        match b.last_error.take() {
            Some(e) => Err(e),
            None => Ok(b),
        }
    }

    /// Read a template file and parse it strictly.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let template = std::fs::read_to_string(path.as_ref())?;
        Builder::parse(&template)
    }

    /// Store `template` without whitespace (newlines are kept as line
    /// markers) and re-parse it.
    pub fn set_template(&mut self, template: &str) {
        self.template = template
            .chars()
            .filter(|c| *c == '\n' || !c.is_whitespace())
            .collect();
        self.prepare();
    }

    /// Re-derive tokens, fields and order from the stored template.
    pub fn prepare(&mut self) {
        self.reset();
        if self.template.chars().all(|c| c == '\n') {
            return;
        }
        match tokenize(&self.template) {
            Ok(parsed) => {
                debug!("parsed template: {} field(s)", parsed.order.len());
                self.tokens = parsed.tokens;
                self.fields = parsed.fields;
                self.order = parsed.order;
            }
            Err(e) => {
                warn!("{}", e);
                self.last_error = Some(e);
            }
        }
    }

    fn reset(&mut self) {
        self.tokens.clear();
        self.fields.clear();
        self.order.clear();
        self.last_error = None;
    }

    /// Number of tokens in the last successful parse.
    pub fn count(&self) -> usize {
        self.tokens.len()
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Field names in declaration order; a name repeats if the template repeats it.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn fields(&self) -> &HashMap<String, Field> {
        &self.fields
    }

    /// Live access to the field map, e.g. to resolve unset fields.
    pub fn fields_mut(&mut self) -> &mut HashMap<String, Field> {
        &mut self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.get_mut(name)
    }

    pub fn set_value(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<(), TemplateError> {
        let field = self
            .fields
            .get_mut(name)
            .ok_or_else(|| TemplateError::UnknownField(name.to_string()))?;
        field.set_value(value);
        Ok(())
    }

    /// The error that emptied the builder on the last parse, if any.
    pub fn last_error(&self) -> Option<&TemplateError> {
        self.last_error.as_ref()
    }

    /// Fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Field> + '_ {
        self.order.iter().filter_map(move |name| self.fields.get(name))
    }

    /// True when every field has a value (vacuously true when empty).
    pub fn is_correct(&self) -> bool {
        self.fields.values().all(Field::is_set)
    }

    /// Names of unset fields in declaration order, each listed once.
    pub fn unset_fields(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for field in self.iter().filter(|f| !f.is_set()) {
            if !out.contains(&field.name.as_str()) {
                out.push(&field.name);
            }
        }
        out
    }

    /// Length in bytes of the buffer [`Builder::encode`] produces, or `None`
    /// if the sum of field widths overflows `usize`.
    pub fn encoded_len(&self) -> Option<usize> {
        self.iter().try_fold(0usize, |total, f| total.checked_add(f.size))
    }

    /// Concatenate every field's bytes in declaration order.
    pub fn encode(&self) -> Result<Vec<u8>, TemplateError> {
        let len = self.encoded_len().ok_or(TemplateError::LengthOverflow)?;
        let mut out = Vec::with_capacity(len.min(MAX_FIELD_SIZE));
        for name in &self.order {
            let field = self
                .fields
                .get(name)
                .ok_or_else(|| TemplateError::UnknownField(name.clone()))?;
            field.encode_into(&mut out)?;
        }
        trace!("encoded {} field(s) into {} byte(s)", self.order.len(), out.len());
        Ok(out)
    }
}

/// Split on `,`, strip newlines and parse each token. Stops at the first bad token.
fn tokenize(template: &str) -> Result<Parsed, TemplateError> {
    let mut tokens = Vec::new();
    let mut fields = HashMap::new();
    let mut order = Vec::new();
    let mut line = 1;

    for raw in template.split(',') {
        let leading = raw.chars().take_while(|c| *c == '\n').count();
        let token_line = line + leading;
        line += raw.matches('\n').count();

        let token = raw.replace('\n', "");
        let field = Field::parse(&token).map_err(|source| TemplateError::Token {
            token: token.clone(),
            line: token_line,
            source: Box::new(source),
        })?;
        order.push(field.name.clone());
        fields.insert(field.name.clone(), field);
        tokens.push(token);
    }

    Ok(Parsed { tokens, fields, order })
}

impl fmt::Display for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for field in self.iter() {
            writeln!(f, "{}", field)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_is_stripped_but_newlines_kept() {
        let b = Builder::with_template("a[1] = 1,\r\n\tb[2]");
        assert_eq!(b.template(), "a[1]=1,\nb[2]");
        assert_eq!(b.tokens(), &["a[1]=1".to_string(), "b[2]".to_string()]);
    }

    #[test]
    fn line_counts_leading_newlines() {
        let b = Builder::with_template("a[1],\nb[1],\n\nbad,\nc[1]");
        let err = b.last_error().expect("error");
        assert_eq!(err.line(), Some(4));
    }

    #[test]
    fn trailing_newline_does_not_shift_the_token_line() {
        let b = Builder::with_template("a[1]\n,bad");
        assert_eq!(b.last_error().and_then(|e| e.line()), Some(2));
        let b = Builder::with_template("bad\n,a[1]");
        assert_eq!(b.last_error().and_then(|e| e.line()), Some(1));
    }

    #[test]
    fn empty_template_is_empty_without_error() {
        let b = Builder::with_template("  \n ");
        assert_eq!(b.count(), 0);
        assert!(b.last_error().is_none());
        assert!(b.is_correct());
        assert_eq!(b.encode().expect("encode"), Vec::<u8>::new());
    }

    #[test]
    fn trailing_comma_is_a_format_error() {
        let b = Builder::with_template("a[1],");
        assert!(b.last_error().map(TemplateError::is_format_error).unwrap_or(false));
        assert_eq!(b.count(), 0);
    }

    #[test]
    fn oversized_widths_never_reach_the_encoder() {
        let b = Builder::with_template("a[18446744073709551615]=1, b[1]=1");
        assert_eq!(b.count(), 0);
        assert!(matches!(
            b.last_error(),
            Some(TemplateError::Token { source, .. }) if matches!(**source, TemplateError::InvalidSize { .. })
        ));
    }

    #[test]
    fn encoded_len_overflow_is_an_error() {
        let mut b = Builder::with_template("a[1]=1, b[1]=1");
        for f in b.fields_mut().values_mut() {
            f.size = usize::MAX / 2 + 1;
        }
        assert_eq!(b.encoded_len(), None);
        assert!(matches!(b.encode(), Err(TemplateError::LengthOverflow)));
    }

    #[test]
    fn display_lists_fields_in_order() {
        let b = Builder::with_template("z[1]=1,a[2]");
        assert_eq!(b.to_string(), "z[1] = 0x1\na[2] = None\n");
    }
}
