//! Output buffer for rendered query text.
//!
//! Serializers never concatenate structure themselves: parentheses come from
//! [`JpqlWriter::write_parentheses`], lists from [`JpqlWriter::write_each`] and
//! clause keywords from [`JpqlWriter::write_clause_keyword`], so spacing and
//! nesting follow one policy everywhere.

use crate::ast::Value;
use crate::error::{RenderError, RenderResult};
use crate::params::{ParamResolver, Params};

/// Accumulates query text and the parameters bound while writing it.
#[derive(Debug)]
pub struct JpqlWriter<'p> {
    buffer: String,
    depth: usize,
    pending_space: bool,
    params: ParamResolver<'p>,
}

impl<'p> JpqlWriter<'p> {
    pub fn new(params: ParamResolver<'p>) -> Self {
        Self {
            buffer: String::new(),
            depth: 0,
            pending_space: false,
            params,
        }
    }

    /// Append a token, preceded by a pending space unless it closes or separates.
    pub fn write(&mut self, token: &str) {
        if std::mem::take(&mut self.pending_space)
            && !token.is_empty()
            && !token.starts_with([')', ',', ' '])
        {
            self.buffer.push(' ');
        }
        self.buffer.push_str(token);
    }

    /// Request a single space before the next token.
    ///
    /// No space is emitted at the start, after whitespace, or after `(`.
    pub fn write_space(&mut self) {
        if !self.buffer.is_empty() && !self.buffer.ends_with([' ', '(']) {
            self.pending_space = true;
        }
    }

    /// Space-separated keyword, e.g. the operator between two operands.
    pub fn write_keyword(&mut self, keyword: &str) {
        self.write_space();
        self.write(keyword);
        self.write_space();
    }

    /// Clause keyword such as `WHERE` or `ORDER BY`.
    pub fn write_clause_keyword(&mut self, keyword: &str) {
        self.write_keyword(keyword);
    }

    /// Run `inner` between a balanced pair of parentheses.
    pub fn write_parentheses<F>(&mut self, inner: F) -> RenderResult<()>
    where
        F: FnOnce(&mut Self) -> RenderResult<()>,
    {
        self.write("(");
        self.depth += 1;
        inner(self)?;
        self.depth -= 1;
        self.write(")");
        Ok(())
    }

    /// Write `items` with `separator` between consecutive elements.
    pub fn write_each<I, T, F>(&mut self, items: I, separator: &str, mut f: F) -> RenderResult<()>
    where
        I: IntoIterator<Item = T>,
        F: FnMut(&mut Self, T) -> RenderResult<()>,
    {
        let mut first = true;
        for item in items {
            if !first {
                self.write(separator);
            }
            f(self, item)?;
            first = false;
        }
        Ok(())
    }

    /// Write a literal as inline text or as a generated placeholder.
    pub fn write_value(&mut self, value: &Value) -> RenderResult<()> {
        let token = self.params.register(value)?;
        self.write(&token);
        Ok(())
    }

    /// Write a named parameter placeholder, binding its value.
    pub fn write_named_param(&mut self, name: &str, embedded: Option<&Value>) -> RenderResult<()> {
        let token = self.params.bind_named(name, embedded)?;
        self.write(&token);
        Ok(())
    }

    /// Text written so far.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn params(&self) -> &ParamResolver<'p> {
        &self.params
    }

    /// Finalize into trimmed text and the bound parameters.
    pub fn finish(self) -> RenderResult<(String, Params)> {
        if self.depth != 0 {
            return Err(RenderError::IncompleteOutput(format!(
                "{} unclosed parenthes{}",
                self.depth,
                if self.depth == 1 { "is" } else { "es" }
            )));
        }
        let text = self.buffer.trim();
        if text.is_empty() {
            return Err(RenderError::IncompleteOutput("nothing was written".to_string()));
        }
        Ok((text.to_string(), self.params.into_params()))
    }
}
