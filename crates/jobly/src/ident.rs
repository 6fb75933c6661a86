//! Safe column identifier handling.
//!
//! Postgres cannot parameterize identifiers, so partial-update columns are
//! spliced into SQL as quoted identifiers instead:
//!
//! - any characters are allowed except NUL
//! - `"` is escaped as `""`
//! - the empty name is rejected
//!
//! # Example
//! ```ignore
//! use jobly::Ident;
//!
//! let c = Ident::quoted("num_employees")?;
//! assert_eq!(c.to_sql(), r#""num_employees""#);
//! # Ok::<(), jobly::JoblyError>(())
//! ```

use crate::error::{JoblyError, JoblyResult};

/// A quoted SQL column identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident(String);

impl Ident {
    /// Create a quoted identifier.
    pub fn quoted(name: &str) -> JoblyResult<Self> {
        if name.is_empty() {
            return Err(JoblyError::validation("Empty quoted identifier"));
        }
        if name.contains('\0') {
            return Err(JoblyError::validation(
                "Identifier cannot contain NUL character",
            ));
        }
        Ok(Self(name.to_string()))
    }

    /// The unescaped column name.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Render the identifier as SQL.
    pub fn to_sql(&self) -> String {
        // surrounding quotes (escapes may add more)
        let mut out = String::with_capacity(self.0.len() + 2);
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        out.push('"');
        for ch in self.0.chars() {
            if ch == '"' {
                out.push('"');
                out.push('"');
            } else {
                out.push(ch);
            }
        }
        out.push('"');
    }
}
