use std::fmt::{Display, Formatter, Result as FmtResult};

const DBL_QUOTE: char = '"';

fn quote_into(text: &str, buffer: &mut String) {
    buffer.push(DBL_QUOTE);

    for ch in text.chars() {
        if ch == DBL_QUOTE {
            buffer.push(DBL_QUOTE);
        }

        buffer.push(ch);
    }

    buffer.push(DBL_QUOTE);
}

/// Represents a SQL identifier.
///
/// # Remarks
///
/// Every part is always quoted so that column names such as `value` or `type`
/// never collide with keywords of either dialect. Embedded quotes are doubled.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Ident<'a>(Option<&'a str>, &'a str);

impl<'a> Ident<'a> {
    /// Creates and returns a new unqualified identifier.
    ///
    /// # Arguments
    ///
    /// * `name` - the object name
    pub fn unqualified<S: ?Sized + AsRef<str>>(name: &'a S) -> Self {
        Self(None, name.as_ref())
    }

    /// Creates and returns a new qualified identifier.
    ///
    /// # Arguments
    ///
    /// * `schema` - the schema name
    /// * `name` - the object name
    ///
    /// # Remarks
    ///
    /// An empty schema name yields an unqualified identifier.
    pub fn qualified<S1, S2>(schema: &'a S1, name: &'a S2) -> Self
    where
        S1: ?Sized + AsRef<str>,
        S2: ?Sized + AsRef<str>,
    {
        let schema = schema.as_ref();
        Self((!schema.is_empty()).then_some(schema), name.as_ref())
    }

    /// Gets the associated schema name, if any.
    pub fn schema(&self) -> Option<&'a str> {
        self.0
    }

    /// Gets the object identifier name.
    pub fn name(&self) -> &'a str {
        self.1
    }

    /// Returns the full, quoted identifier name.
    pub fn quote(&self) -> String {
        let mut quoted = String::with_capacity(self.1.len() + 2);

        if let Some(schema) = self.0 {
            quote_into(schema, &mut quoted);
            quoted.push('.');
        }

        quote_into(self.1, &mut quoted);
        quoted
    }
}

impl Display for Ident<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.quote())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("papita_transactions", "accounts", "\"papita_transactions\".\"accounts\"")]
    #[case("main", "My Table", "\"main\".\"My Table\"")]
    #[case("", "types", "\"types\"")]
    fn qualified_identifier_should_be_quoted(
        #[case] schema: &str,
        #[case] table: &str,
        #[case] expected: &str,
    ) {
        // arrange
        let ident = Ident::qualified(schema, table);

        // act
        let name = ident.quote();

        // assert
        assert_eq!(name, expected)
    }

    #[rstest]
    #[case("value", "\"value\"")]
    #[case("odd\"name", "\"odd\"\"name\"")]
    fn unqualified_identifier_should_be_quoted(#[case] column: &str, #[case] expected: &str) {
        assert_eq!(Ident::unqualified(column).to_string(), expected)
    }
}
