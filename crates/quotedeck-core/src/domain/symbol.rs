use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Longest listing the backend catalog serves is `ICICIBANK.NS`.
const MAX_TICKER_LEN: usize = 12;

/// Ticker in the shape the backend catalog lists them: an alphanumeric
/// root opened by a letter, optionally followed by `.`- or `-`-joined
/// tails for exchange suffixes (`TCS.NS`) and share classes (`BRK-B`).
/// Input is trimmed and uppercased on parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let ticker = input.trim().to_ascii_uppercase();
        if ticker.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }
        if ticker.len() > MAX_TICKER_LEN {
            return Err(ValidationError::SymbolTooLong {
                len: ticker.len(),
                max: MAX_TICKER_LEN,
            });
        }

        // Walk the segment structure: separators may only join two
        // non-empty alphanumeric runs.
        let mut run_open = false;
        for (index, ch) in ticker.char_indices() {
            match ch {
                'A'..='Z' => run_open = true,
                '0'..='9' => {
                    if index == 0 {
                        return Err(ValidationError::SymbolInvalidStart { ch });
                    }
                    run_open = true;
                }
                '.' | '-' => {
                    if !run_open {
                        let violation = if index == 0 {
                            ValidationError::SymbolInvalidStart { ch }
                        } else {
                            ValidationError::SymbolInvalidChar { ch, index }
                        };
                        return Err(violation);
                    }
                    run_open = false;
                }
                _ => return Err(ValidationError::SymbolInvalidChar { ch, index }),
            }
        }
        if !run_open {
            // The ticker ended on a separator.
            let (index, ch) = ticker.char_indices().last().unwrap_or((0, '.'));
            return Err(ValidationError::SymbolInvalidChar { ch, index });
        }

        Ok(Self(ticker))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}
