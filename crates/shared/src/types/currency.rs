//! Supported account currencies.

use serde::{Deserialize, Serialize};

/// Currencies an account may be opened in.
///
/// Balances are always stored in the currency's smallest unit (cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US dollar.
    Usd,
    /// Euro.
    Eur,
    /// Canadian dollar.
    Cad,
}

impl Currency {
    /// All supported currencies.
    pub const ALL: [Self; 3] = [Self::Usd, Self::Eur, Self::Cad];

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Cad => "CAD",
        }
    }

    /// Parses an ISO code, case-insensitively. Returns `None` for unsupported codes.
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(code.trim()))
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
