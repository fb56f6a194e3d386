use std::fmt;
use std::str::FromStr;

/// A checkout route, in flow order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckoutStep {
    Cart,
    Information,
    Review,
    Payment,
    Confirmation,
}

impl CheckoutStep {
    pub const ALL: [CheckoutStep; 5] = [
        Self::Cart,
        Self::Information,
        Self::Review,
        Self::Payment,
        Self::Confirmation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cart => "cart",
            Self::Information => "information",
            Self::Review => "review",
            Self::Payment => "payment",
            Self::Confirmation => "confirmation",
        }
    }

    /// Route path, e.g. `/checkout/review`
    pub fn path(&self) -> String {
        format!("/checkout/{}", self.as_str())
    }

    /// Zero-based position, for progress display
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn next(&self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(&self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }
}

impl FromStr for CheckoutStep {
    type Err = String;

    /// Accepts a bare step name or its full route path
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let name = value.strip_prefix("/checkout/").unwrap_or(value);
        Self::ALL
            .into_iter()
            .find(|step| step.as_str() == name)
            .ok_or_else(|| format!("{} is not a checkout step", value))
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
