#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Strict parse for values coming from the user or an external entry point.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" | "i" => Some(Self::Income),
            "expense" | "e" => Some(Self::Expense),
            _ => None,
        }
    }

    /// Lenient read of a stored column. Legacy rows have no type, and anything
    /// unrecognised is treated the same way.
    pub fn from_column(value: Option<&str>) -> Self {
        match value {
            Some("income") => Self::Income,
            _ => Self::Expense,
        }
    }

    pub fn all() -> &'static [TransactionType] {
        &[Self::Expense, Self::Income]
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
