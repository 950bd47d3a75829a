use std::fmt;

use rust_decimal::Decimal;

/// Conventional sign of an account balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nature {
    Debtor,
    Creditor,
}

impl Nature {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Debtor => "debtor",
            Self::Creditor => "creditor",
        }
    }

    /// Single-letter marker used by balance reports (`D` / `C`).
    pub fn indicator(&self) -> char {
        match self {
            Self::Debtor => 'D',
            Self::Creditor => 'C',
        }
    }

    pub fn from_indicator(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'D' => Some(Self::Debtor),
            'C' => Some(Self::Creditor),
            _ => None,
        }
    }
}

impl fmt::Display for Nature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Account class, taken from the first digit of the account code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountClass {
    Asset,
    Liability,
    Other(u8),
}

impl AccountClass {
    /// Returns `None` when the code is empty or its leading segment is not numeric.
    pub fn from_code(code: &str) -> Option<Self> {
        let lead = code.trim().split(['.', '-', ' ']).next()?;
        if lead.is_empty() || !lead.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match lead.as_bytes()[0] - b'0' {
            1 => Some(Self::Asset),
            2 => Some(Self::Liability),
            d => Some(Self::Other(d)),
        }
    }

    pub fn expected_nature(&self) -> Option<Nature> {
        match self {
            Self::Asset => Some(Nature::Debtor),
            Self::Liability => Some(Nature::Creditor),
            Self::Other(_) => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Asset => "asset".to_string(),
            Self::Liability => "liability".to_string(),
            Self::Other(d) => format!("class {d}"),
        }
    }
}

/// The "current balance" figure a report prints next to the totals, with
/// its D/C marker. Kept for display; classification uses the totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportedBalance {
    pub amount: Decimal,
    pub nature: Nature,
}

/// One account row of a balance report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    pub code: String,
    pub name: String,
    pub debit_total: Decimal,
    pub credit_total: Decimal,
    pub reported_balance: Option<ReportedBalance>,
}

impl AccountRecord {
    /// `None` when debits equal credits: a zero balance has no nature.
    pub fn balance_sign(&self) -> Option<Nature> {
        match self.debit_total.cmp(&self.credit_total) {
            std::cmp::Ordering::Greater => Some(Nature::Debtor),
            std::cmp::Ordering::Less => Some(Nature::Creditor),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn class(&self) -> Option<AccountClass> {
        AccountClass::from_code(&self.code)
    }

    pub fn balance(&self) -> Decimal {
        (self.debit_total - self.credit_total).abs()
    }
}

/// An account whose balance sign contradicts its class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlippedAccount {
    pub record: AccountRecord,
    pub expected_nature: Nature,
    pub actual_nature: Nature,
}

impl FlippedAccount {
    pub fn reason(&self) -> &'static str {
        match self.expected_nature {
            Nature::Debtor => "Asset with credit balance (C)",
            Nature::Creditor => "Liability with debit balance (D)",
        }
    }
}
