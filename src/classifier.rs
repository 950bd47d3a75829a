use crate::models::{AccountClass, AccountRecord, FlippedAccount};

/// Check one record against the nature expected for its class. Only asset
/// (1) and liability (2) accounts are evaluated; zero balances never flip.
pub fn flip_for(record: &AccountRecord) -> Option<FlippedAccount> {
    let expected = record.class()?.expected_nature()?;
    let actual = record.balance_sign()?;
    if actual == expected {
        return None;
    }
    Some(FlippedAccount {
        record: record.clone(),
        expected_nature: expected,
        actual_nature: actual,
    })
}

pub fn classify(records: &[AccountRecord]) -> Vec<FlippedAccount> {
    records.iter().filter_map(flip_for).collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlipTally {
    pub asset: usize,
    pub liability: usize,
}

pub fn tally(flipped: &[FlippedAccount]) -> FlipTally {
    flipped
        .iter()
        .fold(FlipTally::default(), |mut t, f| {
            match f.record.class() {
                Some(AccountClass::Asset) => t.asset += 1,
                Some(AccountClass::Liability) => t.liability += 1,
                _ => {}
            }
            t
        })
}
