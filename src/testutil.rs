use std::io::Write;
use std::str::FromStr;

use chrono::NaiveDate;
use goldenfile::Mint;
use rust_decimal::Decimal;

use crate::model::{Account, Transaction, TransactionType};

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).expect("test decimal did not parse")
}

pub fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("test date did not parse")
}

pub fn trn(date: &str, amount: &str, type_: &str) -> Transaction {
    Transaction {
        id: None,
        day: day(date),
        amount: dec(amount),
        type_: TransactionType::from_api(type_),
        description: String::new(),
    }
}

pub fn account(number: &str, balance: &str) -> Account {
    Account {
        id: None,
        account_number: number.to_string(),
        balance: dec(balance),
    }
}

/// Compares `content` against the golden file at `testdata/<golden_path>`.
pub fn golden_test(golden_path: &str, content: &str) {
    let mut mint = Mint::new("testdata");
    let differ = Box::new(goldenfile::differs::text_diff);
    let mut out = mint
        .new_goldenfile_with_differ(golden_path, differ)
        .expect("new goldenfile");

    let mut s = content.to_string();
    // Ensure that the file only ends in a single newline to make git
    // checks happy.
    while s.ends_with("\n\n") {
        s.pop();
    }

    out.write_all(s.as_bytes()).expect("write output");
}

#[macro_export]
macro_rules! assert_text_eq {
    ($want:expr, $got:expr) => {
        let want_str: &str = $want;
        let got_str: &str = $got;
        if want_str != got_str {
            text_diff::assert_diff(want_str, got_str, "\n", 0);
        }
    };
}
