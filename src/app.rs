use std::io::{stdout, BufWriter, Write};
use std::str::FromStr;

use chrono::Utc;
use tracing::{info, warn};

use crate::{
    common::{
        error::{AppError, LedgerError},
        money::Money,
    },
    domain::{
        account::{AccountType, BasicAccount},
        line::TransactionLine,
        transaction::{LineEntry, Transaction},
    },
    io::journal,
    worker::gateway::PostingGateway,
};

/// Demo runs shipped with the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// A balanced purchase that gets posted to the journal.
    Simple,
    /// A purchase whose sides disagree; posting is refused.
    Unbalanced,
    /// A transaction assembled from an entry that is not a valid line.
    InvalidLine,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::Simple, Scenario::Unbalanced, Scenario::InvalidLine];
}

impl FromStr for Scenario {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Scenario::Simple),
            "unbalanced" => Ok(Scenario::Unbalanced),
            "invalid-line" => Ok(Scenario::InvalidLine),
            _ => Err(AppError::UnknownScenario(s.to_string())),
        }
    }
}

/// Parses the scenario selection from process arguments.
///
/// `args[0]` is the program name; no selection or `all` (any case) runs
/// every scenario.
pub fn scenarios_from_args(args: &[String]) -> Result<Vec<Scenario>, AppError> {
    match args.get(1).map(|s| s.trim()) {
        None => Ok(Scenario::ALL.to_vec()),
        Some(name) if name.eq_ignore_ascii_case("all") => Ok(Scenario::ALL.to_vec()),
        Some(name) => Ok(vec![name.parse()?]),
    }
}

pub fn run<I, S>(args: I) -> Result<(), AppError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(|s| s.into()).collect();
    let scenarios = scenarios_from_args(&args)?;

    let stdout = stdout();
    let mut writer = BufWriter::new(stdout.lock());
    for scenario in scenarios {
        run_scenario(scenario, &mut writer)?;
    }
    writer.flush()?;

    Ok(())
}

/// Runs one scenario, writing any posted journal rows to `out`.
///
/// Expected business failures (unbalanced transactions, invalid entries)
/// are logged and swallowed; anything else is returned.
pub fn run_scenario<W: Write>(scenario: Scenario, out: &mut W) -> Result<(), AppError> {
    info!(?scenario, "running scenario");

    let purchases = BasicAccount::new(123u64, "Purchases Account", AccountType::Liability);
    let receivable = BasicAccount::new(987u64, "acc-rec-account", AccountType::Asset);

    let outcome = match scenario {
        Scenario::Simple => post_purchase(&purchases, &receivable, 150, 150, out),
        Scenario::Unbalanced => post_purchase(&purchases, &receivable, 15, 150, out),
        Scenario::InvalidLine => Transaction::from_entries(
            Utc::now(),
            "Transaction description",
            vec![
                LineEntry::Draft {
                    account: &purchases,
                    debit: Money::zero(),
                    credit: Money::zero(),
                    comment: "this is not a valid transaction line".to_string(),
                },
                TransactionLine::debit(&purchases, Money::from_units(15))?.into(),
                TransactionLine::credit(&receivable, Money::from_units(150))?.into(),
            ],
        )
        .map(|_| ())
        .map_err(AppError::from),
    };

    match outcome {
        Err(AppError::Ledger(
            err @ (LedgerError::UnbalancedTransaction { .. } | LedgerError::InvalidLineEntry { .. }),
        )) => {
            warn!(?scenario, error = %err, "transaction rejected");
            Ok(())
        }
        other => other,
    }
}

fn post_purchase<W: Write>(
    debit_account: &BasicAccount,
    credit_account: &BasicAccount,
    debit: i64,
    credit: i64,
    out: &mut W,
) -> Result<(), AppError> {
    let transaction = Transaction::new(
        Utc::now(),
        "Purchase of inventory",
        [
            TransactionLine::debit(debit_account, Money::from_units(debit))?,
            TransactionLine::credit(credit_account, Money::from_units(credit))?,
        ],
    )?;

    let mut gateway =
        PostingGateway::with_handler(|tx: &Transaction<'_>| journal::write_entry(&mut *out, tx));

    let written = gateway.transact_with(&transaction, |_, posted| {
        info!(posted, "posting finished");
    })?;

    if let Some(rows) = written {
        let rows = rows?;
        info!(rows, "journal entry written");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn run_to_string(scenario: Scenario) -> String {
        let mut out = Vec::new();
        run_scenario(scenario, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn no_argument_selects_every_scenario() {
        assert_eq!(scenarios_from_args(&args(&["double-entry"])).unwrap(), Scenario::ALL.to_vec());
        assert_eq!(
            scenarios_from_args(&args(&["double-entry", "all"])).unwrap(),
            Scenario::ALL.to_vec()
        );
    }

    #[test]
    fn all_keyword_is_case_insensitive() {
        for name in ["ALL", "All", " aLl "] {
            assert_eq!(
                scenarios_from_args(&args(&["double-entry", name])).unwrap(),
                Scenario::ALL.to_vec()
            );
        }
    }

    #[test]
    fn scenario_name_is_parsed() {
        assert_eq!(
            scenarios_from_args(&args(&["double-entry", "Invalid-Line"])).unwrap(),
            vec![Scenario::InvalidLine]
        );
    }

    #[test]
    fn unknown_scenario_is_an_error() {
        let err = scenarios_from_args(&args(&["double-entry", "refund"])).unwrap_err();
        assert!(matches!(err, AppError::UnknownScenario(name) if name == "refund"));
    }

    #[test]
    fn simple_scenario_writes_journal() {
        let s = run_to_string(Scenario::Simple);
        let lines: Vec<&str> = s.lines().collect();
        assert_eq!(lines.len(), 3, "expected header + 2 rows");
        assert!(lines[1].ends_with(",123,Purchases Account,150.0000,0.0000,Purchase of inventory"));
        assert!(lines[2].ends_with(",987,acc-rec-account,0.0000,150.0000,Purchase of inventory"));
    }

    #[test]
    fn rejected_scenarios_write_nothing_and_succeed() {
        assert_eq!(run_to_string(Scenario::Unbalanced), "");
        assert_eq!(run_to_string(Scenario::InvalidLine), "");
    }
}
