//! Scripted ledger scenarios.

/// A named sequence of ledger operations with expected outcomes.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Steps in the scenario.
    pub steps: Vec<ScenarioStep>,
}

/// A step in a scenario.
#[derive(Debug, Clone)]
pub enum ScenarioStep {
    /// Open an account.
    Create { name: String, balance: Option<f64> },
    /// Credit an account.
    Deposit { account: String, amount: f64 },
    /// Debit an account.
    Withdraw {
        account: String,
        amount: f64,
        expect: Outcome,
    },
    /// Move funds between accounts.
    Transfer {
        from: String,
        to: String,
        amount: f64,
        expect: Outcome,
    },
    /// Write a snapshot, empty the ledger and read the snapshot back.
    SaveAndReload,
    /// Assert a condition.
    Assert { condition: AssertCondition },
}

/// Whether a step should be applied or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Rejected,
}

/// Conditions that can be asserted.
#[derive(Debug, Clone)]
pub enum AssertCondition {
    /// Account balance equals.
    BalanceEquals { account: String, amount: f64 },
    /// Account history equals, oldest first.
    HistoryEquals {
        account: String,
        transactions: Vec<String>,
    },
    /// Sum of all balances equals.
    TotalEquals { amount: f64 },
}

impl Scenario {
    /// Load a scenario by name.
    pub fn load(name: &str) -> anyhow::Result<Self> {
        match name {
            "walkthrough" => Ok(Self::walkthrough()),
            "overdraft" => Ok(Self::overdraft()),
            _ => Err(anyhow::anyhow!(
                "Unknown scenario: {} (available: {})",
                name,
                Self::names().join(", ")
            )),
        }
    }

    /// Names accepted by [`Scenario::load`].
    pub fn names() -> &'static [&'static str] {
        &["walkthrough", "overdraft"]
    }

    /// Two customers: deposit, failed overdraft, transfer, snapshot round trip.
    fn walkthrough() -> Self {
        Self {
            name: "walkthrough".to_string(),
            description: "Deposit, overdraft rejection, transfer and save/load".to_string(),
            steps: vec![
                ScenarioStep::Create {
                    name: "Alice".to_string(),
                    balance: Some(100.0),
                },
                ScenarioStep::Create {
                    name: "Bob".to_string(),
                    balance: None,
                },
                ScenarioStep::Deposit {
                    account: "Alice".to_string(),
                    amount: 50.0,
                },
                ScenarioStep::Withdraw {
                    account: "Bob".to_string(),
                    amount: 10.0,
                    expect: Outcome::Rejected,
                },
                ScenarioStep::Transfer {
                    from: "Alice".to_string(),
                    to: "Bob".to_string(),
                    amount: 150.0,
                    expect: Outcome::Applied,
                },
                ScenarioStep::Assert {
                    condition: AssertCondition::BalanceEquals {
                        account: "Alice".to_string(),
                        amount: 0.0,
                    },
                },
                ScenarioStep::Assert {
                    condition: AssertCondition::BalanceEquals {
                        account: "Bob".to_string(),
                        amount: 150.0,
                    },
                },
                ScenarioStep::SaveAndReload,
                ScenarioStep::Assert {
                    condition: AssertCondition::HistoryEquals {
                        account: "Alice".to_string(),
                        transactions: vec![
                            "Deposit: 50".to_string(),
                            "Transfer to Bob: 150".to_string(),
                        ],
                    },
                },
                ScenarioStep::Assert {
                    condition: AssertCondition::HistoryEquals {
                        account: "Bob".to_string(),
                        transactions: vec!["Transfer from Alice: 150".to_string()],
                    },
                },
                ScenarioStep::Assert {
                    condition: AssertCondition::TotalEquals { amount: 150.0 },
                },
            ],
        }
    }

    /// Rejected debits leave balances and histories untouched.
    fn overdraft() -> Self {
        Self {
            name: "overdraft".to_string(),
            description: "Debits beyond the balance are rejected without side effects"
                .to_string(),
            steps: vec![
                ScenarioStep::Create {
                    name: "Carol".to_string(),
                    balance: Some(20.0),
                },
                ScenarioStep::Create {
                    name: "Dave".to_string(),
                    balance: Some(5.0),
                },
                ScenarioStep::Withdraw {
                    account: "Carol".to_string(),
                    amount: 20.01,
                    expect: Outcome::Rejected,
                },
                ScenarioStep::Transfer {
                    from: "Dave".to_string(),
                    to: "Carol".to_string(),
                    amount: 6.0,
                    expect: Outcome::Rejected,
                },
                ScenarioStep::Transfer {
                    from: "Carol".to_string(),
                    to: "Carol".to_string(),
                    amount: 1.0,
                    expect: Outcome::Rejected,
                },
                ScenarioStep::Withdraw {
                    account: "Carol".to_string(),
                    amount: 20.0,
                    expect: Outcome::Applied,
                },
                ScenarioStep::Assert {
                    condition: AssertCondition::HistoryEquals {
                        account: "Carol".to_string(),
                        transactions: vec!["Withdraw: 20".to_string()],
                    },
                },
                ScenarioStep::Assert {
                    condition: AssertCondition::HistoryEquals {
                        account: "Dave".to_string(),
                        transactions: vec![],
                    },
                },
                ScenarioStep::Assert {
                    condition: AssertCondition::TotalEquals { amount: 5.0 },
                },
            ],
        }
    }
}
