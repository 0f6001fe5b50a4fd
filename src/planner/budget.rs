//! Budget ledger: income and expense entries with running totals.

use super::{Backend, position, required, settle};
use crate::{
    core::budget,
    errors::{Error, Result},
    models::{BudgetDraft, BudgetEntry, BudgetKind},
    storage::BUDGET_KEY,
};
use std::collections::BTreeMap;
use tracing::instrument;

/// Trims text fields and rejects drafts that cannot be recorded.
fn validate(draft: BudgetDraft) -> Result<BudgetDraft> {
    if !draft.amount.is_finite() || draft.amount <= 0.0 {
        return Err(Error::validation("Amount must be a positive number"));
    }
    Ok(BudgetDraft {
        kind: draft.kind,
        description: required(&draft.description, "Description")?,
        amount: draft.amount,
        category: required(&draft.category, "Category")?,
    })
}

/// Budget entries, newest first, mirrored to one backend.
#[derive(Debug)]
pub struct BudgetLedger {
    items: Vec<BudgetEntry>,
    backend: Backend,
}

impl BudgetLedger {
    /// Reads every entry from the backend.
    pub async fn load(backend: Backend) -> Result<Self> {
        let items = match &backend {
            Backend::Local(storage) => storage.load(BUDGET_KEY, Vec::new(), None),
            Backend::Remote(remote) => budget::get_all(&remote.db, &remote.user.id).await?,
        };
        Ok(Self { items, backend })
    }

    /// Entries, newest first.
    #[must_use]
    pub fn entries(&self) -> &[BudgetEntry] {
        &self.items
    }

    fn total(&self, kind: BudgetKind) -> f64 {
        self.items
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.amount)
            .sum()
    }

    /// Sum of income amounts.
    #[must_use]
    pub fn total_income(&self) -> f64 {
        self.total(BudgetKind::Income)
    }

    /// Sum of expense amounts.
    #[must_use]
    pub fn total_expenses(&self) -> f64 {
        self.total(BudgetKind::Expense)
    }

    /// Income minus expenses.
    #[must_use]
    pub fn balance(&self) -> f64 {
        self.total_income() - self.total_expenses()
    }

    /// Expense totals keyed by category.
    #[must_use]
    pub fn by_category(&self) -> BTreeMap<String, f64> {
        let mut totals = BTreeMap::new();
        for entry in self.items.iter().filter(|e| e.kind == BudgetKind::Expense) {
            *totals.entry(entry.category.clone()).or_insert(0.0) += entry.amount;
        }
        totals
    }

    /// Records a new entry at the top of the list.
    #[instrument(skip(self))]
    pub async fn add(&mut self, draft: BudgetDraft) -> Result<BudgetEntry> {
        let draft = validate(draft)?;
        let snapshot = self.items.clone();
        let provisional = draft.clone().into_entry();
        self.items.insert(0, provisional.clone());

        let outcome = match &self.backend {
            Backend::Local(storage) => storage.save(BUDGET_KEY, &self.items).map(|()| provisional),
            Backend::Remote(remote) => budget::create(&remote.db, &remote.user.id, draft).await,
        };
        let created = settle(&mut self.items, snapshot, outcome, "add budget entry")?;
        self.items[0] = created.clone();
        Ok(created)
    }

    /// Overwrites every editable field of an entry.
    #[instrument(skip(self))]
    pub async fn edit(&mut self, id: &str, draft: BudgetDraft) -> Result<()> {
        let draft = validate(draft)?;
        let index = position(&self.items, id, "budget entry", |e| e.id.as_str())?;
        let snapshot = self.items.clone();
        let entry = &mut self.items[index];
        entry.kind = draft.kind;
        entry.description.clone_from(&draft.description);
        entry.amount = draft.amount;
        entry.category.clone_from(&draft.category);

        let outcome = match &self.backend {
            Backend::Local(storage) => storage.save(BUDGET_KEY, &self.items),
            Backend::Remote(remote) => budget::update(&remote.db, &remote.user.id, id, &draft).await,
        };
        settle(&mut self.items, snapshot, outcome, "update budget entry")
    }

    /// Deletes an entry and returns it.
    #[instrument(skip(self))]
    pub async fn remove(&mut self, id: &str) -> Result<BudgetEntry> {
        let index = position(&self.items, id, "budget entry", |e| e.id.as_str())?;
        let snapshot = self.items.clone();
        let removed = self.items.remove(index);

        let outcome = match &self.backend {
            Backend::Local(storage) => storage.save(BUDGET_KEY, &self.items),
            Backend::Remote(remote) => budget::delete(&remote.db, &remote.user.id, id).await,
        };
        settle(&mut self.items, snapshot, outcome, "delete budget entry")?;
        Ok(removed)
    }

    /// Swaps in `entries` wholesale, as a restore does.
    pub async fn replace_all(&mut self, entries: Vec<BudgetEntry>) -> Result<()> {
        let snapshot = std::mem::replace(&mut self.items, entries);
        let outcome = match &self.backend {
            Backend::Local(storage) => storage.save(BUDGET_KEY, &self.items),
            Backend::Remote(remote) => {
                budget::replace_all(&remote.db, &remote.user.id, &self.items).await
            }
        };
        settle(&mut self.items, snapshot, outcome, "restore budget")
    }
}
