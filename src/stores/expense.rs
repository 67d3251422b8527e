use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::filter::Where;
use crate::models::{Entity, Expense, ExpenseStatus, ExpenseType};

entity_store!(ExpenseStore, Expense);

impl ExpenseStore {
    pub fn by_type(&self, expense_type: ExpenseType) -> Vec<&Expense> {
        self.items().iter().filter(|e| e.expense_type == expense_type).collect()
    }

    pub fn by_status(&self, status: ExpenseStatus) -> Vec<&Expense> {
        self.items().iter().filter(|e| e.status == status).collect()
    }

    pub fn by_property(&self, property_id: &str) -> Vec<&Expense> {
        self.find(Where::new().eq("property_id", property_id))
    }

    /// Expenses due within `[start, end]`
    pub fn due_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<&Expense> {
        self.items()
            .iter()
            .filter(|e| e.due_date.is_some_and(|due| due >= start && due <= end))
            .collect()
    }

    pub fn overdue(&self, now: DateTime<Utc>) -> Vec<&Expense> {
        self.items().iter().filter(|e| e.is_active() && e.is_overdue(now)).collect()
    }

    /// Sum of active, non-cancelled expenses, optionally for one status
    pub fn total_amount(&self, status: Option<ExpenseStatus>) -> Decimal {
        self.items()
            .iter()
            .filter(|e| e.is_active() && e.status != ExpenseStatus::Cancelled)
            .filter(|e| status.map_or(true, |status| e.status == status))
            .map(|e| e.amount)
            .sum()
    }

    pub fn mark_paid(&mut self, id: &str, paid_at: DateTime<Utc>) -> bool {
        self.update_item(id, |expense| {
            expense.status = ExpenseStatus::Paid;
            expense.paid_date = Some(paid_at);
        })
    }

    pub fn active_expenses(&self) -> Vec<&Expense> {
        self.active_items()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{LoggingOptions, StoreOptions};
    use crate::testing::expense;
    use chrono::Duration;

    fn store() -> ExpenseStore {
        ExpenseStore::new(StoreOptions::for_entity().logging(LoggingOptions::disabled()))
    }

    #[test]
    fn overdue_excludes_paid_and_deleted() {
        let now = Utc::now();
        let mut store = store();
        let mut late = expense("e1", ExpenseType::Repair, 120);
        late.due_date = Some(now - Duration::days(2));
        let mut paid = late.clone();
        paid.id = "e2".to_string();
        paid.status = ExpenseStatus::Paid;
        let mut deleted = late.clone();
        deleted.id = "e3".to_string();
        deleted.deleted_at = Some(now);
        store.set_items(vec![late, paid, deleted]);

        let overdue: Vec<_> = store.overdue(now).iter().map(|e| e.id.clone()).collect();
        assert_eq!(overdue, vec!["e1"]);

        assert!(store.mark_paid("e1", now));
        assert!(store.overdue(now).is_empty());
        assert_eq!(store.get_by_id("e1").unwrap().paid_date, Some(now));
    }

    #[test]
    fn totals_skip_cancelled_expenses() {
        let mut store = store();
        let mut cancelled = expense("e3", ExpenseType::Tax, 1000);
        cancelled.status = ExpenseStatus::Cancelled;
        store.set_items(vec![
            expense("e1", ExpenseType::Cleaning, 80),
            expense("e2", ExpenseType::Utilities, 45),
            cancelled,
        ]);

        assert_eq!(store.total_amount(None), Decimal::from(125));
        assert_eq!(store.total_amount(Some(ExpenseStatus::Paid)), Decimal::ZERO);
        assert_eq!(store.by_type(ExpenseType::Tax).len(), 1);
    }
}
