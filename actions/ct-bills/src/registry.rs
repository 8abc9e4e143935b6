use crate::types::Bill;
use indexmap::IndexMap;

/// Arena of the bills built during one run, keyed by bill identifier.
///
/// Owned by the run; components borrow it to locate bills by identifier, so
/// each identifier resolves to exactly one `Bill`. Iteration follows the order
/// in which identifiers were first registered.
#[derive(Debug, Clone, Default)]
pub struct BillRegistry {
    bills: IndexMap<String, Bill>,
}

impl BillRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bill under its identifier, returning any bill it replaced
    pub fn insert(&mut self, bill: Bill) -> Option<Bill> {
        self.bills.insert(bill.bill_id.clone(), bill)
    }

    pub fn get(&self, bill_id: &str) -> Option<&Bill> {
        self.bills.get(bill_id)
    }

    pub fn get_mut(&mut self, bill_id: &str) -> Option<&mut Bill> {
        self.bills.get_mut(bill_id)
    }

    pub fn contains(&self, bill_id: &str) -> bool {
        self.bills.contains_key(bill_id)
    }

    pub fn len(&self) -> usize {
        self.bills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bills.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bill> {
        self.bills.values()
    }

    pub fn into_bills(self) -> Vec<Bill> {
        self.bills.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BillType, Chamber};

    #[test]
    fn test_insert_keeps_first_position_and_replaces_value() {
        let mut registry = BillRegistry::new();
        registry.insert(Bill::new("2011", Chamber::Lower, "HB05001", "First", BillType::Bill));
        registry.insert(Bill::new("2011", Chamber::Upper, "SB00001", "Other", BillType::Bill));
        let previous =
            registry.insert(Bill::new("2011", Chamber::Lower, "HB05001", "Second", BillType::Bill));

        assert_eq!(previous.map(|b| b.title), Some("First".to_string()));
        assert_eq!(registry.len(), 2);
        let ids: Vec<&str> = registry.iter().map(|b| b.bill_id.as_str()).collect();
        assert_eq!(ids, vec!["HB05001", "SB00001"]);
        assert_eq!(registry.get("HB05001").unwrap().title, "Second");
    }
}
