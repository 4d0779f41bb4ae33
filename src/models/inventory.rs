use serde::{Deserialize, Serialize};

/// A stock item the Notifier watches for low-stock alerts. Read-only to the
/// core — it is someone else's job to restock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: i64,
    pub name: String,
    pub current_quantity: f64,
    pub minimum_threshold: f64,
}

impl InventoryItem {
    /// Low-stock ⇔ 0 < current ≤ threshold (§3). Out-of-stock (current == 0)
    /// is deliberately excluded — see spec.md §8 scenario 6.
    pub fn is_low_stock(&self) -> bool {
        self.current_quantity > 0.0 && self.current_quantity <= self.minimum_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(current: f64, threshold: f64) -> InventoryItem {
        InventoryItem { id: 1, name: "Nutrient A".into(), current_quantity: current, minimum_threshold: threshold }
    }

    #[test]
    fn low_stock_boundary() {
        assert!(item(5.0, 5.0).is_low_stock());
        assert!(item(2.0, 5.0).is_low_stock());
        assert!(!item(5.1, 5.0).is_low_stock());
    }

    #[test]
    fn out_of_stock_is_not_low_stock() {
        assert!(!item(0.0, 5.0).is_low_stock());
    }
}
