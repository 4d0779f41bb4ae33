use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};

use crate::models::InventoryItem;

/// Inventory repository for database operations
pub struct InventoryRepo;

impl InventoryRepo {
    pub fn upsert(conn: &Connection, item: &InventoryItem) -> Result<InventoryItem> {
        conn.execute(
            "INSERT INTO inventory_items (name, current_quantity, minimum_threshold)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO UPDATE SET
                current_quantity = excluded.current_quantity,
                minimum_threshold = excluded.minimum_threshold",
            rusqlite::params![item.name, item.current_quantity, item.minimum_threshold],
        )
        .with_context(|| format!("Failed to upsert inventory item: {}", item.name))?;

        Self::get_by_name(conn, &item.name)?
            .context("inventory item vanished immediately after upsert")
    }

    pub fn get_by_name(conn: &Connection, name: &str) -> Result<Option<InventoryItem>> {
        let mut stmt = conn.prepare(
            "SELECT id, name, current_quantity, minimum_threshold FROM inventory_items WHERE name = ?1",
        )?;
        stmt.query_row([name], Self::from_row)
            .optional()
            .with_context(|| format!("Failed to fetch inventory item {}", name))
    }

    pub fn list_all(conn: &Connection) -> Result<Vec<InventoryItem>> {
        let mut stmt = conn.prepare(
            "SELECT id, name, current_quantity, minimum_threshold FROM inventory_items ORDER BY name",
        )?;
        let rows = stmt.query_map([], Self::from_row)?;
        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(items)
    }

    pub fn list_low_stock(conn: &Connection) -> Result<Vec<InventoryItem>> {
        Ok(Self::list_all(conn)?.into_iter().filter(|i| i.is_low_stock()).collect())
    }

    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<InventoryItem> {
        Ok(InventoryItem {
            id: row.get(0)?,
            name: row.get(1)?,
            current_quantity: row.get(2)?,
            minimum_threshold: row.get(3)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;

    #[test]
    fn upsert_then_update_quantity() {
        let conn = DbConnection::connect_in_memory().unwrap();
        let item = InventoryItem { id: 0, name: "Nutrient A".into(), current_quantity: 10.0, minimum_threshold: 5.0 };
        InventoryRepo::upsert(&conn, &item).unwrap();

        let updated = InventoryItem { current_quantity: 2.0, ..item };
        InventoryRepo::upsert(&conn, &updated).unwrap();

        let fetched = InventoryRepo::get_by_name(&conn, "Nutrient A").unwrap().unwrap();
        assert_eq!(fetched.current_quantity, 2.0);
        assert!(fetched.is_low_stock());
    }

    #[test]
    fn list_low_stock_filters() {
        let conn = DbConnection::connect_in_memory().unwrap();
        InventoryRepo::upsert(&conn, &InventoryItem { id: 0, name: "Low".into(), current_quantity: 1.0, minimum_threshold: 5.0 }).unwrap();
        InventoryRepo::upsert(&conn, &InventoryItem { id: 0, name: "Plenty".into(), current_quantity: 50.0, minimum_threshold: 5.0 }).unwrap();

        let low = InventoryRepo::list_low_stock(&conn).unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].name, "Low");
    }
}
