//! A single-table document store on SQLite.
//!
//! All entities share one table of `(pk, sk, payload)` rows, where `payload`
//! is the JSON-serialized record. Access patterns are limited to point
//! reads/writes and sort-key prefix/range scans within one partition, which
//! is exactly what the key design in [crate::keys] is built around.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::Error;

/// A raw record in the table: composite key plus JSON payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// The partition key.
    pub pk: String,
    /// The sort key.
    pub sk: String,
    /// The record payload as a JSON string.
    pub payload: String,
}

/// One page of a partition scan.
#[derive(Debug, PartialEq)]
pub struct Page {
    /// The items scanned, in sort-key order.
    pub items: Vec<Item>,
    /// The sort key of the last item scanned, if the scan filled its limit.
    ///
    /// Pass this back as `start_after` to resume the scan.
    pub last_key: Option<String>,
}

/// The direction of a sort-key scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Sort in order of increasing sort key.
    Ascending,
    /// Sort in order of decreasing sort key.
    Descending,
}

/// Create the record table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS record (
                pk TEXT NOT NULL,
                sk TEXT NOT NULL,
                payload TEXT NOT NULL,
                PRIMARY KEY (pk, sk)
                )",
        (),
    )?;

    Ok(())
}

/// A handle to the single-table store.
#[derive(Debug, Clone)]
pub struct SingleTable {
    connection: Arc<Mutex<Connection>>,
}

impl SingleTable {
    /// Create a store handle from a shared SQLite connection.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|_| Error::DatabaseLock)
    }

    /// Write `item`, overwriting any existing record with the same key.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if an SQL related error occurred.
    pub fn put(&self, item: &Item) -> Result<(), Error> {
        self.lock()?.execute(
            "INSERT INTO record (pk, sk, payload) VALUES (?1, ?2, ?3)
                ON CONFLICT (pk, sk) DO UPDATE SET payload = excluded.payload",
            (&item.pk, &item.sk, &item.payload),
        )?;

        Ok(())
    }

    /// Point read by exact key.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if an SQL related error occurred.
    pub fn get(&self, pk: &str, sk: &str) -> Result<Option<Item>, Error> {
        let connection = self.lock()?;
        let result = connection
            .prepare("SELECT pk, sk, payload FROM record WHERE pk = :pk AND sk = :sk")?
            .query_row(&[(":pk", pk), (":sk", sk)], map_item);

        match result {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    /// Delete the record with the exact key, reporting whether it existed.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if an SQL related error occurred.
    pub fn delete(&self, pk: &str, sk: &str) -> Result<bool, Error> {
        let rows_deleted = self.lock()?.execute(
            "DELETE FROM record WHERE pk = :pk AND sk = :sk",
            &[(":pk", pk), (":sk", sk)],
        )?;

        Ok(rows_deleted > 0)
    }

    /// Scan a partition for sort keys starting with `prefix`.
    ///
    /// `limit` caps the number of items scanned; `start_after` resumes a
    /// previous scan from just past the given sort key.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if an SQL related error occurred.
    pub fn query_prefix(
        &self,
        pk: &str,
        prefix: &str,
        order: SortOrder,
        limit: Option<usize>,
        start_after: Option<&str>,
    ) -> Result<Page, Error> {
        // Prefixes come from the key design and contain no LIKE wildcards.
        self.query(
            pk,
            "sk LIKE :prefix || '%'",
            &[(":prefix", &prefix)],
            order,
            limit,
            start_after,
        )
    }

    /// Scan a partition for sort keys between `start` and `end` inclusive.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if an SQL related error occurred.
    pub fn query_range(
        &self,
        pk: &str,
        start: &str,
        end: &str,
        order: SortOrder,
        limit: Option<usize>,
        start_after: Option<&str>,
    ) -> Result<Page, Error> {
        self.query(
            pk,
            "sk BETWEEN :start AND :end",
            &[(":start", &start), (":end", &end)],
            order,
            limit,
            start_after,
        )
    }

    /// Find the first record in a partition whose sort key starts with
    /// `prefix` and ends with `#<id>`.
    ///
    /// This is how entities with ID-suffixed sort keys (transactions) are
    /// looked up when only the ID is known.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if an SQL related error occurred.
    pub fn find_by_id_suffix(
        &self,
        pk: &str,
        prefix: &str,
        id: &str,
    ) -> Result<Option<Item>, Error> {
        let connection = self.lock()?;
        let result = connection
            .prepare(
                "SELECT pk, sk, payload FROM record
                    WHERE pk = :pk AND sk LIKE :prefix || '%' AND sk LIKE '%#' || :id
                    LIMIT 1",
            )?
            .query_row(&[(":pk", pk), (":prefix", prefix), (":id", id)], map_item);

        match result {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn query(
        &self,
        pk: &str,
        sk_condition: &str,
        sk_params: &[(&str, &dyn rusqlite::ToSql)],
        order: SortOrder,
        limit: Option<usize>,
        start_after: Option<&str>,
    ) -> Result<Page, Error> {
        let (order_clause, resume_condition) = match order {
            SortOrder::Ascending => ("ORDER BY sk ASC", "AND sk > :after"),
            SortOrder::Descending => ("ORDER BY sk DESC", "AND sk < :after"),
        };

        let query = format!(
            "SELECT pk, sk, payload FROM record
                WHERE pk = :pk AND {sk_condition} {} {order_clause} LIMIT :limit",
            if start_after.is_some() {
                resume_condition
            } else {
                ""
            },
        );

        // SQLite treats a negative LIMIT as "no limit".
        let limit_value = limit.map_or(-1i64, |n| n as i64);

        let mut params: Vec<(&str, &dyn rusqlite::ToSql)> =
            vec![(":pk", &pk), (":limit", &limit_value)];
        params.extend_from_slice(sk_params);
        if let Some(after) = start_after.as_ref() {
            params.push((":after", after));
        }

        let connection = self.lock()?;
        let items: Vec<Item> = connection
            .prepare(&query)?
            .query_map(params.as_slice(), map_item)?
            .map(|maybe_item| maybe_item.map_err(Error::from))
            .collect::<Result<_, _>>()?;

        let last_key = match limit {
            Some(limit) if items.len() == limit => items.last().map(|item| item.sk.clone()),
            _ => None,
        };

        Ok(Page { items, last_key })
    }
}

fn map_item(row: &rusqlite::Row) -> Result<Item, rusqlite::Error> {
    Ok(Item {
        pk: row.get(0)?,
        sk: row.get(1)?,
        payload: row.get(2)?,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use super::{Item, SingleTable, SortOrder, initialize};

    fn get_test_store() -> SingleTable {
        let connection =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        initialize(&connection).expect("Could not create record table");

        SingleTable::new(Arc::new(Mutex::new(connection)))
    }

    fn item(pk: &str, sk: &str, payload: &str) -> Item {
        Item {
            pk: pk.to_owned(),
            sk: sk.to_owned(),
            payload: payload.to_owned(),
        }
    }

    #[test]
    fn put_then_get_returns_item() {
        let store = get_test_store();
        let want = item("USER#1", "USER#1", r#"{"name":"foo"}"#);

        store.put(&want).unwrap();
        let got = store.get("USER#1", "USER#1").unwrap();

        assert_eq!(got, Some(want));
    }

    #[test]
    fn get_missing_key_returns_none() {
        let store = get_test_store();

        assert_eq!(store.get("USER#1", "USER#1").unwrap(), None);
    }

    #[test]
    fn put_overwrites_existing_record() {
        let store = get_test_store();
        store.put(&item("USER#1", "BUDGET#2024-01#dining", r#"{"limit":100}"#))
            .unwrap();

        store.put(&item("USER#1", "BUDGET#2024-01#dining", r#"{"limit":250}"#))
            .unwrap();

        let got = store.get("USER#1", "BUDGET#2024-01#dining").unwrap().unwrap();
        assert_eq!(got.payload, r#"{"limit":250}"#);
    }

    #[test]
    fn delete_reports_whether_record_existed() {
        let store = get_test_store();
        store.put(&item("USER#1", "USER#1", "{}")).unwrap();

        assert!(store.delete("USER#1", "USER#1").unwrap());
        assert!(!store.delete("USER#1", "USER#1").unwrap());
    }

    #[test]
    fn query_prefix_returns_only_matching_partition_and_prefix() {
        let store = get_test_store();
        store.put(&item("USER#1", "TRANSACTION#2024-01-01T00:00:00Z#a", "{}"))
            .unwrap();
        store.put(&item("USER#1", "BUDGET#2024-01#dining", "{}")).unwrap();
        store.put(&item("USER#2", "TRANSACTION#2024-01-02T00:00:00Z#b", "{}"))
            .unwrap();

        let page = store
            .query_prefix("USER#1", "TRANSACTION#", SortOrder::Ascending, None, None)
            .unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].sk, "TRANSACTION#2024-01-01T00:00:00Z#a");
        assert_eq!(page.last_key, None);
    }

    #[test]
    fn query_prefix_descending_returns_most_recent_first() {
        let store = get_test_store();
        for (date, id) in [
            ("2024-01-01T00:00:00Z", "a"),
            ("2024-01-03T00:00:00Z", "b"),
            ("2024-01-02T00:00:00Z", "c"),
        ] {
            store
                .put(&item("USER#1", &format!("TRANSACTION#{date}#{id}"), "{}"))
                .unwrap();
        }

        let page = store
            .query_prefix("USER#1", "TRANSACTION#", SortOrder::Descending, None, None)
            .unwrap();

        let sks: Vec<&str> = page.items.iter().map(|i| i.sk.as_str()).collect();
        assert_eq!(
            sks,
            [
                "TRANSACTION#2024-01-03T00:00:00Z#b",
                "TRANSACTION#2024-01-02T00:00:00Z#c",
                "TRANSACTION#2024-01-01T00:00:00Z#a",
            ]
        );
    }

    #[test]
    fn query_prefix_paginates_with_start_after() {
        let store = get_test_store();
        for day in 1..=5 {
            store
                .put(&item(
                    "USER#1",
                    &format!("TRANSACTION#2024-01-0{day}T00:00:00Z#x"),
                    "{}",
                ))
                .unwrap();
        }

        let first_page = store
            .query_prefix("USER#1", "TRANSACTION#", SortOrder::Descending, Some(2), None)
            .unwrap();

        assert_eq!(first_page.items.len(), 2);
        let last_key = first_page.last_key.expect("full page should have a last key");
        assert_eq!(last_key, "TRANSACTION#2024-01-04T00:00:00Z#x");

        let second_page = store
            .query_prefix(
                "USER#1",
                "TRANSACTION#",
                SortOrder::Descending,
                Some(2),
                Some(&last_key),
            )
            .unwrap();

        assert_eq!(second_page.items.len(), 2);
        assert_eq!(second_page.items[0].sk, "TRANSACTION#2024-01-03T00:00:00Z#x");

        let final_page = store
            .query_prefix(
                "USER#1",
                "TRANSACTION#",
                SortOrder::Descending,
                Some(2),
                second_page.last_key.as_deref(),
            )
            .unwrap();

        assert_eq!(final_page.items.len(), 1);
        assert_eq!(final_page.last_key, None);
    }

    #[test]
    fn query_range_is_inclusive_of_bounds() {
        let store = get_test_store();
        for (date, id) in [
            ("2023-12-31T23:59:59Z", "old"),
            ("2024-01-15T00:00:00Z", "mid"),
            ("2024-02-01T00:00:00Z", "new"),
        ] {
            store
                .put(&item("USER#1", &format!("TRANSACTION#{date}#{id}"), "{}"))
                .unwrap();
        }

        let page = store
            .query_range(
                "USER#1",
                "TRANSACTION#2024-01-01T00:00:00.000Z",
                "TRANSACTION#2024-01-31T23:59:59.999Z",
                SortOrder::Descending,
                None,
                None,
            )
            .unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].sk, "TRANSACTION#2024-01-15T00:00:00Z#mid");
    }

    #[test]
    fn find_by_id_suffix_matches_exact_id() {
        let store = get_test_store();
        store
            .put(&item("USER#1", "TRANSACTION#2024-01-15T00:00:00Z#abc-123", "{}"))
            .unwrap();
        store
            .put(&item("USER#1", "TRANSACTION#2024-01-16T00:00:00Z#def-456", "{}"))
            .unwrap();

        let found = store
            .find_by_id_suffix("USER#1", "TRANSACTION#", "abc-123")
            .unwrap()
            .expect("should find the transaction");
        assert_eq!(found.sk, "TRANSACTION#2024-01-15T00:00:00Z#abc-123");

        assert_eq!(
            store
                .find_by_id_suffix("USER#1", "TRANSACTION#", "missing")
                .unwrap(),
            None
        );
    }
}
