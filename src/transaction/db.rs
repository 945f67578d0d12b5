//! Database functions for transactions.

use crate::{
    Error,
    keys::{TRANSACTION_PREFIX, transaction_date_bound, transaction_sk, user_pk},
    store::{Item, SingleTable, SortOrder},
    transaction::models::Transaction,
};

fn to_item(transaction: &Transaction) -> Result<Item, Error> {
    let payload = serde_json::to_string(transaction)
        .map_err(|error| Error::PayloadSerialization(error.to_string()))?;

    Ok(Item {
        pk: user_pk(&transaction.user_id),
        sk: transaction_sk(&transaction.date, &transaction.id),
        payload,
    })
}

fn from_item(item: &Item) -> Result<Transaction, Error> {
    serde_json::from_str(&item.payload)
        .map_err(|error| Error::PayloadSerialization(error.to_string()))
}

/// Write `transaction` at its date-ordered sort key.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn insert_transaction(transaction: &Transaction, store: &SingleTable) -> Result<(), Error> {
    store.put(&to_item(transaction)?)
}

/// Overwrite the record at `sk`, keeping the original sort key even when the
/// transaction's date changed.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn update_transaction_at(
    sk: &str,
    transaction: &Transaction,
    store: &SingleTable,
) -> Result<(), Error> {
    let payload = serde_json::to_string(transaction)
        .map_err(|error| Error::PayloadSerialization(error.to_string()))?;

    store.put(&Item {
        pk: user_pk(&transaction.user_id),
        sk: sk.to_owned(),
        payload,
    })
}

/// Look up one of `user_id`'s transactions by its ID.
///
/// The sort key starts with the date, so this scans the transaction prefix
/// for the ID suffix rather than doing a point read. Returns the record's
/// sort key alongside the transaction so callers can update it in place.
///
/// # Errors
///
/// Returns [Error::NotFound] if the user has no such transaction.
pub fn get_transaction(
    user_id: &str,
    transaction_id: &str,
    store: &SingleTable,
) -> Result<(String, Transaction), Error> {
    let item = store
        .find_by_id_suffix(&user_pk(user_id), TRANSACTION_PREFIX, transaction_id)?
        .ok_or(Error::NotFound)?;

    let transaction = from_item(&item)?;

    Ok((item.sk, transaction))
}

/// Delete one of `user_id`'s transactions by its ID.
///
/// # Errors
///
/// Returns [Error::NotFound] if the user has no such transaction.
pub fn delete_transaction(
    user_id: &str,
    transaction_id: &str,
    store: &SingleTable,
) -> Result<(), Error> {
    let item = store
        .find_by_id_suffix(&user_pk(user_id), TRANSACTION_PREFIX, transaction_id)?
        .ok_or(Error::NotFound)?;

    if !store.delete(&item.pk, &item.sk)? {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// One page of a user's transactions, most recent first.
#[derive(Debug)]
pub struct TransactionPage {
    /// The transactions scanned, in descending date order.
    pub transactions: Vec<Transaction>,
    /// The sort key to resume the scan from, if the page filled its limit.
    pub last_key: Option<String>,
}

/// Scan `user_id`'s transactions in descending date order.
///
/// `start_date` and `end_date` bound the scan by the date encoded in the
/// sort key; either may be omitted. `limit` caps how many records are
/// scanned, before any in-memory filtering the caller applies.
///
/// # Errors
///
/// Returns an error if the scan or deserialization fails.
pub fn list_transactions(
    user_id: &str,
    start_date: Option<&str>,
    end_date: Option<&str>,
    limit: usize,
    start_after: Option<&str>,
    store: &SingleTable,
) -> Result<TransactionPage, Error> {
    let pk = user_pk(user_id);

    let page = match (start_date, end_date) {
        (None, None) => store.query_prefix(
            &pk,
            TRANSACTION_PREFIX,
            SortOrder::Descending,
            Some(limit),
            start_after,
        )?,
        (start, end) => {
            let lower = transaction_date_bound(start.unwrap_or(""));
            let upper = transaction_date_bound(&format!(
                "{}\u{10FFFF}",
                end.unwrap_or(crate::keys::MAX_DATE)
            ));
            store.query_range(
                &pk,
                &lower,
                &upper,
                SortOrder::Descending,
                Some(limit),
                start_after,
            )?
        }
    };

    let transactions = page
        .items
        .iter()
        .map(from_item)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TransactionPage {
        transactions,
        last_key: page.last_key,
    })
}

/// All of `user_id`'s transactions dated within `[start, end]`, unpaged.
///
/// Used for budget progress, which needs every transaction in the month.
///
/// # Errors
///
/// Returns an error if the scan or deserialization fails.
pub fn transactions_in_range(
    user_id: &str,
    start: &str,
    end: &str,
    store: &SingleTable,
) -> Result<Vec<Transaction>, Error> {
    let page = store.query_range(
        &user_pk(user_id),
        &transaction_date_bound(start),
        &transaction_date_bound(&format!("{end}\u{10FFFF}")),
        SortOrder::Ascending,
        None,
        None,
    )?;

    page.items.iter().map(from_item).collect()
}
