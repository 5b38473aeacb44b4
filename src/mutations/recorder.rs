// src/mutations/recorder.rs

//! Turns mutations into history entries. Writes only through the unit of
//! work it is handed, so an entry commits or rolls back with its mutation.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::history::insert_history;
use crate::db::UnitOfWork;
use crate::domain::diff::Diff;
use crate::domain::{Actor, Buyer, HistoryEntry, HistoryPayload};
use crate::errors::ServerError;

/// Exactly one CREATE entry holding the full stored snapshot.
pub fn record_creation(
    uow: &UnitOfWork<'_>,
    buyer: &Buyer,
    actor: &Actor,
) -> Result<HistoryEntry, ServerError> {
    let entry = HistoryEntry {
        id: Uuid::new_v4().to_string(),
        buyer_id: buyer.id.clone(),
        changed_by: actor.user_id.clone(),
        changed_at: buyer.updated_at,
        diff: HistoryPayload::Create {
            new_values: Box::new(buyer.clone()),
        },
    };
    insert_history(uow.conn(), &entry)?;
    log::debug!("recorded {} for buyer {}", entry.diff.action(), entry.buyer_id);
    Ok(entry)
}

/// One UPDATE entry if anything changed, otherwise nothing at all.
pub fn record_update(
    uow: &UnitOfWork<'_>,
    buyer_id: &str,
    actor: &Actor,
    diff: Diff,
    changed_at: DateTime<Utc>,
) -> Result<Option<HistoryEntry>, ServerError> {
    if diff.is_empty() {
        return Ok(None);
    }

    let entry = HistoryEntry {
        id: Uuid::new_v4().to_string(),
        buyer_id: buyer_id.to_string(),
        changed_by: actor.user_id.clone(),
        changed_at,
        diff: HistoryPayload::Update { changes: diff },
    };
    insert_history(uow.conn(), &entry)?;
    Ok(Some(entry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::buyers::insert_buyer;
    use crate::db::connection::test_support::{insert_user, memory_conn};
    use crate::db::history::{count_history, recent_history};
    use crate::domain::diff::{compute_diff, FieldChange};
    use crate::domain::fixtures::{actor, sample_input};
    use crate::domain::timestamp;

    #[test]
    fn creation_entry_snapshots_the_stored_buyer() {
        let mut conn = memory_conn();
        insert_user(&conn, "u1", "USER");

        let uow = UnitOfWork::begin(&mut conn).unwrap();
        let now = timestamp::from_millis(1_700_000_000_000).unwrap();
        let buyer = insert_buyer(uow.conn(), "b1", "u1", &sample_input().normalize(), now).unwrap();
        let entry = record_creation(&uow, &buyer, &actor("u1")).unwrap();
        uow.commit().unwrap();

        assert_eq!(entry.changed_at, buyer.updated_at);
        let stored = recent_history(&conn, "b1", 5).unwrap();
        assert_eq!(stored, vec![entry]);
        match &stored[0].diff {
            HistoryPayload::Create { new_values } => assert_eq!(**new_values, buyer),
            other => panic!("expected CREATE, got {other:?}"),
        }
    }

    #[test]
    fn empty_diff_writes_nothing() {
        let mut conn = memory_conn();
        insert_user(&conn, "u1", "USER");
        let now = timestamp::from_millis(1_700_000_000_000).unwrap();

        let uow = UnitOfWork::begin(&mut conn).unwrap();
        insert_buyer(uow.conn(), "b1", "u1", &sample_input().normalize(), now).unwrap();
        let written = record_update(&uow, "b1", &actor("u1"), Diff::new(), now).unwrap();
        uow.commit().unwrap();

        assert!(written.is_none());
        assert_eq!(count_history(&conn, "b1").unwrap(), 0);
    }

    #[test]
    fn non_empty_diff_writes_one_update_entry() {
        let mut conn = memory_conn();
        insert_user(&conn, "u1", "USER");
        let now = timestamp::from_millis(1_700_000_000_000).unwrap();
        let before = sample_input().normalize();
        let mut after = before.clone();
        after.full_name = "Asha Sharma".into();

        let uow = UnitOfWork::begin(&mut conn).unwrap();
        insert_buyer(uow.conn(), "b1", "u1", &before, now).unwrap();
        let entry = record_update(&uow, "b1", &actor("u1"), compute_diff(&before, &after), now)
            .unwrap()
            .unwrap();
        uow.commit().unwrap();

        match entry.diff {
            HistoryPayload::Update { changes } => {
                assert_eq!(changes.len(), 1);
                assert!(matches!(changes["fullName"], FieldChange::Changed { .. }));
            }
            other => panic!("expected UPDATE, got {other:?}"),
        }
        assert_eq!(count_history(&conn, "b1").unwrap(), 1);
    }
}
