//! Optimistic list mutations with rollback
//!
//! Delete and mark-as-read mutate local state immediately and issue the
//! backend calls after. Bulk operations dispatch one call per item
//! concurrently; any individual failure rolls the whole optimistic batch
//! back to its pre-mutation snapshot and surfaces a single error for the
//! screen to translate.

use log::warn;
use rayon::prelude::*;

use crate::api::{Api, ApiError};
use crate::models::{Message, MessageId};
use crate::store::UnreadStore;

/// Snapshot of a list taken before an optimistic mutation.
///
/// Tagged confirm/rollback rather than ad hoc copy-mutate-restore, so every
/// list-mutation action follows the same shape.
pub struct OptimisticBatch<T: Clone> {
    snapshot: Vec<T>,
}

impl<T: Clone> OptimisticBatch<T> {
    /// Capture the pre-mutation state of a list
    pub fn begin(list: &[T]) -> Self {
        Self {
            snapshot: list.to_vec(),
        }
    }

    /// Restore the list to its pre-mutation snapshot
    pub fn rollback(self, list: &mut Vec<T>) {
        *list = self.snapshot;
    }

    /// Confirm the mutation, discarding the snapshot
    pub fn commit(self) {}
}

/// Optimistically delete messages from a list.
///
/// The messages are removed locally first, then one delete call per ID is
/// dispatched concurrently. If any call fails the list is restored to its
/// snapshot and the first error is returned.
pub fn delete_messages(
    api: &dyn Api,
    list: &mut Vec<Message>,
    ids: &[MessageId],
) -> Result<(), ApiError> {
    if ids.is_empty() {
        return Ok(());
    }

    let batch = OptimisticBatch::begin(list);
    list.retain(|m| !ids.contains(&m.id));

    let results: Vec<Result<(), ApiError>> =
        ids.par_iter().map(|id| api.delete_message(id)).collect();

    if let Some(err) = results.into_iter().find_map(|r| r.err()) {
        warn!("Delete failed, rolling back {} message(s): {}", ids.len(), err);
        batch.rollback(list);
        return Err(err);
    }

    batch.commit();
    Ok(())
}

/// Optimistically mark messages as read.
///
/// Local read indicators flip first and the IDs enter the unread overlay so
/// unread styling disappears immediately; one read-confirmation call per ID
/// is then dispatched concurrently. Any failure restores the list snapshot.
/// The overlay entries are left in place; the overlay is advisory and the
/// next refetch is authoritative.
pub fn mark_messages_read(
    api: &dyn Api,
    list: &mut Vec<Message>,
    unread: &UnreadStore,
    ids: &[MessageId],
) -> Result<(), ApiError> {
    if ids.is_empty() {
        return Ok(());
    }

    let batch = OptimisticBatch::begin(list);
    for message in list.iter_mut() {
        if ids.contains(&message.id) {
            message.is_read = true;
            unread.mark_read_local(&message.id);
        }
    }

    let results: Vec<Result<(), ApiError>> =
        ids.par_iter().map(|id| api.mark_read(id)).collect();

    if let Some(err) = results.into_iter().find_map(|r| r.err()) {
        warn!("Mark-read failed, rolling back {} message(s): {}", ids.len(), err);
        batch.rollback(list);
        return Err(err);
    }

    batch.commit();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Address, ThreadId, User};
    use chrono::Utc;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Fake backend recording per-ID calls, with optional failure injection
    #[derive(Default)]
    struct FakeApi {
        deleted: Mutex<Vec<String>>,
        marked_read: Mutex<Vec<String>>,
        fail_on: Option<String>,
    }

    impl FakeApi {
        fn failing_on(id: &str) -> Self {
            Self {
                fail_on: Some(id.to_string()),
                ..Self::default()
            }
        }

        fn check(&self, id: &MessageId) -> Result<(), ApiError> {
            if self.fail_on.as_deref() == Some(id.as_str()) {
                return Err(ApiError::Api {
                    status: 404,
                    code: Some("message_not_found".to_string()),
                    message: "gone".to_string(),
                });
            }
            Ok(())
        }
    }

    impl Api for FakeApi {
        fn fetch_me(&self) -> Result<User, ApiError> {
            unimplemented!()
        }
        fn sign_out(&self) -> Result<(), ApiError> {
            Ok(())
        }
        fn verify_pin(&self, _pin: &str) -> Result<(), ApiError> {
            Ok(())
        }
        fn check_in(&self) -> Result<(), ApiError> {
            Ok(())
        }
        fn unread_count(&self) -> Result<u32, ApiError> {
            Ok(0)
        }
        fn delete_message(&self, id: &MessageId) -> Result<(), ApiError> {
            self.check(id)?;
            self.deleted.lock().unwrap().push(id.as_str().to_string());
            Ok(())
        }
        fn mark_read(&self, id: &MessageId) -> Result<(), ApiError> {
            self.check(id)?;
            self.marked_read.lock().unwrap().push(id.as_str().to_string());
            Ok(())
        }
        fn register_push_token(&self, _token: &str) -> Result<(), ApiError> {
            Ok(())
        }
        fn unregister_push_token(&self) -> Result<(), ApiError> {
            Ok(())
        }
    }

    fn make_list() -> Vec<Message> {
        (1..=4)
            .map(|i| {
                Message::builder(MessageId::new(format!("m{}", i)), ThreadId::new("t1"))
                    .sender(Address::new("other@example.com"))
                    .recipients(vec![Address::new("me@example.com")])
                    .subject(format!("Subject {}", i))
                    .body("hello")
                    .sent_at(Utc::now())
                    .build()
            })
            .collect()
    }

    #[test]
    fn test_delete_removes_locally_and_calls_backend_per_id() {
        let api = FakeApi::default();
        let mut list = make_list();
        let ids = vec![MessageId::new("m1"), MessageId::new("m3")];

        delete_messages(&api, &mut list, &ids).unwrap();

        assert_eq!(list.len(), 2);
        assert!(list.iter().all(|m| m.id.as_str() != "m1" && m.id.as_str() != "m3"));

        let deleted: HashSet<String> = api.deleted.lock().unwrap().iter().cloned().collect();
        assert_eq!(deleted.len(), 2);
        assert!(deleted.contains("m1") && deleted.contains("m3"));
    }

    #[test]
    fn test_failed_delete_restores_exact_snapshot() {
        let api = FakeApi::failing_on("m3");
        let mut list = make_list();
        let snapshot = list.clone();
        let ids = vec![MessageId::new("m1"), MessageId::new("m3")];

        let err = delete_messages(&api, &mut list, &ids).unwrap_err();
        assert!(matches!(err, ApiError::Api { .. }));

        // Byte-for-byte equal to the pre-delete state
        assert_eq!(list, snapshot);
    }

    #[test]
    fn test_bulk_mark_read_flips_every_affected_indicator() {
        let api = FakeApi::default();
        let unread = UnreadStore::new();
        let mut list = make_list();
        let ids: Vec<MessageId> = list.iter().map(|m| m.id.clone()).collect();

        mark_messages_read(&api, &mut list, &unread, &ids).unwrap();

        assert!(list.iter().all(|m| m.is_read));
        for id in &ids {
            assert!(unread.is_read_locally(id));
        }

        // Exactly one confirmation call per affected ID
        let calls = api.marked_read.lock().unwrap();
        assert_eq!(calls.len(), ids.len());
        let unique: HashSet<&String> = calls.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_failed_mark_read_rolls_back_batch() {
        let api = FakeApi::failing_on("m2");
        let unread = UnreadStore::new();
        let mut list = make_list();
        let snapshot = list.clone();
        let ids = vec![MessageId::new("m1"), MessageId::new("m2")];

        assert!(mark_messages_read(&api, &mut list, &unread, &ids).is_err());
        assert_eq!(list, snapshot);
    }

    #[test]
    fn test_empty_id_set_is_a_no_op() {
        let api = FakeApi::default();
        let mut list = make_list();
        delete_messages(&api, &mut list, &[]).unwrap();
        assert_eq!(list.len(), 4);
        assert!(api.deleted.lock().unwrap().is_empty());
    }
}
