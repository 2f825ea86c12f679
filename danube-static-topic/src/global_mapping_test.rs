//! Unit Tests for the Global Mapping Builder
//!
//! The builder decides which broker is authoritative for each logical queue when
//! brokers report overlapping (and possibly stale) mappings.

use super::*;

const TOPIC: &str = "T";

fn episode(bname: &str, queue_id: u32) -> LogicQueueMappingItem {
    LogicQueueMappingItem::new(0, queue_id, bname)
}

fn detail(bname: &str, epoch: i64, total_queues: u32) -> TopicQueueMappingDetail {
    TopicQueueMappingDetail::new(TOPIC, total_queues, bname, epoch)
}

/// Broker A (epoch 2) leads 0 and 1, broker B (epoch 1) leads 1 and 2.
fn conflicting_details() -> Vec<TopicQueueMappingDetail> {
    let mut broker_a = detail("broker-a", 2, 3);
    broker_a.put_mapping_info(0, vec![episode("broker-a", 0)]);
    broker_a.put_mapping_info(1, vec![episode("broker-b", 0), episode("broker-a", 1)]);

    let mut broker_b = detail("broker-b", 1, 3);
    broker_b.put_mapping_info(1, vec![episode("broker-b", 0)]);
    broker_b.put_mapping_info(2, vec![episode("broker-b", 1)]);

    // lower epoch first, the builder must reorder
    vec![broker_b, broker_a]
}

#[test]
fn test_leader_is_last_episode() {
    let items = vec![episode("broker-x", 0), episode("broker-y", 3)];

    assert_eq!(leader_broker(&items), Some("broker-y"));
    assert_eq!(leader_item(&items).map(|i| i.queue_id), Some(3));

    let longer = vec![
        episode("broker-x", 0),
        episode("broker-y", 1),
        episode("broker-x", 2),
        episode("broker-y", 3),
    ];
    assert_eq!(leader_broker(&longer), Some("broker-y"));
    assert_eq!(leader_broker(&[]), None);
}

/// **Test:** Higher Epoch Wins Under Replace
///
/// **Reason:** Both brokers claim leadership of queue 1. The claim from the fresher
/// snapshot must survive, never the stale one.
///
/// **Expectation:** Queue 1 is owned by broker A (epoch 2), with A's full episode history.
#[test]
fn test_replace_keeps_higher_epoch_leader() {
    let mut details = conflicting_details();

    let global = build_mapping_items(&mut details, true, true).unwrap();

    assert_eq!(global.len(), 3);
    assert_eq!(global[&0].bname, "broker-a");
    assert_eq!(global[&1].bname, "broker-a");
    assert_eq!(global[&1].items.len(), 2);
    assert_eq!(global[&2].bname, "broker-b");
    assert_eq!(global[&2].topic, TOPIC);
    // sorted by epoch descending in place
    assert_eq!(details[0].bname, "broker-a");
}

#[test]
fn test_duplicate_leader_fails_without_replace() {
    let mut details = conflicting_details();

    let err = build_mapping_items(&mut details, false, false).unwrap_err();

    match err {
        StaticTopicError::DuplicateLeader {
            queue_id,
            existing,
            claimant,
        } => {
            assert_eq!(queue_id, 1);
            assert_eq!(existing, "broker-a");
            assert_eq!(claimant, "broker-b");
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// **Test:** Non-Leader Copies Are Ignored
///
/// **Reason:** A broker keeps the history of queues it no longer leads; those
/// copies must not be treated as leadership claims.
///
/// **Expectation:** No duplicate error even with `replace` disabled.
#[test]
fn test_non_leader_entries_are_skipped() {
    let mut broker_a = detail("broker-a", 3, 2);
    broker_a.put_mapping_info(0, vec![episode("broker-a", 0)]);
    // broker-a still holds the old history of queue 1, led by broker-b now
    broker_a.put_mapping_info(1, vec![episode("broker-a", 1), episode("broker-b", 0)]);

    let mut broker_b = detail("broker-b", 3, 2);
    broker_b.put_mapping_info(1, vec![episode("broker-a", 1), episode("broker-b", 0)]);

    let mut details = vec![broker_a, broker_b];
    let global = build_mapping_items(&mut details, false, true).unwrap();

    assert_eq!(global.len(), 2);
    assert_eq!(global[&1].bname, "broker-b");
}

/// **Test:** Completeness Check
///
/// **Reason:** A topic declaring 3 queues with only ids {0, 2} led has lost queue 1.
///
/// **Expectation:** Fails when checking, returns the partial view untouched otherwise.
#[test]
fn test_incomplete_hosted_queues() {
    let mut broker_a = detail("broker-a", 1, 3);
    broker_a.put_mapping_info(0, vec![episode("broker-a", 0)]);
    broker_a.put_mapping_info(2, vec![episode("broker-a", 1)]);
    let mut details = vec![broker_a];

    let err = build_mapping_items(&mut details.clone(), false, true).unwrap_err();
    assert!(matches!(
        err,
        StaticTopicError::IncompleteHostedQueues {
            expected: 3,
            actual: 2,
            first_missing: Some(1),
        }
    ));

    let global = build_mapping_items(&mut details, false, false).unwrap();
    assert_eq!(global.len(), 2);
    assert!(global.contains_key(&0));
    assert!(global.contains_key(&2));
}

#[test]
fn test_ids_beyond_total_queues_fail_check() {
    let mut broker_a = detail("broker-a", 1, 1);
    broker_a.put_mapping_info(0, vec![episode("broker-a", 0)]);
    broker_a.put_mapping_info(5, vec![episode("broker-a", 1)]);
    let mut details = vec![broker_a];

    let err = build_mapping_items(&mut details, false, true).unwrap_err();

    assert!(matches!(
        err,
        StaticTopicError::IncompleteHostedQueues {
            expected: 1,
            actual: 2,
            first_missing: None,
        }
    ));
}

#[test]
fn test_empty_episode_list_is_rejected() {
    let mut broker_a = detail("broker-a", 1, 1);
    broker_a.put_mapping_info(0, Vec::new());
    let mut details = vec![broker_a];

    let err = build_mapping_items(&mut details, true, false).unwrap_err();

    assert!(matches!(
        err,
        StaticTopicError::EmptyMappingItems { queue_id: 0, .. }
    ));
}
