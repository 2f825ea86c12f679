use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::errors::{Result, StaticTopicError};
use crate::mapping::{LogicQueueMappingItem, TopicQueueMappingDetail, TopicQueueMappingOne};

/// The leader episode of a logical queue is the last one recorded
pub fn leader_item(items: &[LogicQueueMappingItem]) -> Option<&LogicQueueMappingItem> {
    items.last()
}

/// Name of the broker leading the logical queue
pub fn leader_broker(items: &[LogicQueueMappingItem]) -> Option<&str> {
    leader_item(items).map(|item| item.bname.as_str())
}

/// Merges the per-broker mappings into one view of logical queue id -> leader entry.
///
/// ## Algorithm:
/// 1. Sort the details by epoch, highest first, so fresher claims are seen first
/// 2. For each hosted queue, only the broker leading it (last episode) may claim it
/// 3. A second claim on an already claimed queue id is an error, unless `replace`
///    is set, in which case the stale claim is dropped and the first one kept
/// 4. With `check_consistence`, ids `0..max(total_queues)` must all be claimed
///
/// The caller's list is left sorted by epoch descending.
pub fn build_mapping_items(
    mapping_details: &mut [TopicQueueMappingDetail],
    replace: bool,
    check_consistence: bool,
) -> Result<BTreeMap<u32, TopicQueueMappingOne>> {
    mapping_details.sort_by(|a, b| b.epoch.cmp(&a.epoch));

    let mut max_num: u32 = 0;
    let mut global_id_map: BTreeMap<u32, TopicQueueMappingOne> = BTreeMap::new();

    for detail in mapping_details.iter() {
        max_num = max_num.max(detail.total_queues);

        for (&global_id, items) in &detail.hosted_queues {
            let leader = leader_broker(items).ok_or_else(|| StaticTopicError::EmptyMappingItems {
                broker: detail.bname.clone(),
                queue_id: global_id,
            })?;

            if leader != detail.bname {
                debug!(
                    broker = %detail.bname,
                    queue_id = global_id,
                    leader = %leader,
                    "skipping queue not led by this broker"
                );
                continue;
            }

            if let Some(existing) = global_id_map.get(&global_id) {
                if !replace {
                    return Err(StaticTopicError::DuplicateLeader {
                        queue_id: global_id,
                        existing: existing.bname.clone(),
                        claimant: detail.bname.clone(),
                    });
                }
                warn!(
                    broker = %detail.bname,
                    epoch = detail.epoch,
                    queue_id = global_id,
                    kept = %existing.bname,
                    "discarding stale leadership claim"
                );
                continue;
            }

            global_id_map.insert(
                global_id,
                TopicQueueMappingOne::new(
                    detail.topic.clone(),
                    detail.bname.clone(),
                    global_id,
                    items.clone(),
                ),
            );
        }
    }

    if check_consistence {
        check_complete(&global_id_map, max_num)?;
    }

    Ok(global_id_map)
}

fn check_complete(
    global_id_map: &BTreeMap<u32, TopicQueueMappingOne>,
    expected: u32,
) -> Result<()> {
    let first_missing = (0..expected).find(|id| !global_id_map.contains_key(id));
    if first_missing.is_some() || global_id_map.len() != expected as usize {
        return Err(StaticTopicError::IncompleteHostedQueues {
            expected,
            actual: global_id_map.len(),
            first_missing,
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "global_mapping_test.rs"]
mod global_mapping_test;
