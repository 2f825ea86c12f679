use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One episode of a logical queue: the broker `bname` hosted the logical queue
/// on its physical queue `queue_id` during generation `generation`.
///
/// Episodes of a logical queue are append-only. The last one names the leader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogicQueueMappingItem {
    #[serde(rename = "gen")]
    pub generation: i32,
    /// Physical queue id on the hosting broker
    pub queue_id: u32,
    pub bname: String,
    /// Logical offset at which this episode starts
    pub logic_offset: i64,
    pub start_offset: i64,
    /// -1 while the episode is still open
    pub end_offset: i64,
    pub time_of_start: i64,
    pub time_of_end: i64,
}

impl LogicQueueMappingItem {
    /// Creates an open episode starting at logical offset 0
    pub fn new(generation: i32, queue_id: u32, bname: impl Into<String>) -> Self {
        LogicQueueMappingItem {
            generation,
            queue_id,
            bname: bname.into(),
            logic_offset: 0,
            start_offset: 0,
            end_offset: -1,
            time_of_start: -1,
            time_of_end: -1,
        }
    }
}

/// A broker's view of the static topic mapping.
///
/// `hosted_queues` maps a logical queue id to its episode history, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicQueueMappingDetail {
    pub topic: String,
    pub bname: String,
    pub epoch: i64,
    pub total_queues: u32,
    /// Set while the broker holds uncommitted local changes
    #[serde(default)]
    pub dirty: bool,
    #[serde(default)]
    pub hosted_queues: BTreeMap<u32, Vec<LogicQueueMappingItem>>,
}

impl TopicQueueMappingDetail {
    pub fn new(
        topic: impl Into<String>,
        total_queues: u32,
        bname: impl Into<String>,
        epoch: i64,
    ) -> Self {
        TopicQueueMappingDetail {
            topic: topic.into(),
            bname: bname.into(),
            epoch,
            total_queues,
            dirty: false,
            hosted_queues: BTreeMap::new(),
        }
    }

    /// Replaces the episode history of `global_id`
    pub fn put_mapping_info(&mut self, global_id: u32, items: Vec<LogicQueueMappingItem>) {
        self.hosted_queues.insert(global_id, items);
    }

    pub fn mapping_info(&self, global_id: u32) -> Option<&[LogicQueueMappingItem]> {
        self.hosted_queues.get(&global_id).map(Vec::as_slice)
    }
}

/// Broker-local topic configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicConfig {
    pub topic_name: String,
    pub read_queue_nums: u32,
    pub write_queue_nums: u32,
}

impl TopicConfig {
    pub fn new(topic_name: impl Into<String>) -> Self {
        TopicConfig {
            topic_name: topic_name.into(),
            read_queue_nums: 0,
            write_queue_nums: 0,
        }
    }
}

/// A broker's topic configuration together with its static topic mapping,
/// if the broker has initialized one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicConfigAndQueueMapping {
    pub topic_config: TopicConfig,
    pub mapping_detail: Option<TopicQueueMappingDetail>,
}

impl TopicConfigAndQueueMapping {
    pub fn new(topic_config: TopicConfig, mapping_detail: Option<TopicQueueMappingDetail>) -> Self {
        TopicConfigAndQueueMapping {
            topic_config,
            mapping_detail,
        }
    }

    pub fn topic_name(&self) -> &str {
        &self.topic_config.topic_name
    }
}

/// The authoritative entry for one logical queue in the merged global view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicQueueMappingOne {
    pub topic: String,
    pub bname: String,
    pub global_id: u32,
    pub items: Vec<LogicQueueMappingItem>,
}

impl TopicQueueMappingOne {
    pub fn new(
        topic: impl Into<String>,
        bname: impl Into<String>,
        global_id: u32,
        items: Vec<LogicQueueMappingItem>,
    ) -> Self {
        TopicQueueMappingOne {
            topic: topic.into(),
            bname: bname.into(),
            global_id,
            items,
        }
    }

    /// The current leader episode
    pub fn leader_item(&self) -> Option<&LogicQueueMappingItem> {
        self.items.last()
    }
}
