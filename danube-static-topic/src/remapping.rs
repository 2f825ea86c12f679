use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;
use tracing::info;

use crate::allocator::MappingAllocator;
use crate::config::StaticTopicConfig;
use crate::errors::{Result, StaticTopicError};
use crate::global_mapping::build_mapping_items;
use crate::mapping::{
    LogicQueueMappingItem, TopicConfig, TopicConfigAndQueueMapping, TopicQueueMappingDetail,
};
use crate::summary::mapping_details_from_configs;
use crate::validation::validate_consistence;

/// Kind of static topic change carried by a plan.
///
/// This crate only plans `Create`; `Remapping` plans come from the queue migration
/// flow and are read back here through [`TopicRemappingDetailWrapper::from_json`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RemappingType {
    Create,
    Remapping,
}

/// A static topic plan, ready to be delivered to the brokers.
///
/// `broker_config_map` holds the full target state of every involved broker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicRemappingDetailWrapper {
    pub topic: String,
    #[serde(rename = "type")]
    pub plan_type: RemappingType,
    pub epoch: i64,
    pub broker_config_map: BTreeMap<String, TopicConfigAndQueueMapping>,
    /// Brokers joining the topic with this plan
    #[serde(default)]
    pub broker_to_map_in: BTreeSet<String>,
    /// Brokers leaving the topic with this plan, only set on `Remapping` plans
    #[serde(default)]
    pub broker_to_map_out: BTreeSet<String>,
}

impl TopicRemappingDetailWrapper {
    pub fn new(
        topic: impl Into<String>,
        plan_type: RemappingType,
        epoch: i64,
        broker_config_map: BTreeMap<String, TopicConfigAndQueueMapping>,
    ) -> Self {
        TopicRemappingDetailWrapper {
            topic: topic.into(),
            plan_type,
            epoch,
            broker_config_map,
            broker_to_map_in: BTreeSet::new(),
            broker_to_map_out: BTreeSet::new(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }
}

/// Plans the creation (or growth) of a static topic to `queue_num` logical queues
/// spread over `target_brokers`.
///
/// ## Process:
/// 1. **Baseline**: the existing broker mappings must be consistent and complete;
///    their leaders seed the allocator
/// 2. **Allocate**: new logical queues go to the least loaded target brokers
/// 3. **Materialize**: each new queue gets a fresh physical queue on its broker and a
///    single episode mapping
/// 4. **Stamp**: every broker mapping moves to the new epoch and queue number
///
/// The resulting map is validated again before being returned.
pub fn create_topic_config_mapping(
    topic: &str,
    queue_num: u32,
    target_brokers: &BTreeSet<String>,
    mut broker_config_map: BTreeMap<String, TopicConfigAndQueueMapping>,
    config: &StaticTopicConfig,
) -> Result<TopicRemappingDetailWrapper> {
    let mut id_to_broker: BTreeMap<u32, String> = BTreeMap::new();
    let mut broker_num_map: BTreeMap<String, u32> = BTreeMap::new();
    let mut max_epoch: i64 = -1;
    let mut current_num: u32 = 0;

    if let Some((epoch, total_queues)) = validate_consistence(&broker_config_map)? {
        max_epoch = epoch;
        current_num = total_queues;

        let mut details = mapping_details_from_configs(broker_config_map.values());
        for (global_id, mapping_one) in build_mapping_items(&mut details, false, true)? {
            *broker_num_map.entry(mapping_one.bname.clone()).or_insert(0) += 1;
            id_to_broker.insert(global_id, mapping_one.bname);
        }
    }

    for (broker, config_mapping) in &broker_config_map {
        if config_mapping.topic_name() != topic {
            return Err(StaticTopicError::TopicDivergence {
                broker: broker.clone(),
                expected: topic.to_string(),
                found: config_mapping.topic_name().to_string(),
            });
        }
        if !target_brokers.contains(broker) {
            return Err(StaticTopicError::BrokerNotInTarget {
                broker: broker.clone(),
            });
        }
    }

    if queue_num < current_num {
        return Err(StaticTopicError::CannotShrink {
            current: current_num,
            requested: queue_num,
        });
    }

    for broker in target_brokers {
        broker_num_map.entry(broker.clone()).or_insert(0);
    }

    let mut allocator = match config.allocator_seed {
        Some(seed) => MappingAllocator::with_seed(id_to_broker, broker_num_map, seed),
        None => MappingAllocator::new(id_to_broker, broker_num_map),
    };
    allocator.up_to_num(queue_num)?;
    let (id_to_broker, _) = allocator.into_parts();

    let new_epoch = (max_epoch + config.epoch_step).max(now_millis());
    let existing_brokers: BTreeSet<String> = broker_config_map.keys().cloned().collect();

    for (&global_id, broker) in id_to_broker.range(current_num..) {
        let config_mapping = broker_config_map
            .entry(broker.clone())
            .or_insert_with(|| TopicConfigAndQueueMapping::new(TopicConfig::new(topic), None));

        let queue_id = config_mapping.topic_config.write_queue_nums;
        config_mapping.topic_config.write_queue_nums += 1;
        config_mapping.topic_config.read_queue_nums += 1;

        config_mapping
            .mapping_detail
            .get_or_insert_with(|| TopicQueueMappingDetail::new(topic, 0, broker.clone(), -1))
            .put_mapping_info(
                global_id,
                vec![LogicQueueMappingItem::new(0, queue_id, broker.clone())],
            );
    }

    for detail in broker_config_map
        .values_mut()
        .filter_map(|config_mapping| config_mapping.mapping_detail.as_mut())
    {
        detail.epoch = new_epoch;
        detail.total_queues = queue_num;
    }

    validate_consistence(&broker_config_map)?;
    let mut details = mapping_details_from_configs(broker_config_map.values());
    build_mapping_items(&mut details, false, true)?;

    let broker_to_map_in: BTreeSet<String> = broker_config_map
        .keys()
        .filter(|broker| !existing_brokers.contains(*broker))
        .cloned()
        .collect();

    info!(
        topic = %topic,
        queue_num,
        epoch = new_epoch,
        brokers = broker_config_map.len(),
        "planned the static topic mapping"
    );

    let mut wrapper = TopicRemappingDetailWrapper::new(
        topic,
        RemappingType::Create,
        new_epoch,
        broker_config_map,
    );
    wrapper.broker_to_map_in = broker_to_map_in;
    Ok(wrapper)
}

/// Stages the plan as `<topic>-<epoch>-<suffix>` in the configured staging directory
/// and returns the written path.
///
/// Path separators in the topic name are replaced so the file stays in the directory.
pub fn write_to_temp(
    wrapper: &TopicRemappingDetailWrapper,
    suffix: &str,
    config: &StaticTopicConfig,
) -> Result<PathBuf> {
    let data = wrapper.to_json()?;
    let topic = wrapper.topic.trim_start_matches('/').replace(['/', '\\'], "_");
    let path = config
        .staging_dir()
        .join(format!("{}-{}-{}", topic, wrapper.epoch, suffix));

    fs::write(&path, data).map_err(|source| StaticTopicError::StagingWrite {
        path: path.clone(),
        source,
    })?;

    info!(
        topic = %wrapper.topic,
        path = %path.display(),
        "staged the static topic plan"
    );
    Ok(path)
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "remapping_test.rs"]
mod remapping_test;
