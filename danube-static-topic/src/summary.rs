use crate::mapping::{TopicConfigAndQueueMapping, TopicQueueMappingDetail};

/// Returns the highest epoch and the highest total queue number seen across the
/// mapping details. Each maximum is taken independently.
///
/// No validation happens here; an empty input yields `(-1, 0)`.
pub fn find_max_epoch_and_queue_num<'a, I>(mapping_details: I) -> (i64, u32)
where
    I: IntoIterator<Item = &'a TopicQueueMappingDetail>,
{
    mapping_details
        .into_iter()
        .fold((-1, 0), |(epoch, queue_num), detail| {
            (epoch.max(detail.epoch), queue_num.max(detail.total_queues))
        })
}

/// Collects the mapping details of the brokers that have one
pub fn mapping_details_from_configs<'a, I>(configs: I) -> Vec<TopicQueueMappingDetail>
where
    I: IntoIterator<Item = &'a TopicConfigAndQueueMapping>,
{
    configs
        .into_iter()
        .filter_map(|config| config.mapping_detail.clone())
        .collect()
}
