use tracing::{debug, warn};

use crate::errors::{Result, StaticTopicError};
use crate::mapping::TopicConfigAndQueueMapping;

/// Checks that every broker hosting the static topic agrees on the topic name,
/// the epoch and the total queue number.
///
/// ## Checks, per broker entry:
/// 1. The mapping detail is present
/// 2. The detail's broker name equals the key it was filed under
/// 3. The detail is not dirty
/// 4. The config topic name equals the detail topic name
/// 5. Topic, epoch and total queues equal the ones of the first entry seen
///
/// ## Returns:
/// - `Ok(None)` if there is nothing to validate
/// - `Ok(Some((epoch, total_queues)))` when all brokers agree
/// - the first violation found otherwise
pub fn validate_consistence<'a, I>(broker_config_map: I) -> Result<Option<(i64, u32)>>
where
    I: IntoIterator<Item = (&'a String, &'a TopicConfigAndQueueMapping)>,
{
    let mut agreed: Option<(&str, i64, u32)> = None;

    for (broker, config_mapping) in broker_config_map {
        let Some(detail) = config_mapping.mapping_detail.as_ref() else {
            warn!(broker = %broker, "static topic mapping is missing");
            return Err(StaticTopicError::MissingMappingDetail {
                broker: broker.clone(),
            });
        };

        if broker != &detail.bname {
            warn!(
                broker = %broker,
                declared = %detail.bname,
                "mapping is filed under another broker"
            );
            return Err(StaticTopicError::BrokerNameMismatch {
                key: broker.clone(),
                declared: detail.bname.clone(),
            });
        }

        if detail.dirty {
            warn!(broker = %broker, topic = %detail.topic, "static topic mapping is dirty");
            return Err(StaticTopicError::DirtyMapping {
                broker: broker.clone(),
            });
        }

        if config_mapping.topic_name() != detail.topic {
            warn!(
                broker = %broker,
                config_topic = %config_mapping.topic_name(),
                mapping_topic = %detail.topic,
                "topic config and mapping disagree on the topic name"
            );
            return Err(StaticTopicError::ConfigTopicMismatch {
                broker: broker.clone(),
                config_topic: config_mapping.topic_name().to_string(),
                mapping_topic: detail.topic.clone(),
            });
        }

        let Some((topic, epoch, total_queues)) = agreed else {
            agreed = Some((detail.topic.as_str(), detail.epoch, detail.total_queues));
            continue;
        };

        if topic != detail.topic {
            warn!(
                broker = %broker,
                topic = %detail.topic,
                expected = %topic,
                "broker topic diverges from the cluster"
            );
            return Err(StaticTopicError::TopicDivergence {
                broker: broker.clone(),
                expected: topic.to_string(),
                found: detail.topic.clone(),
            });
        }

        if epoch != detail.epoch {
            warn!(
                broker = %broker,
                epoch = detail.epoch,
                expected = epoch,
                "broker epoch diverges from the cluster"
            );
            return Err(StaticTopicError::EpochDivergence {
                broker: broker.clone(),
                expected: epoch,
                found: detail.epoch,
            });
        }

        if total_queues != detail.total_queues {
            warn!(
                broker = %broker,
                total_queues = detail.total_queues,
                expected = total_queues,
                "broker queue number diverges from the cluster"
            );
            return Err(StaticTopicError::QueueNumDivergence {
                broker: broker.clone(),
                expected: total_queues,
                found: detail.total_queues,
            });
        }
    }

    let result = agreed.map(|(_, epoch, total_queues)| (epoch, total_queues));
    if let Some((epoch, total_queues)) = result {
        debug!(epoch, total_queues, "static topic mapping is consistent");
    }
    Ok(result)
}

#[cfg(test)]
#[path = "validation_test.rs"]
mod validation_test;
