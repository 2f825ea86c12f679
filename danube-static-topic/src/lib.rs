//! # Danube Static Topic
//!
//! Queue mapping management for static topics, whose logical queues are spread over
//! brokers through an explicit, epoch-versioned mapping instead of per-broker assignment.
//!
//! ## Core Responsibilities
//!
//! - **Consistency Validation**: Checks that the brokers agree on topic, epoch and queue number
//! - **Global View**: Merges per-broker mappings into one leader per logical queue
//! - **Allocation**: Assigns new logical queues to the least loaded brokers
//! - **Planning**: Builds and stages the plan that creates or grows a static topic
//!
//! All operations are synchronous computations over in-memory values. Failures are
//! reported through [`StaticTopicError`], one variant per misconfiguration kind.

pub mod allocator;
pub mod config;
mod errors;
pub mod global_mapping;
pub mod mapping;
pub mod remapping;
pub mod summary;
pub mod validation;

// Re-export main types
pub use allocator::MappingAllocator;
pub use config::StaticTopicConfig;
pub use errors::{Result, StaticTopicError};
pub use global_mapping::{build_mapping_items, leader_broker, leader_item};
pub use mapping::{
    LogicQueueMappingItem, TopicConfig, TopicConfigAndQueueMapping, TopicQueueMappingDetail,
    TopicQueueMappingOne,
};
pub use remapping::{
    create_topic_config_mapping, write_to_temp, RemappingType, TopicRemappingDetailWrapper,
};
pub use summary::{find_max_epoch_and_queue_num, mapping_details_from_configs};
pub use validation::validate_consistence;
