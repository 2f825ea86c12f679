use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StaticTopicError>;

#[derive(Error, Debug)]
pub enum StaticTopicError {
    #[error("Mapping info should not be absent in broker {broker}")]
    MissingMappingDetail { broker: String },

    #[error("The broker name is not equal: {key} != {declared}")]
    BrokerNameMismatch { key: String, declared: String },

    #[error(
        "The topic name is inconsistent in broker {broker}: config {config_topic} != mapping {mapping_topic}"
    )]
    ConfigTopicMismatch {
        broker: String,
        config_topic: String,
        mapping_topic: String,
    },

    #[error("The mapping info is dirty in broker {broker}")]
    DirtyMapping { broker: String },

    #[error("The topic name does not match {expected} != {found} in broker {broker}")]
    TopicDivergence {
        broker: String,
        expected: String,
        found: String,
    },

    #[error("Epoch does not match {expected} != {found} in broker {broker}")]
    EpochDivergence {
        broker: String,
        expected: i64,
        found: i64,
    },

    #[error("Total queue number does not match {expected} != {found} in broker {broker}")]
    QueueNumDivergence {
        broker: String,
        expected: u32,
        found: u32,
    },

    #[error("The queue id {queue_id} is claimed by both broker {existing} and broker {claimant}")]
    DuplicateLeader {
        queue_id: u32,
        existing: String,
        claimant: String,
    },

    #[error(
        "The total queue number in config does not match the real hosted queues {expected} != {actual}, first missing queue id: {first_missing:?}"
    )]
    IncompleteHostedQueues {
        expected: u32,
        actual: usize,
        first_missing: Option<u32>,
    },

    #[error("Queue id {queue_id} in broker {broker} has no mapping items")]
    EmptyMappingItems { broker: String, queue_id: u32 },

    #[error("No brokers available to allocate queues to")]
    NoBrokersAvailable,

    #[error("Cannot shrink the queue number from {current} to {requested}")]
    CannotShrink { current: u32, requested: u32 },

    #[error("The existing broker {broker} is not in the target brokers")]
    BrokerNotInTarget { broker: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Write file failed {}: {source}", .path.display())]
    StagingWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
