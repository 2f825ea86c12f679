use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::errors::{Result, StaticTopicError};

/// MappingAllocator - assigns new logical queue ids of a static topic to brokers
///
/// The allocator owns its copy of the cluster state for the duration of one growth
/// operation: how many queues each broker leads and which broker leads each id.
///
/// ## Selection:
/// Brokers tied for the lowest queue count form a pool. Ids are handed out by
/// draining the pool from a random starting offset; the pool is recomputed from
/// the current counts only once it is empty. Starting from equal loads this keeps
/// every pair of brokers within one queue of each other.
///
/// The random source is injectable so that plans can be reproduced.
#[derive(Debug)]
pub struct MappingAllocator<R = StdRng> {
    /// Number of queues led by each broker
    broker_num_map: BTreeMap<String, u32>,
    /// Logical queue id -> leading broker
    id_to_broker: BTreeMap<u32, String>,
    /// Brokers tied for the lowest load, not yet used since the last refresh
    least_brokers: Vec<String>,
    current_index: usize,
    rng: R,
}

impl MappingAllocator<StdRng> {
    pub fn new(id_to_broker: BTreeMap<u32, String>, broker_num_map: BTreeMap<String, u32>) -> Self {
        Self::with_rng(id_to_broker, broker_num_map, StdRng::from_entropy())
    }

    pub fn with_seed(
        id_to_broker: BTreeMap<u32, String>,
        broker_num_map: BTreeMap<String, u32>,
        seed: u64,
    ) -> Self {
        Self::with_rng(id_to_broker, broker_num_map, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> MappingAllocator<R> {
    pub fn with_rng(
        id_to_broker: BTreeMap<u32, String>,
        broker_num_map: BTreeMap<String, u32>,
        rng: R,
    ) -> Self {
        MappingAllocator {
            broker_num_map,
            id_to_broker,
            least_brokers: Vec::new(),
            current_index: 0,
            rng,
        }
    }

    /// Grows the assignment up to `max_queue_num` logical queues.
    ///
    /// Ids in `current_size..max_queue_num` without a broker are assigned in
    /// ascending order, where `current_size` is the number of ids already assigned.
    /// Requests that do not grow the topic leave the allocator untouched.
    pub fn up_to_num(&mut self, max_queue_num: u32) -> Result<()> {
        let current_size = self.id_to_broker.len() as u32;
        if max_queue_num <= current_size {
            return Ok(());
        }

        for global_id in current_size..max_queue_num {
            if self.id_to_broker.contains_key(&global_id) {
                continue;
            }
            let broker = self.next_broker()?;
            *self.broker_num_map.entry(broker.clone()).or_insert(0) += 1;
            self.id_to_broker.insert(global_id, broker);
        }

        info!(
            from = current_size,
            to = max_queue_num,
            brokers = self.broker_num_map.len(),
            "allocated static topic queues"
        );
        Ok(())
    }

    pub fn broker_num_map(&self) -> &BTreeMap<String, u32> {
        &self.broker_num_map
    }

    pub fn id_to_broker(&self) -> &BTreeMap<u32, String> {
        &self.id_to_broker
    }

    /// Hands the final (id -> broker, broker -> count) state back to the caller
    pub fn into_parts(self) -> (BTreeMap<u32, String>, BTreeMap<String, u32>) {
        (self.id_to_broker, self.broker_num_map)
    }

    fn next_broker(&mut self) -> Result<String> {
        if self.least_brokers.is_empty() {
            self.fresh_state()?;
        }
        let index = self.current_index % self.least_brokers.len();
        Ok(self.least_brokers.remove(index))
    }

    // Every broker at the lowest load joins the pool, ties included.
    fn fresh_state(&mut self) -> Result<()> {
        let min_num = self
            .broker_num_map
            .values()
            .copied()
            .min()
            .ok_or(StaticTopicError::NoBrokersAvailable)?;

        self.least_brokers = self
            .broker_num_map
            .iter()
            .filter(|&(_, &num)| num == min_num)
            .map(|(broker, _)| broker.clone())
            .collect();
        self.current_index = self.rng.gen_range(0..self.least_brokers.len());

        debug!(
            load = min_num,
            brokers = ?self.least_brokers,
            "refreshed the least loaded brokers"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "allocator_test.rs"]
mod allocator_test;
