use std::collections::VecDeque;

use log::warn;
use mm_core::{Tick, VehicleIndex};
use rustc_hash::FxHashSet;

use crate::error::{FleetError, FleetResult};

/// Fixed-capacity FIFO queue of parked vehicles, each tagged with its
/// enqueue tick.  Membership is tracked in a hash set so duplicate inserts
/// and removals by identity are O(1) checks.
#[derive(Debug)]
pub struct Depot {
    name:     String,
    capacity: usize,
    queue:    VecDeque<(VehicleIndex, Tick)>,
    members:  FxHashSet<VehicleIndex>,
}

impl Depot {
    pub fn new(name: &str, capacity: usize) -> Self {
        Self {
            name: name.to_owned(),
            capacity,
            queue: VecDeque::with_capacity(capacity),
            members: FxHashSet::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn contains(&self, vehicle: VehicleIndex) -> bool {
        self.members.contains(&vehicle)
    }

    /// Enqueue a vehicle.  A vehicle already present is a logged no-op
    /// (`Ok(false)`); a full depot is `CapacityExceeded` with the queue
    /// unchanged.
    pub fn add_vehicle(&mut self, vehicle: VehicleIndex, tick: Tick) -> FleetResult<bool> {
        if self.members.contains(&vehicle) {
            warn!("depot {}: vehicle {vehicle} is already queued", self.name);
            return Ok(false);
        }
        if self.queue.len() == self.capacity {
            return Err(FleetError::CapacityExceeded {
                depot:    self.name.clone(),
                capacity: self.capacity,
            });
        }
        self.queue.push_back((vehicle, tick));
        self.members.insert(vehicle);
        Ok(true)
    }

    /// Remove a specific vehicle, returning it with its enqueue tick.
    pub fn remove_vehicle(&mut self, vehicle: VehicleIndex) -> FleetResult<(VehicleIndex, Tick)> {
        match self.queue.iter().position(|&(v, _)| v == vehicle) {
            Some(i) => {
                self.members.remove(&vehicle);
                // remove() preserves the FIFO order of the rest.
                Ok(self.queue.remove(i).ok_or(FleetError::VehicleNotFound(vehicle))?)
            }
            None => Err(FleetError::VehicleNotFound(vehicle)),
        }
    }

    /// Dequeue the oldest vehicle.
    pub fn pop_first(&mut self) -> Option<(VehicleIndex, Tick)> {
        let entry = self.queue.pop_front()?;
        self.members.remove(&entry.0);
        Some(entry)
    }

    /// Peek at the oldest vehicle without removing it.
    pub fn get_first_vehicle(&self) -> Option<(VehicleIndex, Tick)> {
        self.queue.front().copied()
    }
}
