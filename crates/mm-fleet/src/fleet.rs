use log::{debug, warn};
use mm_core::{Mode, TravelerIndex, VehicleIndex};
use mm_flow::FlowMotor;
use mm_graph::MultiLayerGraph;

use crate::error::{FleetError, FleetResult};
use crate::vehicle::{RouteLeg, Vehicle, VehicleState};

/// Registry of every vehicle in one simulation run.
///
/// All reservoir accounting goes through here: assigning a route emits the
/// entry for the first leg, each boundary crossing during `advance_all`
/// emits exactly one exit and one entry, and finishing the route emits the
/// final exit.  Entries and exits therefore always balance.
#[derive(Debug, Default)]
pub struct VehicleFleet {
    vehicles: Vec<Vehicle>,
}

impl VehicleFleet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, mode: Mode, capacity: usize) -> VehicleIndex {
        let id = VehicleIndex(self.vehicles.len() as u32);
        self.vehicles.push(Vehicle::new(id, mode, capacity));
        id
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn vehicle(&self, id: VehicleIndex) -> FleetResult<&Vehicle> {
        self.vehicles.get(id.index()).ok_or(FleetError::VehicleNotFound(id))
    }

    fn vehicle_mut(&mut self, id: VehicleIndex) -> FleetResult<&mut Vehicle> {
        self.vehicles.get_mut(id.index()).ok_or(FleetError::VehicleNotFound(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.iter()
    }

    /// Vehicles currently moving.
    pub fn en_route_count(&self) -> usize {
        self.vehicles.iter().filter(|v| v.state == VehicleState::EnRoute).count()
    }

    /// Put a `Created` vehicle on a route.  Enters the first leg's reservoir.
    pub fn assign_route(
        &mut self,
        id: VehicleIndex,
        route: Vec<RouteLeg>,
        motor: &mut FlowMotor,
    ) -> FleetResult<()> {
        let vehicle = self.vehicle_mut(id)?;
        if vehicle.state != VehicleState::Created {
            return Err(FleetError::InvalidTransition {
                vehicle: id,
                from:    vehicle.state,
                action:  "assign a route",
            });
        }
        if route.is_empty() {
            return Err(FleetError::EmptyRoute(id));
        }
        let mode = vehicle.mode;
        let first = route[0].reservoir;
        vehicle.route = route;
        vehicle.leg = 0;
        vehicle.leg_pos = 0.0;
        vehicle.state = VehicleState::EnRoute;
        if let Some(res) = first {
            motor.vehicle_entered(res, mode);
        }
        Ok(())
    }

    pub fn board(&mut self, id: VehicleIndex, traveler: TravelerIndex) -> FleetResult<()> {
        let vehicle = self.vehicle_mut(id)?;
        if vehicle.passengers.len() >= vehicle.capacity {
            return Err(FleetError::VehicleFull { vehicle: id, capacity: vehicle.capacity });
        }
        vehicle.passengers.push(traveler);
        Ok(())
    }

    pub fn alight(&mut self, id: VehicleIndex, traveler: TravelerIndex) -> FleetResult<()> {
        let vehicle = self.vehicle_mut(id)?;
        match vehicle.passengers.iter().position(|&t| t == traveler) {
            Some(i) => {
                vehicle.passengers.swap_remove(i);
                Ok(())
            }
            None => Err(FleetError::VehicleNotFound(id)),
        }
    }

    /// Retire a vehicle to a depot slot.  Only `Created` or `Completed`
    /// vehicles can park; an en-route vehicle must finish its route first.
    pub fn park(&mut self, id: VehicleIndex) -> FleetResult<()> {
        let vehicle = self.vehicle_mut(id)?;
        match vehicle.state {
            VehicleState::Created | VehicleState::Completed => {
                vehicle.state = VehicleState::Parked;
                Ok(())
            }
            from => Err(FleetError::InvalidTransition { vehicle: id, from, action: "park" }),
        }
    }

    /// Advance every en-route vehicle by `dt_secs` worth of distance at the
    /// current speed of its current link, crossing legs as needed.  Returns
    /// the vehicles that completed their route this tick.
    pub fn advance_all(
        &mut self,
        dt_secs: f64,
        graph: &MultiLayerGraph,
        motor: &mut FlowMotor,
    ) -> Vec<VehicleIndex> {
        let (_, _, speed_col) = graph.flow_columns();
        let mut completed = Vec::new();

        for vehicle in &mut self.vehicles {
            if vehicle.state != VehicleState::EnRoute {
                continue;
            }
            let mut budget = dt_secs;
            while budget > 0.0 {
                let leg = vehicle.route[vehicle.leg];
                let remaining = leg.length - vehicle.leg_pos;

                // Zero-length legs (instantaneous transfers) cost no time.
                if remaining > 0.0 {
                    let speed = graph.cost_value(speed_col, leg.link);
                    if !(speed > 0.0) {
                        warn!(
                            "vehicle {}: link {:?} has no speed, stalling",
                            vehicle.id, leg.link
                        );
                        break;
                    }
                    let reachable = speed * budget;
                    if reachable < remaining {
                        vehicle.leg_pos += reachable;
                        break;
                    }
                    // Leg finished; spend the time it took and move on.
                    budget -= remaining / speed;
                }
                vehicle.leg += 1;
                vehicle.leg_pos = 0.0;

                let next = vehicle.route.get(vehicle.leg).map(|l| l.reservoir);
                match next {
                    Some(next_res) => {
                        // One exit + one entry per boundary crossing; staying
                        // inside the same reservoir emits nothing.
                        if next_res != leg.reservoir {
                            if let Some(res) = leg.reservoir {
                                motor.vehicle_exited(res, vehicle.mode);
                            }
                            if let Some(res) = next_res {
                                motor.vehicle_entered(res, vehicle.mode);
                            }
                        }
                    }
                    None => {
                        if let Some(res) = leg.reservoir {
                            motor.vehicle_exited(res, vehicle.mode);
                        }
                        vehicle.state = VehicleState::Completed;
                        debug!("vehicle {} completed its route", vehicle.id);
                        completed.push(vehicle.id);
                        break;
                    }
                }
            }
        }
        completed
    }
}
