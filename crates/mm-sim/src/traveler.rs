use mm_core::{NodeIndex, TravelerIndex, VehicleIndex};
use mm_graph::LabelSet;
use mm_routing::Path;

/// Runtime lifecycle of one traveler.  `Arrived` and `Unservable` are
/// terminal; an unservable traveler is never retried.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TravelerState {
    Pending,
    EnRoute,
    Arrived { at_secs: f64 },
    Unservable,
}

/// A traveler after admission: endpoints resolved to graph nodes, service
/// labels resolved to a bitmask.
#[derive(Clone, Debug)]
pub struct Traveler {
    pub(crate) id:             TravelerIndex,
    pub(crate) name:           String,
    pub(crate) origin:         NodeIndex,
    pub(crate) destination:    NodeIndex,
    pub(crate) departure_secs: f64,
    pub(crate) labels:         LabelSet,
    pub(crate) state:          TravelerState,
    pub(crate) path:           Option<Path>,
    pub(crate) vehicle:        Option<VehicleIndex>,
}

impl Traveler {
    pub fn id(&self) -> TravelerIndex {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn origin(&self) -> NodeIndex {
        self.origin
    }

    pub fn destination(&self) -> NodeIndex {
        self.destination
    }

    pub fn departure_secs(&self) -> f64 {
        self.departure_secs
    }

    pub fn labels(&self) -> LabelSet {
        self.labels
    }

    pub fn state(&self) -> TravelerState {
        self.state
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    pub fn vehicle(&self) -> Option<VehicleIndex> {
        self.vehicle
    }
}

/// All travelers admitted during one run, indexed by `TravelerIndex`.
/// Arrived and unservable travelers stay archived here.
#[derive(Debug, Default)]
pub struct TravelerRegistry {
    travelers: Vec<Traveler>,
}

impl TravelerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn admit(
        &mut self,
        name: String,
        origin: NodeIndex,
        destination: NodeIndex,
        departure_secs: f64,
        labels: LabelSet,
    ) -> TravelerIndex {
        let id = TravelerIndex(self.travelers.len() as u32);
        self.travelers.push(Traveler {
            id,
            name,
            origin,
            destination,
            departure_secs,
            labels,
            state: TravelerState::Pending,
            path: None,
            vehicle: None,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.travelers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.travelers.is_empty()
    }

    pub fn get(&self, id: TravelerIndex) -> Option<&Traveler> {
        self.travelers.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: TravelerIndex) -> Option<&mut Traveler> {
        self.travelers.get_mut(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Traveler> {
        self.travelers.iter()
    }

    pub fn count_in(&self, state: fn(&TravelerState) -> bool) -> usize {
        self.travelers.iter().filter(|t| state(&t.state)).count()
    }

    pub fn arrived_count(&self) -> usize {
        self.count_in(|s| matches!(s, TravelerState::Arrived { .. }))
    }

    pub fn unservable_count(&self) -> usize {
        self.count_in(|s| matches!(s, TravelerState::Unservable))
    }
}
