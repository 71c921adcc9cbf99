use mm_core::Point;
use serde::{Deserialize, Serialize};

/// A trip endpoint as supplied by input data: either a named graph node or a
/// raw coordinate to be snapped to the nearest node at departure time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EndpointRef {
    Node(String),
    Coord(Point),
}

impl EndpointRef {
    /// Parse the textual form: `x;y` is a coordinate, anything else a node
    /// name.
    pub fn parse(text: &str) -> Result<Self, String> {
        match text.split_once(';') {
            Some((x, y)) => {
                let x: f64 = x.trim().parse().map_err(|_| format!("bad x coordinate: {x:?}"))?;
                let y: f64 = y.trim().parse().map_err(|_| format!("bad y coordinate: {y:?}"))?;
                Ok(Self::Coord(Point::new(x, y)))
            }
            None if text.is_empty() => Err("empty endpoint".to_owned()),
            None => Ok(Self::Node(text.to_owned())),
        }
    }
}

/// One requested trip, as read from a demand source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TravelerRecord {
    pub name:           String,
    pub origin:         EndpointRef,
    pub destination:    EndpointRef,
    pub departure_secs: f64,
    /// Mobility service labels this traveler may use; empty = unrestricted.
    pub labels:         Vec<String>,
}
