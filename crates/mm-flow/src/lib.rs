//! Macroscopic flow dynamics: zone reservoirs whose per-mode vehicle
//! accumulation drives link speeds through a speed–accumulation relation
//! (MFD), rewritten into the routing graph's cost table once per update.
//!
//! | Module      | Contents                                               |
//! |-------------|--------------------------------------------------------|
//! | `mfd`       | `MfdFunction` trait, `ThreeParamMfd`, per-mode vectors |
//! | `reservoir` | one zone: covered links + accumulation + its MFD       |
//! | `motor`     | `FlowMotor`: entry/exit bookkeeping and cost rewrite   |
//! | `error`     | `FlowError` / `FlowResult`                             |

mod error;
mod mfd;
mod motor;
mod reservoir;

pub use error::{FlowError, FlowResult};
pub use mfd::{MfdFunction, ModeAccumulation, ModeSpeeds, ThreeParamMfd};
pub use motor::FlowMotor;
pub use reservoir::Reservoir;
