//! Discover TPLink smart plugs on the local network and power them on or
//! off, optionally gated on internet reachability.
//!
//! A [`registry::Registry`] of plugs is built fresh per run, either from the
//! configured target list, from a ping sweep of the local /24, or from one
//! UDP broadcast. [`reconcile`] then drives idempotent on/off transitions,
//! with [`reachability::has_internet`] as the policy signal for `update`.

#[macro_use]
extern crate serde_derive;

pub mod config;
pub mod devices;
pub mod discovery;
pub mod error;
pub mod probe;
pub mod reachability;
pub mod reconcile;
pub mod registry;

pub mod datatypes;
mod protocol;
