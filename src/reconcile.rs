//! Idempotent power transitions.
//!
//! A transition is only sent when the cached state differs from the desired
//! one; asking an on plug to turn on is a no-op, not an error. The return
//! value says whether a command was actually sent.

use log::warn;

use crate::{devices::SmartPlug, error::Result, registry::Registry};

pub fn turn_on_if_off(plug: &mut SmartPlug) -> Result<bool> {
    if plug.is_off() {
        plug.turn_on()?;
        return Ok(true);
    }
    Ok(false)
}

pub fn turn_off_if_on(plug: &mut SmartPlug) -> Result<bool> {
    if plug.is_on() {
        plug.turn_off()?;
        return Ok(true);
    }
    Ok(false)
}

/// Drive a plug toward the desired state.
pub fn reconcile(plug: &mut SmartPlug, desired_on: bool) -> Result<bool> {
    if desired_on {
        turn_on_if_off(plug)
    } else {
        turn_off_if_on(plug)
    }
}

/// Apply the desired state to every plug in the registry.
///
/// One plug's failure must not block the rest; it is logged and the loop
/// moves on.
pub fn reconcile_fleet(registry: &mut Registry, desired_on: bool) {
    for plug in registry.iter_mut() {
        if let Err(err) = reconcile(plug, desired_on) {
            warn!(
                "failed to update {} ({}), skipping: {}",
                plug.alias(),
                plug.addr(),
                err
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{io, net::Ipv4Addr};

    use super::*;
    use crate::{devices::testing::mock_plug, error::Error};

    #[test]
    fn reconcile_is_a_noop_when_already_in_state() {
        let (mut plug, mock) = mock_plug(Ipv4Addr::new(10, 0, 0, 5), "Lamp", true);

        assert!(!reconcile(&mut plug, true).unwrap());

        assert_eq!(mock.request_count(), 0);
        assert!(plug.is_on());
    }

    #[test]
    fn only_the_first_reconcile_sends_a_command() {
        let (mut plug, mock) = mock_plug(Ipv4Addr::new(10, 0, 0, 5), "Lamp", false);

        assert!(reconcile(&mut plug, true).unwrap());
        assert!(!reconcile(&mut plug, true).unwrap());
        assert!(!reconcile(&mut plug, true).unwrap());

        assert_eq!(mock.request_count(), 1);
        assert!(plug.is_on());
    }

    #[test]
    fn turn_off_if_on_leaves_off_plug_alone() {
        let (mut plug, mock) = mock_plug(Ipv4Addr::new(10, 0, 0, 5), "Lamp", false);

        assert!(!turn_off_if_on(&mut plug).unwrap());

        assert_eq!(mock.request_count(), 0);
    }

    #[test]
    fn fleet_update_turns_off_when_no_internet() {
        let mut registry = Registry::new();
        let (on_plug, on_mock) = mock_plug(Ipv4Addr::new(10, 0, 0, 1), "Lamp", true);
        let (off_plug, off_mock) = mock_plug(Ipv4Addr::new(10, 0, 0, 2), "Fan", false);
        registry.insert(on_plug);
        registry.insert(off_plug);

        reconcile_fleet(&mut registry, false);

        assert!(registry.find("Lamp").unwrap().is_off());
        assert!(registry.find("Fan").unwrap().is_off());
        assert_eq!(on_mock.request_count(), 1);
        assert_eq!(off_mock.request_count(), 0);
    }

    #[test]
    fn fleet_update_turns_on_when_internet_is_back() {
        let mut registry = Registry::new();
        let (on_plug, on_mock) = mock_plug(Ipv4Addr::new(10, 0, 0, 1), "Lamp", true);
        let (off_plug, off_mock) = mock_plug(Ipv4Addr::new(10, 0, 0, 2), "Fan", false);
        registry.insert(on_plug);
        registry.insert(off_plug);

        reconcile_fleet(&mut registry, true);

        assert!(registry.find("Lamp").unwrap().is_on());
        assert!(registry.find("Fan").unwrap().is_on());
        assert_eq!(on_mock.request_count(), 0);
        assert_eq!(off_mock.request_count(), 1);
    }

    #[test]
    fn one_failing_plug_does_not_block_the_fleet() {
        let mut registry = Registry::new();
        let (first, _) = mock_plug(Ipv4Addr::new(10, 0, 0, 1), "First", false);
        let (second, second_mock) = mock_plug(Ipv4Addr::new(10, 0, 0, 2), "Second", false);
        let (third, _) = mock_plug(Ipv4Addr::new(10, 0, 0, 3), "Third", false);
        second_mock.push_response(Err(Error::IO(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "connection refused",
        ))));
        registry.insert(first);
        registry.insert(second);
        registry.insert(third);

        reconcile_fleet(&mut registry, true);

        assert!(registry.find("First").unwrap().is_on());
        assert!(registry.find("Second").unwrap().is_off());
        assert!(registry.find("Third").unwrap().is_on());
    }
}
