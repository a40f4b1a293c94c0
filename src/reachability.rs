//! Internet reachability, the policy signal for `update`.

use std::net::Ipv4Addr;

use log::debug;

use crate::probe;

const PROBE_ADDR: Ipv4Addr = Ipv4Addr::new(8, 8, 8, 8);

/// Whether this machine currently has outbound internet connectivity.
///
/// One blocking echo against a well known public address. Any failure,
/// transient or not, reads as "no internet" for this call; there is no retry.
pub fn has_internet() -> bool {
    let reachable = probe::ping_host(PROBE_ADDR);
    debug!("reachability probe against {}: {}", PROBE_ADDR, reachable);
    reachable
}
