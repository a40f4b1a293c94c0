//! Device discovery and target resolution.
//!
//! Three ways to populate a [`Registry`]: a direct handshake per known
//! address (`resolve_targets`), a handshake per responsive host from a sweep
//! (`resolve`), or one UDP broadcast to the whole LAN (`discover`). Per-host
//! failures are never fatal; the host is skipped with a warning and one
//! attempt is made per host per pass.

use std::{
    net::{Ipv4Addr, SocketAddr, UdpSocket},
    time::Duration,
};

use log::warn;
use rayon::prelude::*;

use crate::{
    datatypes::DeviceData,
    devices::{SmartPlug, SYSINFO_QUERY},
    error::Result,
    protocol::{self, DefaultProtocol, Protocol, DEVICE_PORT},
    registry::Registry,
};

const BROADCAST_TIMEOUT: Duration = Duration::from_secs(3);

/// Handshake with a single host and build a plug handle from its sysinfo.
pub fn discover_one(addr: Ipv4Addr) -> Result<SmartPlug> {
    let protocol: Box<dyn Protocol> = Box::new(DefaultProtocol::new());
    let raw = protocol.send(SocketAddr::from((addr, DEVICE_PORT)), SYSINFO_QUERY)?;
    let data: DeviceData = serde_json::from_str(&raw)?;
    Ok(SmartPlug::from_parts(addr, data.sysinfo(), protocol))
}

/// Resolve a set of candidate addresses into a registry.
///
/// Attempts are independent and run in parallel; the registry keeps the
/// input's address order.
pub fn resolve(addrs: &[Ipv4Addr]) -> Registry {
    addrs
        .par_iter()
        .map(|&addr| (addr, discover_one(addr)))
        .collect::<Vec<_>>()
        .into_iter()
        .filter_map(|(addr, result)| match result {
            Ok(plug) => Some(plug),
            Err(err) => {
                warn!("no smart device answered at {}, skipping: {}", addr, err);
                None
            }
        })
        .collect()
}

/// Resolve a configured target list. Only literal addresses can be contacted
/// directly; alias entries would need a sweep and are skipped.
pub fn resolve_targets(targets: &[String]) -> Registry {
    let addrs: Vec<Ipv4Addr> = targets
        .iter()
        .filter_map(|target| match target.parse() {
            Ok(addr) => Some(addr),
            Err(_) => {
                warn!("target {:?} is not an IPv4 address, skipping", target);
                None
            }
        })
        .collect();
    resolve(&addrs)
}

/// Discover every device on the LAN with one UDP broadcast.
///
/// Replies are collected until the read timeout lapses and sorted by address,
/// since arrival order is not deterministic.
pub fn discover() -> Result<Registry> {
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.set_broadcast(true)?;
    socket.set_read_timeout(Some(BROADCAST_TIMEOUT))?;

    // UDP datagrams carry the ciphertext without the length header
    let req = protocol::encrypt(SYSINFO_QUERY)?;
    for _ in 0_u8..3 {
        socket.send_to(&req[4..], ("255.255.255.255", DEVICE_PORT))?;
    }

    let mut buf = [0_u8; 4096];
    let mut plugs: Vec<SmartPlug> = Vec::new();

    while let Ok((size, peer)) = socket.recv_from(&mut buf) {
        let addr = match peer {
            SocketAddr::V4(peer) => *peer.ip(),
            SocketAddr::V6(_) => continue,
        };
        let data = protocol::decrypt(&mut buf[0..size]);
        match serde_json::from_str::<DeviceData>(&data) {
            Ok(device_data) => plugs.push(SmartPlug::from_parts(
                addr,
                device_data.sysinfo(),
                Box::new(DefaultProtocol::new()),
            )),
            Err(_) => warn!("discarding an unparseable broadcast reply from {}", addr),
        }
    }

    plugs.sort_by_key(|plug| plug.addr());
    Ok(plugs.into_iter().collect())
}
