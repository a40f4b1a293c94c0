//! Local network probing.
//!
//! The local /24 is derived from the default gateway's address and swept with
//! one ping per host. Hosts that do not answer are silently absent from the
//! result; a missing gateway is fatal because no subnet can be derived.

use std::{
    fs,
    net::Ipv4Addr,
    process::{Command, Stdio},
};

use ipnetwork::Ipv4Network;
use log::info;
use rayon::prelude::*;

use crate::error::{Error, Result};

const PING_TIMEOUT_SECS: u32 = 1;

/// One ICMP echo, platform-appropriate flags, status mapped to a bool.
pub(crate) fn ping_host(addr: Ipv4Addr) -> bool {
    let mut command = Command::new("ping");
    if cfg!(windows) {
        command.args(&["-n", "1", "-w", &(PING_TIMEOUT_SECS * 1000).to_string()]);
    } else {
        command.args(&["-c", "1", "-W", &PING_TIMEOUT_SECS.to_string()]);
    }
    command
        .arg(addr.to_string())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// The system's default IPv4 gateway.
pub fn default_gateway() -> Result<Ipv4Addr> {
    if cfg!(target_os = "linux") {
        let table = fs::read_to_string("/proc/net/route")?;
        parse_route_table(&table).ok_or(Error::NoGateway)
    } else if cfg!(target_os = "macos") {
        let output = Command::new("route")
            .args(&["-n", "get", "default"])
            .output()?;
        parse_route_get(&String::from_utf8_lossy(&output.stdout)).ok_or(Error::NoGateway)
    } else {
        Err(Error::NoGateway)
    }
}

// /proc/net/route stores addresses as little endian hex; the default route
// has destination 00000000.
fn parse_route_table(table: &str) -> Option<Ipv4Addr> {
    for line in table.lines().skip(1) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 || fields[1] != "00000000" {
            continue;
        }
        if let Ok(raw) = u32::from_str_radix(fields[2], 16) {
            return Some(Ipv4Addr::from(raw.swap_bytes()));
        }
    }
    None
}

fn parse_route_get(output: &str) -> Option<Ipv4Addr> {
    output
        .lines()
        .find_map(|line| line.trim().strip_prefix("gateway:"))
        .and_then(|rest| rest.trim().parse().ok())
}

/// The /24 around an address, by zeroing its last octet.
pub fn network_of(gateway: Ipv4Addr) -> Ipv4Network {
    let octets = gateway.octets();
    let base = Ipv4Addr::new(octets[0], octets[1], octets[2], 0);
    Ipv4Network::new(base, 24).expect("a /24 prefix is always valid")
}

pub fn local_network() -> Result<Ipv4Network> {
    Ok(network_of(default_gateway()?))
}

/// Sweep a network for responsive hosts.
///
/// Pings run in parallel; the result keeps address order. Network and
/// broadcast addresses are not probed.
pub fn sweep(network: Ipv4Network) -> Vec<Ipv4Addr> {
    let hosts: Vec<Ipv4Addr> = network
        .iter()
        .filter(|addr| {
            let last = addr.octets()[3];
            last != 0 && last != 255
        })
        .collect();

    hosts
        .into_par_iter()
        .filter(|&addr| ping_host(addr))
        .collect()
}

/// Derive the local network and sweep it.
pub fn scan() -> Result<Vec<Ipv4Addr>> {
    let network = local_network()?;
    info!("sweeping {} for responsive hosts", network);
    let hosts = sweep(network);
    info!("sweep finished, {} hosts responded", hosts.len());
    Ok(hosts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_table_default_gateway() {
        let table = "Iface\tDestination\tGateway \tFlags\tRefCnt\tUse\tMetric\tMask\t\tMTU\tWindow\tIRTT\n\
                     wlan0\t00000000\t0101A8C0\t0003\t0\t0\t600\t00000000\t0\t0\t0\n\
                     wlan0\t0001A8C0\t00000000\t0001\t0\t0\t600\t00FFFFFF\t0\t0\t0\n";

        assert_eq!(
            parse_route_table(table),
            Some(Ipv4Addr::new(192, 168, 1, 1))
        );
    }

    #[test]
    fn route_table_without_default_route() {
        let table = "Iface\tDestination\tGateway \tFlags\n\
                     eth0\t0001A8C0\t00000000\t0001\n";

        assert_eq!(parse_route_table(table), None);
    }

    #[test]
    fn route_get_output_gateway() {
        let output = "   route to: default\n\
                      destination: default\n\
                             mask: default\n\
                          gateway: 10.0.0.254\n\
                        interface: en0\n";

        assert_eq!(parse_route_get(output), Some(Ipv4Addr::new(10, 0, 0, 254)));
    }

    #[test]
    fn network_zeroes_the_last_octet() {
        let network = network_of(Ipv4Addr::new(192, 168, 1, 254));

        assert_eq!(network.to_string(), "192.168.1.0/24");
        assert_eq!(network.prefix(), 24);
    }
}
