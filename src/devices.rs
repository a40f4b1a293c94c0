//! Device handles.
//!
//! A [`SmartPlug`] pairs an address with the sysinfo snapshot taken when the
//! device was discovered. Accessors read the snapshot; mutators send one
//! command and fold the effect back into it, so a later `list` in the same
//! run shows what the command changed.

use std::net::{Ipv4Addr, SocketAddr};

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::{
    datatypes::{DeviceData, SysInfo},
    error::{Error, Result, SectionError},
    protocol::{Protocol, DEVICE_PORT},
};

pub(crate) const SYSINFO_QUERY: &'static str = r#"{"system":{"get_sysinfo":null}}"#;

pub struct SmartPlug {
    addr: Ipv4Addr,
    sysinfo: SysInfo,
    protocol: Box<dyn Protocol>,
}

impl SmartPlug {
    pub(crate) fn from_parts(
        addr: Ipv4Addr,
        sysinfo: SysInfo,
        protocol: Box<dyn Protocol>,
    ) -> SmartPlug {
        SmartPlug {
            addr,
            sysinfo,
            protocol,
        }
    }

    pub fn addr(&self) -> Ipv4Addr {
        self.addr
    }

    pub fn alias(&self) -> &str {
        &self.sysinfo.alias
    }

    pub fn model(&self) -> &str {
        &self.sysinfo.model
    }

    pub fn is_on(&self) -> bool {
        self.sysinfo.is_on()
    }

    pub fn is_off(&self) -> bool {
        !self.is_on()
    }

    /// Re-fetch the sysinfo snapshot from the device.
    pub fn refresh(&mut self) -> Result<()> {
        let data: DeviceData = self.send(SYSINFO_QUERY)?;
        self.sysinfo = data.sysinfo();
        Ok(())
    }

    pub fn turn_on(&mut self) -> Result<()> {
        self.command(r#"{"system":{"set_relay_state":{"state": 1}}}"#)?;
        self.sysinfo.relay_state = Some(1);
        Ok(())
    }

    pub fn turn_off(&mut self) -> Result<()> {
        self.command(r#"{"system":{"set_relay_state":{"state": 0}}}"#)?;
        self.sysinfo.relay_state = Some(0);
        Ok(())
    }

    pub fn set_alias(&mut self, alias: &str) -> Result<()> {
        let command = json!({
            "system": {"set_dev_alias": {"alias": alias}}
        })
        .to_string();
        self.command(&command)?;
        self.sysinfo.alias = alias.to_string();
        Ok(())
    }

    /// Send a message to the device and return its parsed response.
    fn send<T: DeserializeOwned>(&self, msg: &str) -> Result<T> {
        let addr = SocketAddr::from((self.addr, DEVICE_PORT));
        Ok(serde_json::from_str::<T>(&self.protocol.send(addr, msg)?)?)
    }

    fn command(&self, msg: &str) -> Result<()> {
        let response: Value = self.send(msg)?;
        command_status(&response)
    }
}

// Command responses nest one module and one command deep, for example
// {"system":{"set_relay_state":{"err_code":0}}}.
fn command_status(response: &Value) -> Result<()> {
    let section = response
        .as_object()
        .and_then(|module| module.values().next())
        .and_then(|command| command.as_object())
        .and_then(|command| command.values().next());

    if let Some(code) = section
        .and_then(|section| section.get("err_code"))
        .and_then(Value::as_i64)
    {
        if code != 0 {
            let err_msg = section
                .and_then(|section| section.get("err_msg"))
                .and_then(Value::as_str)
                .unwrap_or("unknown device error")
                .to_string();
            return Err(Error::Device(SectionError {
                err_code: code as i16,
                err_msg,
            }));
        }
    }
    Ok(())
}
