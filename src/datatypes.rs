//! Serde types for the `get_sysinfo` response.
//!
//! Only the plug surface is modelled. Extra sections that other device
//! families append to a broadcast reply are ignored during deserialization.

type ErrCode = i16;

#[derive(Debug, Deserialize, Clone)]
pub struct DeviceData {
    pub system: System,
}

impl DeviceData {
    pub fn sysinfo(self) -> SysInfo {
        self.system.sysinfo
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct System {
    #[serde(rename = "get_sysinfo")]
    pub sysinfo: SysInfo,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SysInfo {
    pub sw_ver: String,
    pub hw_ver: String,
    #[serde(alias = "type")]
    #[serde(alias = "mic_type")]
    pub hw_type: String,
    pub model: String,
    #[serde(alias = "mic_mac")]
    pub mac: String,
    #[serde(rename = "deviceId")]
    pub device_id: String,
    pub alias: String,
    #[serde(alias = "description")]
    pub dev_name: String,
    pub err_code: ErrCode,
    pub rssi: i32,

    // Plugs report the relay; a device without one counts as off.
    pub relay_state: Option<u8>,
    pub on_time: Option<i64>,
}

impl SysInfo {
    pub fn is_on(&self) -> bool {
        self.relay_state.map_or(false, |state| state > 0)
    }
}
