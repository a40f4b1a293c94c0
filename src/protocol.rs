use std::{
    io::{Read, Write},
    net::{SocketAddr, TcpStream},
    time::Duration,
};

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

use crate::error::Result;

/// TCP and UDP port the plugs listen on.
pub const DEVICE_PORT: u16 = 9999;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
const READ_TIMEOUT: Duration = Duration::from_secs(5);

// XOR autokey cipher used by the plug firmware, with a 4 byte big endian
// length prefix for the TCP transport.
// see: https://www.softscheck.com/en/reverse-engineering-tp-link-hs110/
pub fn encrypt(plain: &str) -> Result<Vec<u8>> {
    let mut cipher = Vec::with_capacity(plain.len() + 4);
    cipher.write_u32::<BigEndian>(plain.len() as u32)?;

    let mut key = 0xAB;
    for byte in plain.bytes() {
        key ^= byte;
        cipher.push(key);
    }

    Ok(cipher)
}

pub fn decrypt(cipher: &mut [u8]) -> String {
    let mut key = 0xAB;

    for item in cipher.iter_mut() {
        let next = *item;
        *item ^= key;
        key = next;
    }

    String::from_utf8_lossy(cipher).into_owned()
}

/// One blocking request/response round trip against a device.
pub trait Protocol: Send {
    fn send(&self, addr: SocketAddr, msg: &str) -> Result<String>;
}

pub struct DefaultProtocol;

impl DefaultProtocol {
    pub fn new() -> DefaultProtocol {
        DefaultProtocol {}
    }
}

impl Protocol for DefaultProtocol {
    fn send(&self, addr: SocketAddr, msg: &str) -> Result<String> {
        let payload = encrypt(msg)?;
        let mut stream = TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT)?;

        stream.set_read_timeout(Some(READ_TIMEOUT))?;
        stream.write_all(&payload)?;

        let mut header = [0_u8; 4];
        stream.read_exact(&mut header)?;
        let length = BigEndian::read_u32(&header) as usize;

        let mut body = vec![0_u8; length];
        stream.read_exact(&mut body)?;

        Ok(decrypt(&mut body))
    }
}

#[cfg(test)]
pub mod testing {
    use std::{
        collections::VecDeque,
        net::SocketAddr,
        sync::{Arc, Mutex},
    };

    use super::Protocol;
    use crate::error::Result;

    #[derive(Default)]
    struct MockState {
        requests: Vec<String>,
        responses: VecDeque<Result<String>>,
    }

    /// Records every request and replays scripted responses. With an empty
    /// script it answers `{}`, which parses as a successful command.
    #[derive(Clone, Default)]
    pub struct ProtocolMock {
        state: Arc<Mutex<MockState>>,
    }

    impl ProtocolMock {
        pub fn new() -> ProtocolMock {
            ProtocolMock::default()
        }

        pub fn push_response(&self, response: Result<String>) {
            self.state.lock().unwrap().responses.push_back(response);
        }

        pub fn requests(&self) -> Vec<String> {
            self.state.lock().unwrap().requests.clone()
        }

        pub fn request_count(&self) -> usize {
            self.state.lock().unwrap().requests.len()
        }
    }

    impl Protocol for ProtocolMock {
        fn send(&self, _addr: SocketAddr, msg: &str) -> Result<String> {
            let mut state = self.state.lock().unwrap();
            state.requests.push(msg.to_string());
            state
                .responses
                .pop_front()
                .unwrap_or_else(|| Ok(String::from("{}")))
        }
    }
}
