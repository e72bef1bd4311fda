/// Station-wide settings carried in the raw configuration
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::error::ConfigurationError;
use crate::models::{RawConfig, UnitSystem};

pub const DEFAULT_UDP_PORT: u16 = 1333;
pub const DEFAULT_MULTICAST_GROUP: Ipv4Addr = Ipv4Addr::new(231, 31, 31, 31);
pub const DEFAULT_ELEVATION_M: f64 = 0.0;

/// Where the weather-station software broadcasts its records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportSettings {
    pub udp_port: u16,
    pub ip_address: IpAddr,
}

impl TransportSettings {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip_address, self.udp_port)
    }
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            udp_port: DEFAULT_UDP_PORT,
            ip_address: IpAddr::V4(DEFAULT_MULTICAST_GROUP),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationSettings {
    pub transport: TransportSettings,
    pub units: UnitSystem,
    /// Station elevation in metres, used for sea level reduction.
    pub elevation: f64,
}

impl StationSettings {
    /// Read `UDPPort`, `IPAddress`, `Units` and `Elevation`, applying defaults
    /// for any that are absent.
    pub fn from_raw(raw: &RawConfig) -> Result<Self, ConfigurationError> {
        let udp_port = match raw.get("UDPPort") {
            Some(v) => v
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigurationError::InvalidPort(v.clone()))?,
            None => DEFAULT_UDP_PORT,
        };

        let ip_address = match raw.get("IPAddress") {
            Some(v) => v
                .trim()
                .parse::<IpAddr>()
                .map_err(|_| ConfigurationError::InvalidAddress(v.clone()))?,
            None => IpAddr::V4(DEFAULT_MULTICAST_GROUP),
        };

        let units = match raw.get("Units") {
            Some(v) => v.parse::<UnitSystem>()?,
            None => UnitSystem::default(),
        };

        let elevation = match raw.get("Elevation") {
            Some(v) => v
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|e| e.is_finite())
                .ok_or_else(|| ConfigurationError::InvalidElevation(v.clone()))?,
            None => DEFAULT_ELEVATION_M,
        };

        Ok(Self {
            transport: TransportSettings {
                udp_port,
                ip_address,
            },
            units,
            elevation,
        })
    }
}
