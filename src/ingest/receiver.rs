/// UDP receive loop feeding decoded records to the engine
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::net::UdpSocket;
use tokio::sync::Notify;
use tokio::time::{sleep, Duration};

use super::decoder::decode_record;
use crate::engine::{DispatchSummary, Engine};
use crate::error::TransportError;
use crate::mapping::TransportSettings;

/// Only every Nth received record is decoded and dispatched.
pub const DEFAULT_DECIMATION: u32 = 30;

const MAX_DATAGRAM_SIZE: usize = 4096;
const RECV_ERROR_BACKOFF_MS: u64 = 100;

/// Exact every-Nth counter. Counts every arrival and admits the Nth one.
#[derive(Debug, Clone)]
pub struct Decimator {
    every: u32,
    count: u32,
}

impl Decimator {
    pub fn new(every: u32) -> Self {
        Self {
            every: every.max(1),
            count: 0,
        }
    }

    /// Register one arrival. Returns true when this arrival should be processed.
    pub fn admit(&mut self) -> bool {
        self.count += 1;
        if self.count >= self.every {
            self.count = 0;
            true
        } else {
            false
        }
    }
}

struct LifecycleInner {
    stopping: AtomicBool,
    wake: Notify,
}

/// Stop signal shared between the receive loop and whoever shuts it down.
#[derive(Clone)]
pub struct Lifecycle {
    inner: Arc<LifecycleInner>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(LifecycleInner {
                stopping: AtomicBool::new(false),
                wake: Notify::new(),
            }),
        }
    }

    /// Request shutdown. A receive in progress is abandoned.
    pub fn stop(&self) {
        self.inner.stopping.store(true, Ordering::SeqCst);
        self.inner.wake.notify_one();
    }

    pub fn is_stopping(&self) -> bool {
        self.inner.stopping.load(Ordering::SeqCst)
    }

    /// Resolves once `stop` has been called.
    pub async fn stopped(&self) {
        if self.is_stopping() {
            return;
        }
        self.inner.wake.notified().await;
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters kept for the lifetime of a receive loop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReceiverStats {
    pub received: u64,
    pub dispatched: u64,
    pub malformed: u64,
    pub published: u64,
    pub skipped_channels: u64,
}

/// Per-datagram processing, independent of the socket.
pub struct Ingestor {
    engine: Arc<Engine>,
    decimator: Decimator,
    stats: ReceiverStats,
}

impl Ingestor {
    pub fn new(engine: Arc<Engine>, decimation: u32) -> Self {
        Self {
            engine,
            decimator: Decimator::new(decimation),
            stats: ReceiverStats::default(),
        }
    }

    /// Count one datagram and, if the decimator admits it, decode and dispatch it
    ///
    /// # Returns
    /// The dispatch summary when the record was dispatched, None when it was
    /// discarded by decimation or could not be decoded
    pub fn handle_datagram(&mut self, payload: &[u8]) -> Option<DispatchSummary> {
        self.stats.received += 1;
        if self.stats.received == 1 {
            info!("Received first record ({} bytes)", payload.len());
        }

        if !self.decimator.admit() {
            return None;
        }

        let record = match decode_record(payload) {
            Ok(record) => record,
            Err(e) => {
                self.stats.malformed += 1;
                warn!("Skipping record #{}: {}", self.stats.received, e);
                return None;
            }
        };

        let summary = self.engine.dispatch(&record);
        self.stats.dispatched += 1;
        self.stats.published += summary.published as u64;
        self.stats.skipped_channels += summary.skipped as u64;
        debug!(
            "Record #{} ({} fields): {} published, {} skipped",
            self.stats.received,
            record.len(),
            summary.published,
            summary.skipped
        );
        Some(summary)
    }

    pub fn stats(&self) -> ReceiverStats {
        self.stats
    }
}

/// Owns the UDP socket and runs the receive loop until stopped.
pub struct Receiver {
    socket: UdpSocket,
    lifecycle: Lifecycle,
    ingestor: Ingestor,
}

impl Receiver {
    /// Bind the socket described by `transport`
    ///
    /// A multicast `ip_address` is joined on all interfaces with the socket
    /// bound to the wildcard address; any other address is bound directly.
    ///
    /// # Arguments
    /// * `transport` - Port and address the station broadcasts to
    /// * `engine` - Engine records are dispatched to
    /// * `lifecycle` - Stop signal observed by the loop
    /// * `decimation` - Process only every Nth record
    pub async fn bind(
        transport: &TransportSettings,
        engine: Arc<Engine>,
        lifecycle: Lifecycle,
        decimation: u32,
    ) -> Result<Self, TransportError> {
        let (bind_addr, group) = match transport.ip_address {
            IpAddr::V4(ip) if ip.is_multicast() => (
                SocketAddr::from((Ipv4Addr::UNSPECIFIED, transport.udp_port)),
                Some(ip),
            ),
            ip => (SocketAddr::new(ip, transport.udp_port), None),
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|source| TransportError::Bind {
                addr: bind_addr,
                source,
            })?;

        if let Some(group) = group {
            socket
                .join_multicast_v4(group, Ipv4Addr::UNSPECIFIED)
                .map_err(|source| TransportError::JoinMulticast { group, source })?;
            info!("Joined multicast group {}", group);
        }

        info!(
            "Listening for weather records on {} (processing every {} records)",
            bind_addr,
            decimation.max(1)
        );

        Ok(Self {
            socket,
            lifecycle,
            ingestor: Ingestor::new(engine, decimation),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Spawn the receive loop on the tokio runtime.
    pub fn start(self) -> tokio::task::JoinHandle<ReceiverStats> {
        tokio::spawn(self.run())
    }

    /// Receive until the lifecycle is stopped, then release the socket.
    pub async fn run(mut self) -> ReceiverStats {
        let mut buffer = vec![0u8; MAX_DATAGRAM_SIZE];

        loop {
            if self.lifecycle.is_stopping() {
                break;
            }

            let received = tokio::select! {
                result = self.socket.recv(&mut buffer) => result,
                _ = self.lifecycle.stopped() => break,
            };

            match received {
                Ok(len) => {
                    self.ingestor.handle_datagram(&buffer[..len]);
                }
                Err(e) => {
                    warn!("UDP receive error: {}", e);
                    sleep(Duration::from_millis(RECV_ERROR_BACKOFF_MS)).await;
                }
            }
        }

        let stats = self.ingestor.stats();
        info!(
            "Receiver stopped: {} received, {} dispatched, {} malformed, {} values published",
            stats.received, stats.dispatched, stats.malformed, stats.published
        );
        stats
    }
}
