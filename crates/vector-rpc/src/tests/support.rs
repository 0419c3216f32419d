//! Test node: an in-memory network and miner that record every call.

use std::io::{self, Cursor, Read, Write};
use std::sync::{Arc, Mutex};

use num_bigint::BigInt;
use serde_json::Value;

use crate::args::Address;
use crate::bootstrap::NodeHandles;
use crate::node::{MinerControl, NetworkStatus, NodeError};

/// Largest extra data payload the fake miner accepts.
pub const MAX_EXTRA_BYTES: usize = 32;

/// Node double implementing both handle traits over shared state.
#[derive(Clone, Default)]
pub struct FakeNode {
    state: Arc<Mutex<NodeState>>,
}

#[derive(Default)]
struct NodeState {
    peers: usize,
    listening: bool,
    mining_threads: Option<usize>,
    auto_dag: bool,
    extra: Vec<u8>,
    gas_price: Option<BigInt>,
    vecbase: Option<Address>,
    dags: Vec<u64>,
    start_failure: Option<String>,
}

impl FakeNode {
    fn with_state<T>(&self, f: impl FnOnce(&mut NodeState) -> T) -> T {
        let mut state = self.state.lock().expect("node state mutex poisoned");
        f(&mut state)
    }

    /// Sets the reported peer count.
    pub fn set_peers(&self, peers: usize) {
        self.with_state(|state| state.peers = peers);
    }

    /// Makes the next `start_mining` call fail with `message`.
    pub fn fail_start(&self, message: impl Into<String>) {
        let message = message.into();
        self.with_state(|state| state.start_failure = Some(message));
    }

    /// Thread count of the running miner, if mining.
    #[must_use]
    pub fn mining_threads(&self) -> Option<usize> {
        self.with_state(|state| state.mining_threads)
    }

    /// Whether automatic DAG generation is on.
    #[must_use]
    pub fn auto_dag(&self) -> bool {
        self.with_state(|state| state.auto_dag)
    }

    /// Extra data currently configured.
    #[must_use]
    pub fn extra(&self) -> Vec<u8> {
        self.with_state(|state| state.extra.clone())
    }

    /// Gas price currently configured.
    #[must_use]
    pub fn gas_price(&self) -> Option<BigInt> {
        self.with_state(|state| state.gas_price.clone())
    }

    /// Reward address currently configured.
    #[must_use]
    pub fn vecbase(&self) -> Option<Address> {
        self.with_state(|state| state.vecbase)
    }

    /// Heights for which a DAG was generated.
    #[must_use]
    pub fn dags(&self) -> Vec<u64> {
        self.with_state(|state| state.dags.clone())
    }

    /// Handles for building a dispatcher over this node.
    #[must_use]
    pub fn handles(&self) -> NodeHandles {
        NodeHandles {
            network: Arc::new(self.clone()),
            miner: Arc::new(self.clone()),
        }
    }
}

impl NetworkStatus for FakeNode {
    fn peer_count(&self) -> usize {
        self.with_state(|state| state.peers)
    }

    fn is_listening(&self) -> bool {
        self.with_state(|state| state.listening)
    }

    fn network_version(&self) -> String {
        String::from("61")
    }
}

impl MinerControl for FakeNode {
    fn start_mining(&self, threads: usize) -> Result<(), NodeError> {
        self.with_state(|state| match state.start_failure.take() {
            Some(message) => Err(NodeError::new(message)),
            None => {
                state.mining_threads = Some(threads);
                Ok(())
            }
        })
    }

    fn stop_mining(&self) {
        self.with_state(|state| state.mining_threads = None);
    }

    fn hashrate(&self) -> u64 {
        self.with_state(|state| state.mining_threads.map_or(0, |threads| threads as u64 * 100))
    }

    fn set_extra(&self, extra: &[u8]) -> Result<(), NodeError> {
        if extra.len() > MAX_EXTRA_BYTES {
            return Err(NodeError::new(format!(
                "extra data exceeds {MAX_EXTRA_BYTES} bytes"
            )));
        }
        self.with_state(|state| state.extra = extra.to_vec());
        Ok(())
    }

    fn set_gas_price(&self, price: BigInt) {
        self.with_state(|state| state.gas_price = Some(price));
    }

    fn set_vecbase(&self, address: Address) {
        self.with_state(|state| state.vecbase = Some(address));
    }

    fn start_auto_dag(&self) {
        self.with_state(|state| state.auto_dag = true);
    }

    fn stop_auto_dag(&self) {
        self.with_state(|state| state.auto_dag = false);
    }

    fn make_dag(&self, block_number: u64) -> Result<(), NodeError> {
        self.with_state(|state| state.dags.push(block_number));
        Ok(())
    }
}

/// Shared log sink for subscribers built in tests.
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Everything written so far, as text.
    #[must_use]
    pub fn contents(&self) -> String {
        let buffer = self.buffer.lock().expect("log buffer mutex poisoned");
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .expect("log buffer mutex poisoned")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// In-memory stream: reads a fixed input and captures everything written.
pub struct Duplex {
    input: Cursor<Vec<u8>>,
    output: Vec<u8>,
}

impl Duplex {
    /// Creates a stream that yields `input`.
    #[must_use]
    pub fn new(input: impl Into<Vec<u8>>) -> Self {
        Self {
            input: Cursor::new(input.into()),
            output: Vec::new(),
        }
    }

    /// Bytes written so far.
    #[must_use]
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Parses the captured output as a single JSON response.
    #[must_use]
    pub fn response(&self) -> Value {
        serde_json::from_slice(&self.output).expect("response json")
    }
}

impl Read for Duplex {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.input.read(buf)
    }
}

impl Write for Duplex {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
