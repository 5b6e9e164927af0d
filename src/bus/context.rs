use std::collections::{HashSet, VecDeque};

use log::{debug, warn};
use rtrb::{Producer, PushError, RingBuffer};

use crate::{
    bus::{
        backend::AudioBackend,
        command::{BusCommand, NodeId},
        master::MasterBus,
    },
    graph::stereo::StereoNode,
};

const COMMAND_QUEUE_SIZE: usize = 256;

/// Outcome of asking the audio context to start producing sound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unlock {
    Ready,
    /// Playback could not start. The session still runs, silently.
    Blocked(String),
}

impl Unlock {
    pub fn is_ready(&self) -> bool {
        matches!(self, Unlock::Ready)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Closed,
    Suspended,
    Running,
}

/// Control-side handle on the master bus.
///
/// Opened lazily by [`AudioContext::unlock`], one per session. Graph changes
/// travel as [`BusCommand`]s over a lock-free ring; if the ring is momentarily
/// full they wait in a backlog and go out with the next command or `flush`.
pub struct AudioContext {
    backend: Box<dyn AudioBackend>,
    tx: Option<Producer<BusCommand>>,
    backlog: VecDeque<BusCommand>,
    state: ContextState,
    gain: f32,
    next_node: u64,
    connected: HashSet<NodeId>,
}

impl AudioContext {
    pub fn new(backend: Box<dyn AudioBackend>, gain: f32) -> Self {
        Self {
            backend,
            tx: None,
            backlog: VecDeque::new(),
            state: ContextState::Closed,
            gain: gain.clamp(0.0, 1.0),
            next_node: 0,
            connected: HashSet::new(),
        }
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    pub fn sample_rate(&self) -> f32 {
        self.backend.sample_rate()
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Nodes this context has connected and not yet disconnected.
    pub fn connected(&self) -> usize {
        self.connected.len()
    }

    /// Open the bus if needed and start playback.
    pub fn unlock(&mut self) -> Unlock {
        if self.tx.is_none() {
            let (tx, rx) = RingBuffer::new(COMMAND_QUEUE_SIZE);
            let bus = MasterBus::new(rx, self.backend.sample_rate(), self.gain);
            if let Err(err) = self.backend.open(bus) {
                warn!("audio context could not open: {err}");
                return Unlock::Blocked(err.to_string());
            }
            debug!("audio context opened at {} Hz", self.backend.sample_rate());
            self.tx = Some(tx);
            self.state = ContextState::Suspended;
        }

        if self.state == ContextState::Running {
            return Unlock::Ready;
        }
        match self.backend.resume() {
            Ok(()) => {
                self.state = ContextState::Running;
                Unlock::Ready
            }
            Err(err) => {
                warn!("audio context could not resume: {err}");
                Unlock::Blocked(err.to_string())
            }
        }
    }

    pub fn suspend(&mut self) {
        if self.state != ContextState::Running {
            return;
        }
        if let Err(err) = self.backend.suspend() {
            warn!("audio context suspend failed: {err}");
        }
        self.state = ContextState::Suspended;
    }

    /// Resume after `suspend`. A closed context stays closed.
    pub fn resume(&mut self) -> Unlock {
        if self.state == ContextState::Closed {
            return Unlock::Blocked("audio context is closed".into());
        }
        self.unlock()
    }

    /// Drop every node and release the device. Idempotent.
    pub fn close(&mut self) {
        if self.tx.is_none() && self.state == ContextState::Closed {
            return;
        }
        self.disconnect_all();
        self.backend.close();
        self.tx = None;
        self.backlog.clear();
        self.state = ContextState::Closed;
        debug!("audio context closed");
    }

    /// Hand a node to the bus. `None` when no bus is open.
    pub fn connect(&mut self, node: Box<dyn StereoNode>) -> Option<NodeId> {
        self.tx.as_ref()?;
        let id = NodeId(self.next_node);
        self.next_node += 1;
        self.connected.insert(id);
        self.send(BusCommand::Connect { id, node });
        Some(id)
    }

    /// Unknown or already removed ids are ignored.
    pub fn disconnect(&mut self, id: NodeId) -> bool {
        if !self.connected.remove(&id) {
            return false;
        }
        self.send(BusCommand::Disconnect(id));
        true
    }

    pub fn disconnect_all(&mut self) {
        self.connected.clear();
        self.send(BusCommand::DisconnectAll);
    }

    /// Master gain. A value write on the existing bus, never a rebuild.
    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain.clamp(0.0, 1.0);
        self.send(BusCommand::SetGain(self.gain));
    }

    /// Retry anything left in the backlog.
    pub fn flush(&mut self) {
        let Some(tx) = self.tx.as_mut() else {
            self.backlog.clear();
            return;
        };
        while let Some(command) = self.backlog.pop_front() {
            if let Err(PushError::Full(command)) = tx.push(command) {
                self.backlog.push_front(command);
                break;
            }
        }
    }

    pub fn pending(&self) -> usize {
        self.backlog.len()
    }

    fn send(&mut self, command: BusCommand) {
        if self.tx.is_none() {
            return;
        }
        self.flush();
        if !self.backlog.is_empty() {
            self.backlog.push_back(command);
            return;
        }
        if let Some(tx) = self.tx.as_mut() {
            if let Err(PushError::Full(command)) = tx.push(command) {
                self.backlog.push_back(command);
            }
        }
    }
}

impl Drop for AudioContext {
    fn drop(&mut self) {
        self.close();
    }
}
