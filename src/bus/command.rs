use rtrb::Consumer;

use crate::graph::stereo::StereoNode;

/// Handle for a source connected to the master bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

/// Topology and gain changes sent from the control side to the render side.
pub enum BusCommand {
    Connect {
        id: NodeId,
        node: Box<dyn StereoNode>,
    },
    Disconnect(NodeId),
    DisconnectAll,
    SetGain(f32),
}

impl std::fmt::Debug for BusCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BusCommand::Connect { id, .. } => f.debug_struct("Connect").field("id", id).finish(),
            BusCommand::Disconnect(id) => f.debug_tuple("Disconnect").field(id).finish(),
            BusCommand::DisconnectAll => f.write_str("DisconnectAll"),
            BusCommand::SetGain(gain) => f.debug_tuple("SetGain").field(gain).finish(),
        }
    }
}

pub trait CommandReceiver: Send {
    fn pop(&mut self) -> Option<BusCommand>;
}

impl CommandReceiver for Consumer<BusCommand> {
    fn pop(&mut self) -> Option<BusCommand> {
        Consumer::pop(self).ok()
    }
}
