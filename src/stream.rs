//! Forwarding of mesh buffers to an external consumer.
//!
//! The streamer watches editor events and pushes the position and index
//! buffers of every mesh that enters the scene into an injected
//! [`BufferSink`]. Delivery is fire-and-forget: a full or disconnected sink
//! is logged and otherwise ignored, and nothing here runs inside command
//! execution.

use crossbeam_channel as channel;
use uuid::Uuid;

use crate::editor::{Editor, EditorEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    /// `f32` xyz triples.
    Positions,
    /// `u32` triangle indices.
    Indices,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BufferPacket {
    pub object: Uuid,
    pub kind: BufferKind,
    pub data: Vec<u8>,
}

impl BufferPacket {
    pub fn positions(object: Uuid, positions: &[f32]) -> Self {
        Self {
            object,
            kind: BufferKind::Positions,
            data: bytemuck::cast_slice(positions).to_vec(),
        }
    }

    pub fn indices(object: Uuid, indices: &[u32]) -> Self {
        Self {
            object,
            kind: BufferKind::Indices,
            data: bytemuck::cast_slice(indices).to_vec(),
        }
    }

    pub fn as_positions(&self) -> Option<Vec<f32>> {
        match self.kind {
            BufferKind::Positions => Some(bytemuck::pod_collect_to_vec(self.data.as_slice())),
            BufferKind::Indices => None,
        }
    }

    pub fn as_indices(&self) -> Option<Vec<u32>> {
        match self.kind {
            BufferKind::Indices => Some(bytemuck::pod_collect_to_vec(self.data.as_slice())),
            BufferKind::Positions => None,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkError {
    #[error("buffer sink is full")]
    Full,

    #[error("buffer sink is disconnected")]
    Disconnected,
}

pub trait BufferSink {
    /// Must not block.
    fn send(&self, packet: BufferPacket) -> Result<(), SinkError>;
}

/// Bounded channel sink; the receiver may live on any thread.
pub struct ChannelSink {
    tx: channel::Sender<BufferPacket>,
}

impl ChannelSink {
    pub fn bounded(capacity: usize) -> (Self, channel::Receiver<BufferPacket>) {
        let (tx, rx) = channel::bounded(capacity);
        (Self { tx }, rx)
    }
}

impl BufferSink for ChannelSink {
    fn send(&self, packet: BufferPacket) -> Result<(), SinkError> {
        self.tx.try_send(packet).map_err(|err| match err {
            channel::TrySendError::Full(_) => SinkError::Full,
            channel::TrySendError::Disconnected(_) => SinkError::Disconnected,
        })
    }
}

pub struct BufferStreamer {
    sink: Box<dyn BufferSink>,
}

impl BufferStreamer {
    pub fn new(sink: impl BufferSink + 'static) -> Self {
        Self {
            sink: Box::new(sink),
        }
    }

    /// Sends the buffers of every mesh in each added subtree. Returns how
    /// many packets were accepted by the sink.
    pub fn forward(&self, editor: &Editor, events: &[EditorEvent]) -> usize {
        let scene = editor.scene();
        let mut sent = 0;

        for event in events {
            let EditorEvent::ObjectAdded(root) = event else {
                continue;
            };

            for id in scene.subtree(*root) {
                let Some(spatial) = scene.spatial(id) else {
                    continue;
                };
                let Some(mesh) = spatial.node.as_mesh() else {
                    continue;
                };

                let geometry = &mesh.geometry;
                let mut packets = vec![BufferPacket::positions(spatial.uuid, geometry.positions())];
                if let Some(indices) = geometry.indices() {
                    packets.push(BufferPacket::indices(spatial.uuid, indices));
                }

                for packet in packets {
                    let kind = packet.kind;
                    match self.sink.send(packet) {
                        Ok(()) => sent += 1,
                        Err(err) => {
                            tracing::warn!(object = %spatial.uuid, ?kind, "dropped mesh buffer: {err}");
                        }
                    }
                }
            }
        }

        sent
    }
}
