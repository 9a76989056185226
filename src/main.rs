use std::path::PathBuf;
use std::thread;

use sceneland::math::Vec3;
use sceneland::scene::{Geometry, Mesh, Pivot, Spatial, Transform};
use sceneland::settings::{self, Settings};
use sceneland::stream::{BufferStreamer, ChannelSink};
use sceneland::{AddObjectCommand, Command, Editor, History, RemoveObjectCommand, Result};

fn pump(editor: &mut Editor, streamer: Option<&BufferStreamer>) {
    let events = editor.drain_events();

    if let Some(streamer) = streamer {
        streamer.forward(editor, &events);
    }
}

fn main() -> Result<()> {
    sceneland::init_logging();

    let settings_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(settings::user_settings_path);
    let settings = Settings::load_or_default(&settings_path);

    let mut editor = Editor::new();
    let mut history = History::new(settings.history_limit);

    let (streamer, consumer) = if settings.stream.enabled {
        let (sink, rx) = ChannelSink::bounded(settings.stream.capacity);

        let consumer = thread::spawn(move || {
            for packet in rx {
                tracing::info!(
                    object = %packet.object,
                    kind = ?packet.kind,
                    bytes = packet.data.len(),
                    "received mesh buffer"
                );
            }
        });

        (Some(BufferStreamer::new(sink)), Some(consumer))
    } else {
        (None, None)
    };

    let cube = editor.insert_detached(
        Spatial::new("Box01", Mesh::new(Geometry::new_box(1.0, 1.0, 1.0)))
            .with_transform(Transform::from_position(Vec3::new(0.0, 0.5, 0.0))),
    );
    let cmd: Command = AddObjectCommand::new(&editor, cube)?.into();
    history.execute(&mut editor, cmd);
    pump(&mut editor, streamer.as_ref());

    let group = editor.insert_detached(Spatial::new("Group", Pivot::new()));
    let cmd: Command = AddObjectCommand::new(&editor, group)?.into();
    history.execute(&mut editor, cmd);
    pump(&mut editor, streamer.as_ref());

    let cmd: Command = RemoveObjectCommand::new(&editor, cube)?.into();
    history.execute(&mut editor, cmd);
    history.undo(&mut editor);
    pump(&mut editor, streamer.as_ref());

    let data = history.serialize(&editor)?;
    println!("{}", serde_json::to_string_pretty(&data)?);

    let restored = History::from_structured(&mut editor, data, settings.history_limit)?;
    for cmd in restored.undos().iter().chain(restored.redos()) {
        tracing::info!(id = cmd.id(), kind = %cmd.kind(), label = cmd.label(), "restored");
    }

    drop(streamer);
    if let Some(consumer) = consumer {
        if consumer.join().is_err() {
            tracing::warn!("buffer consumer panicked");
        }
    }

    Ok(())
}
