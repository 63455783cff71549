//! Audio plumbing between the simulation and the sink.
//!
//! - [`audio_thread`] is the headless sink: it owns no device, logs every
//!   command and reports clips as finished once their nominal length has
//!   passed in wall time.
//! - [`poll_audio_messages`] drains sink messages into `Messages<AudioMessage>`.
//! - [`sync_playing_sounds`] counts down the [`PlayingSounds`] mirror by
//!   simulation time. Sink reports are only logged; the mirror never follows
//!   the sink's wall clock, so replays of the same input stay identical.
//! - [`forward_audio_cmds`] ships this tick's commands to the sink.
//! - [`update_bevy_audio_messages`] / [`update_bevy_audio_cmds`] advance the
//!   message queues.

use std::time::{Duration, Instant};

use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use log::{debug, info};
use rustc_hash::FxHashMap;

use crate::events::audio::{AudioCmd, AudioMessage, Sfx};
use crate::resources::audio::{AudioBridge, PlayingSounds};
use crate::resources::worldtime::WorldTime;

/// Drain pending sink messages into the ECS mailbox.
pub fn poll_audio_messages(
    bridge: Option<Res<AudioBridge>>,
    mut writer: MessageWriter<AudioMessage>,
) {
    if let Some(bridge) = bridge {
        writer.write_batch(bridge.rx_msg.try_iter());
    }
}

/// Count down nominal clip lengths.
pub fn sync_playing_sounds(
    time: Res<WorldTime>,
    mut playing: ResMut<PlayingSounds>,
    mut reader: MessageReader<AudioMessage>,
) {
    for msg in reader.read() {
        if let AudioMessage::Finished { sfx } = msg
            && playing.is_playing(*sfx)
        {
            debug!("[audio] sink finished '{}' ahead of the simulation", sfx.id());
        }
    }
    playing.advance(time.delta_ms());
}

/// Forward this tick's [`AudioCmd`]s to the sink, if one is bridged.
pub fn forward_audio_cmds(bridge: Option<Res<AudioBridge>>, mut reader: MessageReader<AudioCmd>) {
    let Some(bridge) = bridge else {
        // drain so the reader cursor keeps up
        reader.read().for_each(drop);
        return;
    };
    for cmd in reader.read() {
        // ignore send error on shutdown
        let _ = bridge.tx_cmd.send(cmd.clone());
    }
}

pub fn update_bevy_audio_messages(mut msgs: ResMut<Messages<AudioMessage>>) {
    msgs.update();
}

pub fn update_bevy_audio_cmds(mut msgs: ResMut<Messages<AudioCmd>>) {
    msgs.update();
}

/// Entry point of the headless sink thread.
///
/// Blocks until [`AudioCmd::Shutdown`] arrives or the command channel closes.
pub fn audio_thread(rx_cmd: Receiver<AudioCmd>, tx_msg: Sender<AudioMessage>) {
    info!("[audio] sink starting (id={:?})", std::thread::current().id());

    let mut playing: FxHashMap<Sfx, Option<Instant>> = FxHashMap::default();

    'run: loop {
        match rx_cmd.recv_timeout(Duration::from_millis(10)) {
            Ok(AudioCmd::Play { sfx }) => {
                debug!("[audio] play id='{}'", sfx.id());
                let ends = sfx
                    .duration_ms()
                    .map(|ms| Instant::now() + Duration::from_millis(ms as u64));
                playing.insert(sfx, ends);
                let _ = tx_msg.send(AudioMessage::Started { sfx });
            }
            Ok(AudioCmd::Stop { sfx }) => {
                debug!("[audio] stop id='{}'", sfx.id());
                playing.remove(&sfx);
            }
            Ok(AudioCmd::Shutdown) => {
                info!("[audio] shutdown requested");
                break 'run;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break 'run,
        }

        let now = Instant::now();
        let ended: Vec<Sfx> = playing
            .iter()
            .filter_map(|(sfx, ends)| ends.filter(|t| *t <= now).map(|_| *sfx))
            .collect();
        for sfx in ended {
            debug!("[audio] finished id='{}'", sfx.id());
            playing.remove(&sfx);
            let _ = tx_msg.send(AudioMessage::Finished { sfx });
        }
    }

    info!("[audio] sink exiting (id={:?})", std::thread::current().id());
}
