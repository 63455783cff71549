//! ECS resources that bridge the simulation with the audio sink.
//!
//! Playback itself is external. Systems request sounds through the [`Audio`]
//! system parameter, which queues [`AudioCmd`] messages and keeps the
//! [`PlayingSounds`] mirror up to date so `is_playing` checks stay
//! deterministic inside the tick. At the end of the tick the commands are
//! forwarded over the [`AudioBridge`] channel, if one is installed.
//!
//! Use [`setup_audio`] once during initialization to spawn the headless sink
//! thread, or [`bridge_audio`] to hand the channel ends to a host sink. Call
//! [`shutdown_audio`] during teardown.

use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemParam;
use crossbeam_channel::{Receiver, Sender, unbounded};
use rustc_hash::FxHashMap;

use crate::events::audio::{AudioCmd, AudioMessage, Sfx};
use crate::systems::audio::audio_thread;

/// Shared bridge between the ECS world and the audio sink.
#[derive(Resource)]
pub struct AudioBridge {
    /// Sender for [`AudioCmd`] messages (ECS -> sink).
    pub tx_cmd: Sender<AudioCmd>,
    /// Receiver for [`AudioMessage`] messages (sink -> ECS).
    pub rx_msg: Receiver<AudioMessage>,
    /// Join handle when the sink runs on a thread we spawned.
    pub handle: Option<std::thread::JoinHandle<()>>,
}

/// Sink-side channel ends returned by [`bridge_audio`].
pub struct AudioSinkEnds {
    pub rx_cmd: Receiver<AudioCmd>,
    pub tx_msg: Sender<AudioMessage>,
}

/// Insert the audio message queues and the playing mirror without a sink.
pub fn init_audio_messages(world: &mut World) {
    world.insert_resource(Messages::<AudioMessage>::default());
    world.insert_resource(Messages::<AudioCmd>::default());
    world.init_resource::<PlayingSounds>();
}

/// Spawn the headless sink thread and register bridge resources.
pub fn setup_audio(world: &mut World) {
    let (tx_cmd, rx_cmd) = unbounded::<AudioCmd>();
    let (tx_msg, rx_msg) = unbounded::<AudioMessage>();

    let handle = std::thread::spawn(move || audio_thread(rx_cmd, tx_msg));

    world.insert_resource(AudioBridge {
        tx_cmd,
        rx_msg,
        handle: Some(handle),
    });
    init_audio_messages(world);
}

/// Register bridge resources and return the channel ends for a host sink.
pub fn bridge_audio(world: &mut World) -> AudioSinkEnds {
    let (tx_cmd, rx_cmd) = unbounded::<AudioCmd>();
    let (tx_msg, rx_msg) = unbounded::<AudioMessage>();
    world.insert_resource(AudioBridge {
        tx_cmd,
        rx_msg,
        handle: None,
    });
    init_audio_messages(world);
    AudioSinkEnds { rx_cmd, tx_msg }
}

/// Request sink shutdown and join the thread if we own it.
pub fn shutdown_audio(world: &mut World) {
    if let Some(bridge) = world.remove_resource::<AudioBridge>() {
        let _ = bridge.tx_cmd.send(AudioCmd::Shutdown);
        if let Some(handle) = bridge.handle {
            let _ = handle.join();
        }
    }
}

/// Sounds considered playing, with their remaining nominal time in ms.
///
/// Loops have no remaining time and play until stopped.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlayingSounds {
    pub remaining: FxHashMap<Sfx, Option<f32>>,
}

impl PlayingSounds {
    pub fn is_playing(&self, sfx: Sfx) -> bool {
        self.remaining.contains_key(&sfx)
    }

    pub fn start(&mut self, sfx: Sfx) {
        self.remaining.insert(sfx, sfx.duration_ms());
    }

    pub fn stop(&mut self, sfx: Sfx) {
        self.remaining.remove(&sfx);
    }

    /// Count down one tick and drop finished clips.
    pub fn advance(&mut self, dt_ms: f32) {
        self.remaining.retain(|_, left| match left {
            Some(ms) => {
                *ms -= dt_ms;
                *ms > 0.0
            }
            None => true,
        });
    }
}

/// Audio front-end for gameplay systems.
#[derive(SystemParam)]
pub struct Audio<'w> {
    cmds: MessageWriter<'w, AudioCmd>,
    playing: ResMut<'w, PlayingSounds>,
}

impl Audio<'_> {
    pub fn play(&mut self, sfx: Sfx) {
        self.playing.start(sfx);
        self.cmds.write(AudioCmd::Play { sfx });
    }

    /// Play unless the clip is still playing.
    pub fn play_once(&mut self, sfx: Sfx) {
        if !self.playing.is_playing(sfx) {
            self.play(sfx);
        }
    }

    pub fn stop(&mut self, sfx: Sfx) {
        if self.playing.is_playing(sfx) {
            self.playing.stop(sfx);
            self.cmds.write(AudioCmd::Stop { sfx });
        }
    }

    pub fn is_playing(&self, sfx: Sfx) -> bool {
        self.playing.is_playing(sfx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clips_expire_and_loops_persist() {
        let mut p = PlayingSounds::default();
        p.start(Sfx::Step1);
        p.start(Sfx::Slide);
        p.advance(100.0);
        assert!(p.is_playing(Sfx::Step1));
        p.advance(100.0);
        assert!(!p.is_playing(Sfx::Step1));
        assert!(p.is_playing(Sfx::Slide));
        p.stop(Sfx::Slide);
        assert!(!p.is_playing(Sfx::Slide));
    }
}
