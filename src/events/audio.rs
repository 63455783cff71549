use bevy_ecs::message::Message;
use serde::{Deserialize, Serialize};

/// Sound effects the simulation can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sfx {
    Jump,
    Dash,
    Step1,
    Step2,
    Land,
    /// Wall-slide loop.
    Slide,
    Pain,
    FallScream,
    PitfallScream,
    Gib,
    Shoot,
    Hit,
}

impl Sfx {
    pub fn id(self) -> &'static str {
        match self {
            Sfx::Jump => "jump",
            Sfx::Dash => "dash",
            Sfx::Step1 => "step1",
            Sfx::Step2 => "step2",
            Sfx::Land => "land",
            Sfx::Slide => "slide",
            Sfx::Pain => "pain",
            Sfx::FallScream => "fall_scream",
            Sfx::PitfallScream => "pitfall_scream",
            Sfx::Gib => "gib",
            Sfx::Shoot => "shoot",
            Sfx::Hit => "hit",
        }
    }

    /// Nominal clip length in milliseconds; `None` for loops.
    pub fn duration_ms(self) -> Option<f32> {
        match self {
            Sfx::Slide => None,
            Sfx::Step1 | Sfx::Step2 => Some(150.0),
            Sfx::Land | Sfx::Shoot => Some(200.0),
            Sfx::Hit => Some(250.0),
            Sfx::Jump => Some(300.0),
            Sfx::Dash => Some(350.0),
            Sfx::Pain => Some(400.0),
            Sfx::Gib => Some(600.0),
            Sfx::FallScream => Some(1500.0),
            Sfx::PitfallScream => Some(2500.0),
        }
    }

    /// Sounds owned by the player; stopped on player respawn.
    pub const PLAYER: [Sfx; 11] = [
        Sfx::Jump,
        Sfx::Dash,
        Sfx::Step1,
        Sfx::Step2,
        Sfx::Land,
        Sfx::Slide,
        Sfx::Pain,
        Sfx::FallScream,
        Sfx::PitfallScream,
        Sfx::Gib,
        Sfx::Shoot,
    ];
}

/// Commands sent *to* the audio sink.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub enum AudioCmd {
    Play { sfx: Sfx },
    Stop { sfx: Sfx },
    Shutdown,
}

/// Messages sent *back* from the audio sink.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub enum AudioMessage {
    Started { sfx: Sfx },
    Finished { sfx: Sfx },
}
