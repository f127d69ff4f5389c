//! Audio collaborator interface
//!
//! The simulation never synthesizes sound. The controller maps game events to
//! [`SoundEffect`]s and hands them to an [`AudioSink`], fire-and-forget.

use std::cell::RefCell;
use std::rc::Rc;

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player weapon volley
    Shot,
    /// Enemy destroyed
    Explosion,
    /// Enemy shot absorbed by the shield
    ShieldBlock,
    /// Enemy shot hit the hull
    PlayerHit,
    BonusCollected,
    LifeLost,
    GameOver,
}

impl SoundEffect {
    /// The effect a game event should trigger, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Shot { .. } => Some(SoundEffect::Shot),
            GameEvent::EnemyDestroyed { .. } => Some(SoundEffect::Explosion),
            GameEvent::ShieldBlocked => Some(SoundEffect::ShieldBlock),
            GameEvent::PlayerHit => Some(SoundEffect::PlayerHit),
            GameEvent::BonusCollected { .. } => Some(SoundEffect::BonusCollected),
            GameEvent::LifeLost { .. } => Some(SoundEffect::LifeLost),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::GameStarted | GameEvent::EnemyHit { .. } | GameEvent::SessionEnded => None,
        }
    }
}

/// Anything that can play a sound effect
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Discards every effect
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Logs effects instead of playing them; used by the headless binary
#[derive(Debug)]
pub struct LogAudio {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    played: u64,
}

impl Default for LogAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl LogAudio {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            played: 0,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Effects actually played (muted ones are not counted)
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.played += 1;
        log::trace!("sfx {effect:?} at {vol:.2}");
    }
}

/// Records effects into a shared buffer so a caller can inspect them after
/// handing the sink to a [`Simulation`](crate::sim::Simulation)
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    played: Rc<RefCell<Vec<SoundEffect>>>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Effects recorded so far
    pub fn played(&self) -> Vec<SoundEffect> {
        self.played.borrow().clone()
    }

    pub fn count(&self, effect: SoundEffect) -> usize {
        self.played.borrow().iter().filter(|e| **e == effect).count()
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, effect: SoundEffect) {
        self.played.borrow_mut().push(effect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{BonusAction, WeaponKind};
    use glam::Vec2;

    #[test]
    fn test_event_mapping() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Shot { weapon: WeaponKind::Gun }),
            Some(SoundEffect::Shot)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::EnemyDestroyed { enemy: 1, pos: Vec2::ZERO }),
            Some(SoundEffect::Explosion)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::BonusCollected { action: BonusAction::AddHealth }),
            Some(SoundEffect::BonusCollected)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::EnemyHit { enemy: 1 }), None);
        assert_eq!(SoundEffect::for_event(&GameEvent::SessionEnded), None);
    }

    #[test]
    fn test_muted_log_audio_skips() {
        let mut audio = LogAudio::new();
        audio.play(SoundEffect::Shot);
        audio.set_muted(true);
        audio.play(SoundEffect::Shot);
        assert_eq!(audio.played(), 1);

        audio.set_muted(false);
        audio.set_master_volume(-3.0);
        audio.play(SoundEffect::Shot);
        assert_eq!(audio.played(), 1);
    }

    #[test]
    fn test_recording_shares_buffer() {
        let recorder = RecordingAudio::new();
        let mut sink: Box<dyn AudioSink> = Box::new(recorder.clone());
        sink.play(SoundEffect::LifeLost);
        sink.play(SoundEffect::GameOver);
        assert_eq!(recorder.played(), vec![SoundEffect::LifeLost, SoundEffect::GameOver]);
        assert_eq!(recorder.count(SoundEffect::GameOver), 1);
    }
}
