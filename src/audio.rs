//! Footsteps, the win jingle and looping level music, played through kira.
//!
//! Sound is optional. Without an output device, or with files missing, the game
//! runs silent and says so in the log.

use std::collections::HashMap;
use std::path::Path;

use kira::{
    Volume,
    manager::{AudioManager as KiraManager, AudioManagerSettings, backend::DefaultBackend},
    sound::static_sound::{StaticSoundData, StaticSoundHandle, StaticSoundSettings},
    tween::Tween,
};

use crate::config::SoundConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    Walk,
    Win,
    Music,
}

pub struct Audio {
    manager: Option<KiraManager>,
    sounds: HashMap<Sound, StaticSoundData>,
    music_volume: f64,
    /// Set while a movement key is held; the step sound starts once per press.
    walking: bool,
    walk_handle: Option<StaticSoundHandle>,
    music_handle: Option<StaticSoundHandle>,
}

impl Audio {
    pub fn new(config: &SoundConfig) -> Self {
        let manager = match KiraManager::<DefaultBackend>::new(AudioManagerSettings::default()) {
            Ok(m) => {
                log::info!("Audio manager initialized");
                Some(m)
            }
            Err(e) => {
                log::warn!("Failed to initialize audio manager: {}. Audio disabled.", e);
                None
            }
        };
        Self::with_manager(manager, config)
    }

    fn with_manager(manager: Option<KiraManager>, config: &SoundConfig) -> Self {
        let mut audio = Self {
            manager,
            sounds: HashMap::new(),
            music_volume: config.music_volume.clamp(0.0, 1.0),
            walking: false,
            walk_handle: None,
            music_handle: None,
        };
        if audio.manager.is_some() {
            audio.load(Sound::Walk, &config.walk);
            audio.load(Sound::Win, &config.win);
            audio.load(Sound::Music, &config.music);
        }
        audio
    }

    fn load(&mut self, sound: Sound, path: &Path) {
        match StaticSoundData::from_file(path) {
            Ok(data) => {
                log::debug!("Loaded {:?} sound from {}", sound, path.display());
                self.sounds.insert(sound, data);
            }
            Err(e) => log::warn!("Failed to load {:?} sound from {}: {}", sound, path.display(), e),
        }
    }

    fn play(&mut self, sound: Sound, settings: StaticSoundSettings) -> Option<StaticSoundHandle> {
        let data = self.sounds.get(&sound)?.clone().with_settings(settings);
        let manager = self.manager.as_mut()?;
        match manager.play(data) {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::debug!("Failed to play {:?}: {:?}", sound, e);
                None
            }
        }
    }

    /// Start the level music from the top, looping, at the configured volume.
    pub fn start_music(&mut self) {
        self.stop_music();
        let settings = StaticSoundSettings::new()
            .loop_region(..)
            .volume(Volume::Amplitude(self.music_volume));
        self.music_handle = self.play(Sound::Music, settings);
    }

    pub fn stop_music(&mut self) {
        if let Some(mut handle) = self.music_handle.take() {
            handle.stop(Tween::default());
        }
    }

    /// Called every tick with whether the player is moving. The step sound plays
    /// once when movement starts and is cut when it stops.
    pub fn set_walking(&mut self, walking: bool) {
        if walking == self.walking {
            return;
        }
        self.walking = walking;
        if walking {
            self.walk_handle = self.play(Sound::Walk, StaticSoundSettings::new());
        } else if let Some(mut handle) = self.walk_handle.take() {
            handle.stop(Tween::default());
        }
    }

    /// Silence the level and play the win sound.
    pub fn play_win(&mut self) {
        self.set_walking(false);
        self.stop_music();
        // Fire and forget; the game closes a few seconds later
        let _ = self.play(Sound::Win, StaticSoundSettings::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn missing_files() -> SoundConfig {
        SoundConfig {
            walk: PathBuf::from("/no/such/walk.wav"),
            win: PathBuf::from("/no/such/dooropen.mp3"),
            music: PathBuf::from("/no/such/musics.mp3"),
            music_volume: 3.0,
        }
    }

    #[test]
    fn test_silent_audio_tracks_walking() {
        let mut audio = Audio::with_manager(None, &missing_files());
        assert!(audio.sounds.is_empty());
        assert_eq!(audio.music_volume, 1.0);

        audio.set_walking(true);
        assert!(audio.walking);
        audio.set_walking(true);
        audio.set_walking(false);
        assert!(!audio.walking);
        assert!(audio.walk_handle.is_none());
    }

    #[test]
    fn test_silent_audio_survives_a_whole_level() {
        let mut audio = Audio::with_manager(None, &missing_files());
        audio.start_music();
        assert!(audio.music_handle.is_none());
        audio.set_walking(true);
        audio.play_win();
        assert!(!audio.walking);
        assert!(audio.music_handle.is_none());
    }

    #[test]
    fn test_missing_files_leave_nothing_loaded() {
        // Uses the real device when there is one; either way nothing can load
        let audio = Audio::new(&missing_files());
        assert!(audio.sounds.is_empty());
    }
}
