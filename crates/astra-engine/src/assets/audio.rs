/// Sound playback contract. The engine only requests sounds by name;
/// decoding and output live on the host side.
pub trait AudioRegistry {
    /// Request playback. Unknown names must not panic.
    fn play(&mut self, name: &str);

    fn sound_exists(&self, name: &str) -> bool;
}

/// Default backend: swallows every request, logging at debug level.
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioRegistry for NullAudio {
    fn play(&mut self, name: &str) {
        log::debug!("audio (null backend): {}", name);
    }

    fn sound_exists(&self, _name: &str) -> bool {
        false
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Test backend recording every play request.
    #[derive(Debug, Default)]
    pub struct RecordingAudio {
        pub played: Vec<String>,
    }

    impl AudioRegistry for RecordingAudio {
        fn play(&mut self, name: &str) {
            self.played.push(name.to_string());
        }

        fn sound_exists(&self, _name: &str) -> bool {
            true
        }
    }
}
