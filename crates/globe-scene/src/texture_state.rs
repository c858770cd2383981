//! Per-channel texture lifecycle tracking.

use globe_assets::TextureChannel;

/// Where a channel's texture is in its lifecycle.
///
/// `Requested` moves to `Applied` or `Failed`. A failed diffuse channel moves
/// on to `FallbackApplied` in the same step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextureState {
    /// Not requested yet.
    #[default]
    Idle,
    Requested,
    Applied,
    Failed,
    FallbackApplied,
}

impl TextureState {
    /// No further transition is expected.
    pub fn is_settled(self) -> bool {
        matches!(
            self,
            TextureState::Applied | TextureState::Failed | TextureState::FallbackApplied
        )
    }
}

/// One [`TextureState`] per [`TextureChannel`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextureStates([TextureState; 4]);

impl TextureStates {
    pub fn get(&self, channel: TextureChannel) -> TextureState {
        self.0[channel.index()]
    }

    pub fn set(&mut self, channel: TextureChannel, state: TextureState) {
        self.0[channel.index()] = state;
    }

    /// Every channel has reached a terminal state.
    pub fn all_settled(&self) -> bool {
        self.0.iter().all(|s| s.is_settled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_states_are_per_channel() {
        let mut states = TextureStates::default();
        states.set(TextureChannel::Bump, TextureState::Failed);
        assert_eq!(states.get(TextureChannel::Bump), TextureState::Failed);
        assert_eq!(states.get(TextureChannel::Diffuse), TextureState::Idle);
        assert!(!states.all_settled());

        for channel in TextureChannel::ALL {
            states.set(channel, TextureState::Applied);
        }
        assert!(states.all_settled());
    }
}
