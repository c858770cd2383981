//! The four texture maps a globe can carry.

use std::fmt;

use globe_config::TextureConfig;

/// Identifies which material slot a texture is destined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureChannel {
    /// Planet colour map.
    Diffuse,
    /// Planet bump map.
    Bump,
    /// Planet specular map.
    Specular,
    /// Cloud shell map.
    Cloud,
}

impl TextureChannel {
    /// All channels, in request order.
    pub const ALL: [TextureChannel; 4] = [
        TextureChannel::Diffuse,
        TextureChannel::Bump,
        TextureChannel::Specular,
        TextureChannel::Cloud,
    ];

    /// Lower-case channel name used in log messages.
    pub fn name(self) -> &'static str {
        match self {
            TextureChannel::Diffuse => "diffuse",
            TextureChannel::Bump => "bump",
            TextureChannel::Specular => "specular",
            TextureChannel::Cloud => "cloud",
        }
    }

    /// The configured URL or path for this channel.
    pub fn location(self, config: &TextureConfig) -> &str {
        match self {
            TextureChannel::Diffuse => &config.diffuse_url,
            TextureChannel::Bump => &config.bump_url,
            TextureChannel::Specular => &config.specular_url,
            TextureChannel::Cloud => &config.cloud_url,
        }
    }

    /// Index into per-channel arrays.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TextureChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_match_all_order() {
        for (i, channel) in TextureChannel::ALL.iter().enumerate() {
            assert_eq!(channel.index(), i);
        }
    }

    #[test]
    fn test_default_locations() {
        let config = TextureConfig::default();
        assert!(TextureChannel::Diffuse.location(&config).ends_with("earth_atmos_2048.jpg"));
        assert!(TextureChannel::Bump.location(&config).ends_with("earth_normal_2048.jpg"));
        assert!(
            TextureChannel::Specular
                .location(&config)
                .ends_with("earth_specular_2048.jpg")
        );
        assert!(TextureChannel::Cloud.location(&config).ends_with("earth_clouds_1024.png"));
    }

    #[test]
    fn test_display_uses_name() {
        assert_eq!(TextureChannel::Cloud.to_string(), "cloud");
    }
}
