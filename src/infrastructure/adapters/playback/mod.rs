//! Playback Adapter - 本地设备播放

#[cfg(feature = "playback")]
mod rodio_playback;

#[cfg(feature = "playback")]
pub use rodio_playback::RodioPlayback;
