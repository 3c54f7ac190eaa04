//! Sink Adapter - 音频接收端实现

mod stream_sink;

pub use stream_sink::StreamAudioSink;
