//! Stream Audio Sink - 把推送式音频写入任意字节流
//!
//! 实现 AudioSinkPort。目标流由调用方打开和关闭，这里只负责写。

use std::io::{ErrorKind, Write};

use crate::application::ports::AudioSinkPort;

/// 字节流音频接收端
pub struct StreamAudioSink<W> {
    stream: W,
}

impl<W: Write + Send> StreamAudioSink<W> {
    pub fn new(stream: W) -> Self {
        Self { stream }
    }
}

impl<W: Write + Send> AudioSinkPort for StreamAudioSink<W> {
    fn write(&mut self, buffer: &[u8]) -> usize {
        let mut written = 0;
        while written < buffer.len() {
            match self.stream.write(&buffer[written..]) {
                Ok(0) => {
                    tracing::warn!(
                        written,
                        expected = buffer.len(),
                        "Audio stream refused more bytes"
                    );
                    break;
                }
                Ok(n) => written += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::warn!(
                        written,
                        expected = buffer.len(),
                        error = %e,
                        "Audio stream write failed"
                    );
                    break;
                }
            }
        }
        written
    }
}
