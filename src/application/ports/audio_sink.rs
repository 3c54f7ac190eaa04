//! Audio Sink Port - 推送式音频接收端
//!
//! 合成客户端每收到一段音频就调用一次 `write`

/// Audio Sink Port
///
/// 契约:
/// - 返回值是实际接收的字节数，小于 buffer 长度表示失败
/// - 不跨调用缓冲
/// - 不负责目标的打开与关闭
pub trait AudioSinkPort: Send {
    fn write(&mut self, buffer: &[u8]) -> usize;
}

impl<F> AudioSinkPort for F
where
    F: FnMut(&[u8]) -> usize + Send,
{
    fn write(&mut self, buffer: &[u8]) -> usize {
        self(buffer)
    }
}
