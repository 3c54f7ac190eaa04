//! 输出文件名生成

/// 下载音频的固定扩展名
pub const AUDIO_FILE_EXTENSION: &str = ".wav";

/// 文件名非法字符（取各平台的并集，保证生成的名字到处可用）
const ILLEGAL_FILE_NAME_CHARS: &[char] = &['"', '<', '>', '|', ':', '*', '?', '\\', '/'];

fn is_illegal(c: char) -> bool {
    c == '\0' || ('\u{1}'..='\u{1f}').contains(&c) || ILLEGAL_FILE_NAME_CHARS.contains(&c)
}

fn has_audio_extension(text: &str) -> bool {
    let ext_len = AUDIO_FILE_EXTENSION.len();
    text.len() >= ext_len
        && text.is_char_boundary(text.len() - ext_len)
        && text[text.len() - ext_len..].eq_ignore_ascii_case(AUDIO_FILE_EXTENSION)
}

/// 由朗读文本生成文件名
///
/// 缺少扩展名时追加 `.wav`（不区分大小写），再把每个非法字符替换为一个空格。
/// 字符数量与位置保持不变。
pub fn derive_file_name(text: &str) -> String {
    let mut name = String::with_capacity(text.len() + AUDIO_FILE_EXTENSION.len());
    name.push_str(text);
    if !has_audio_extension(text) {
        name.push_str(AUDIO_FILE_EXTENSION);
    }

    name.chars()
        .map(|c| if is_illegal(c) { ' ' } else { c })
        .collect()
}
