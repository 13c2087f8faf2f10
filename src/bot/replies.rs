use rand::Rng;
use serde::Serialize;

pub const STICKER_PACKAGE_ID: &str = "11539";
pub const STICKER_ID_MIN: u32 = 52114110;
pub const STICKER_ID_MAX: u32 = 52114149;

const IMAGE_URL: &str = "https://www.yzu.edu.tw/aboutyzu/images/main/origin-logo.png";
const VIDEO_URL: &str =
    "https://raw.githubusercontent.com/openai/openai-cookbook/main/examples/data/bison.mp4";
const VIDEO_PREVIEW_URL: &str =
    "https://raw.githubusercontent.com/openai/openai-cookbook/main/images/openai-cookbook-white.png";

const HELP_TEXT: &str = "[基本指令]
用法：`<指令>`
例如：sticker
將會回覆一張貼圖
- `help` 傳送幫助
- `sticker` 傳送貼圖
- `image` 傳送圖片
- `video` 傳送影片
- `location` 傳送地點

[Gemini/AI 指令]
用法：`<指令>:<內容>`
例如：gemini:哈囉
將會回覆 gemini 對哈囉的回答
- `gemini` 詢問 Gemini，並傳送回答
- `translate` 將內容翻譯成英文";

/// Closed set of reply payloads, serialized to the LINE message shape
/// (`type` tag plus camelCase fields). Every place a reply is built or
/// serialized matches this exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReplyMessage {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    Sticker {
        package_id: String,
        sticker_id: String,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        original_content_url: String,
        preview_image_url: String,
    },
    #[serde(rename_all = "camelCase")]
    Video {
        original_content_url: String,
        preview_image_url: String,
    },
    Location {
        title: String,
        address: String,
        latitude: f64,
        longitude: f64,
    },
}

impl ReplyMessage {
    pub fn text(text: impl Into<String>) -> Self {
        ReplyMessage::Text { text: text.into() }
    }

    /// Sticker id is uniform over the fixed range within the fixed package.
    pub fn sticker() -> Self {
        let sticker_id = rand::thread_rng().gen_range(STICKER_ID_MIN..=STICKER_ID_MAX);
        ReplyMessage::Sticker {
            package_id: STICKER_PACKAGE_ID.to_string(),
            sticker_id: sticker_id.to_string(),
        }
    }

    pub fn image() -> Self {
        ReplyMessage::Image {
            original_content_url: IMAGE_URL.to_string(),
            preview_image_url: IMAGE_URL.to_string(),
        }
    }

    pub fn video() -> Self {
        ReplyMessage::Video {
            original_content_url: VIDEO_URL.to_string(),
            preview_image_url: VIDEO_PREVIEW_URL.to_string(),
        }
    }

    pub fn location() -> Self {
        ReplyMessage::Location {
            title: "LINEヤフー株式会社 本社".to_string(),
            address: "1-3 Kioicho, Chiyoda-ku, Tokyo, 102-8282, Japan".to_string(),
            latitude: 35.67966,
            longitude: 139.73669,
        }
    }

    pub fn help() -> Self {
        ReplyMessage::text(HELP_TEXT)
    }
}
