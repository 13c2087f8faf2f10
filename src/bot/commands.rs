/// Fixed command set, classified from raw message text. Priority order is
/// the declaration order below; the first match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    KeyGen,
    Sticker,
    Image,
    Video,
    Location,
    Gemini(&'a str),
    Translate(&'a str),
    Help,
}

impl<'a> Command<'a> {
    /// Case-insensitive exact/prefix matching. Only the `gemini:` and
    /// `translate:` prefixes are matched case-insensitively; the remainder
    /// is forwarded untouched.
    pub fn classify(text: &'a str) -> Self {
        if text.eq_ignore_ascii_case("api-keygen") {
            Command::KeyGen
        } else if text.eq_ignore_ascii_case("sticker") {
            Command::Sticker
        } else if text.eq_ignore_ascii_case("image") {
            Command::Image
        } else if text.eq_ignore_ascii_case("video") {
            Command::Video
        } else if text.eq_ignore_ascii_case("location") {
            Command::Location
        } else if let Some(rest) = strip_prefix_ignore_case(text, "gemini:") {
            Command::Gemini(rest)
        } else if let Some(rest) = strip_prefix_ignore_case(text, "translate:") {
            Command::Translate(rest)
        } else {
            Command::Help
        }
    }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}
