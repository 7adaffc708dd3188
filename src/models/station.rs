use serde::{Deserialize, Serialize};

/// 当前播放信息，来自流媒体服务器的状态端点，不落库
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NowPlaying {
    pub station: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub listeners: Option<i64>,
    pub stream_url: String,
}
