use crate::{
    config::Config,
    error::{AppError, Result},
    models::station::NowPlaying,
};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// 电台流媒体状态服务
/// 每次请求直接转询流媒体服务器的状态端点，不做进程内缓存，
/// 超时完全依赖 HTTP 客户端自身的配置
#[derive(Clone)]
pub struct StationService {
    config: Config,
    http_client: Client,
}

impl StationService {
    pub async fn new(config: &Config) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config: config.clone(),
            http_client,
        })
    }

    /// 获取当前播放信息
    pub async fn now_playing(&self) -> Result<NowPlaying> {
        debug!(
            "Fetching stream status from {}",
            self.config.stream_status_url
        );

        let status: Value = self
            .http_client
            .get(&self.config.stream_status_url)
            .send()
            .await?
            .json()
            .await?;

        let (title, artist, listeners) = Self::parse_source(&status);

        Ok(NowPlaying {
            station: self.config.station_name.clone(),
            title,
            artist,
            listeners,
            stream_url: self.config.stream_url.clone(),
        })
    }

    /// 解析 Icecast 的 status-json.xsl 结构
    /// source 可能是对象（单个挂载点）或数组，数组取第一个；
    /// 流标题惯例为 "Artist - Title"
    fn parse_source(status: &Value) -> (Option<String>, Option<String>, Option<i64>) {
        let source = match status.get("icestats").and_then(|v| v.get("source")) {
            Some(Value::Array(items)) => items.first(),
            Some(source) => Some(source),
            None => None,
        };

        let source = match source {
            Some(source) => source,
            None => return (None, None, None),
        };

        let listeners = source.get("listeners").and_then(|v| v.as_i64());

        let raw_title = source.get("title").and_then(|v| v.as_str());
        let (title, artist) = match raw_title {
            Some(raw) => match raw.split_once(" - ") {
                Some((artist, title)) => {
                    (Some(title.trim().to_string()), Some(artist.trim().to_string()))
                }
                None => (Some(raw.trim().to_string()), None),
            },
            None => (None, None),
        };

        (title, artist, listeners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_source_object() {
        let status = json!({
            "icestats": {
                "source": {
                    "title": "The Midnight - Days of Thunder",
                    "listeners": 42
                }
            }
        });

        let (title, artist, listeners) = StationService::parse_source(&status);
        assert_eq!(title.as_deref(), Some("Days of Thunder"));
        assert_eq!(artist.as_deref(), Some("The Midnight"));
        assert_eq!(listeners, Some(42));
    }

    #[test]
    fn test_parse_source_array_takes_first_mount() {
        let status = json!({
            "icestats": {
                "source": [
                    { "title": "News at noon", "listeners": 7 },
                    { "title": "Other - Mount", "listeners": 1 }
                ]
            }
        });

        let (title, artist, listeners) = StationService::parse_source(&status);
        assert_eq!(title.as_deref(), Some("News at noon"));
        assert_eq!(artist, None);
        assert_eq!(listeners, Some(7));
    }

    #[test]
    fn test_parse_source_missing() {
        let status = json!({ "icestats": {} });

        let (title, artist, listeners) = StationService::parse_source(&status);
        assert_eq!(title, None);
        assert_eq!(artist, None);
        assert_eq!(listeners, None);
    }
}
