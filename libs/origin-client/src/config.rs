#[derive(Debug, Clone, serde::Deserialize)]
pub struct OriginConfig {
    #[serde(default = "base_url_default")]
    pub base_url: String,
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            base_url: base_url_default(),
        }
    }
}

fn base_url_default() -> String { "http://localhost:4000".into() }
