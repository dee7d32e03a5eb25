use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ConnectionRequestBody {
    pub to: String,
    #[serde(default)]
    pub message: String,
}
