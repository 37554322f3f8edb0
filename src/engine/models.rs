/// Statistics of a single container as reported by the engine at fetch time.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct ContainerStatSample {
    #[serde(rename = "ContainerID")]
    pub container_id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "PIDs")]
    pub pids: u64,
    #[serde(rename = "CPU")]
    pub cpu: f64,
    #[serde(rename = "MemUsage")]
    pub mem_usage: u64,
    #[serde(rename = "MemLimit")]
    pub mem_limit: u64,
    #[serde(rename = "MemPerc")]
    pub mem_perc: f64,
    #[serde(rename = "NetInput")]
    pub net_input: u64,
    #[serde(rename = "NetOutput")]
    pub net_output: u64,
    #[serde(rename = "BlockInput")]
    pub block_input: u64,
    #[serde(rename = "BlockOutput")]
    pub block_output: u64,
}

/// Body of a non-streaming stats response.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub(super) struct StatsReport {
    #[serde(rename = "Error")]
    pub error: Option<serde_json::Value>,
    #[serde(rename = "Stats")]
    pub stats: Option<Vec<ContainerStatSample>>,
}

impl StatsReport {
    /// Returns the engine-side error message, if the report carries one.
    pub fn error_message(&self) -> Option<String> {
        match self.error.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(msg) => Some(msg.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Error body returned together with non-2xx statuses.
#[derive(Debug, serde::Deserialize)]
pub(super) struct ErrorResponse {
    pub message: String,
}
