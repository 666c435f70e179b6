#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct SubscribeResponse {
    pub success: bool,
    pub message: String,
}

impl SubscribeResponse {
    pub fn success(message: &str) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: &str) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct SubscriberCountResponse {
    pub count: i64,
}
