use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub text: String,
    pub summary: String,
    pub keywords: Vec<String>,
}
