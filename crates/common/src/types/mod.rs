use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Root endpoint body: service banner plus the current server time.
#[derive(Serialize, Debug)]
pub struct ApiInfo {
    pub message: &'static str,
    pub timestamp: String,
}
