use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    pub query: Option<String>,
    pub num_images: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScrapeQuery {
    pub query: Option<String>,
    pub num_results: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct ImageResult {
    pub image_url: String,
    pub base64_data: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct PageResult {
    pub title: String,
    pub meta_description: String,
    pub content: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ImagesResponse {
    pub success: bool,
    pub query: String,
    pub results: Vec<ImageResult>,
}

#[derive(Debug, Serialize)]
pub struct ScrapeResponse {
    pub success: bool,
    pub query: String,
    pub results: Vec<PageResult>,
}
