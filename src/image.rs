//! URLs for the external image service. The service renders whatever text is
//! placed in the path, so this is templating only.

pub const IMAGE_SERVICE_URL: &str = "https://image.pollinations.ai/prompt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

pub const EXERCISE_THUMBNAIL: ImageSize = ImageSize {
    width: 100,
    height: 100,
};

pub const MEAL_BANNER: ImageSize = ImageSize {
    width: 400,
    height: 200,
};

/// Percent-encode `prompt` into a single path segment.
pub fn image_url(prompt: &str, size: ImageSize) -> String {
    format!(
        "{IMAGE_SERVICE_URL}/{}?width={}&height={}&nologo=true",
        urlencoding::encode(prompt),
        size.width,
        size.height
    )
}
