pub mod ai_voices;
pub mod dispatch;
pub mod generation;
pub mod image_to_video;
pub mod prompts;
pub mod research;
pub mod scripts;
pub mod text_to_image;
pub mod text_to_speech;
pub mod text_to_video;
pub mod utils;
pub mod videos;
