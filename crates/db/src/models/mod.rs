pub mod ai_voice;
pub mod prompt;
pub mod script;
pub mod video;
