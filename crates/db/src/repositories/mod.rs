pub mod ai_voice_repo;
pub mod prompt_repo;
pub mod script_repo;
pub mod video_repo;

pub use ai_voice_repo::AiVoiceRepo;
pub use prompt_repo::PromptRepo;
pub use script_repo::ScriptRepo;
pub use video_repo::VideoRepo;
