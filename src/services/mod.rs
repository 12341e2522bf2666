pub mod audio;
pub mod llm;
pub mod reply;
pub mod stt;
