pub mod audio_player;
pub mod offline;
