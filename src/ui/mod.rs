pub mod app;
pub mod controls;
pub mod state_table;
pub mod url_bar;
pub mod video_player;
