pub mod doctor;
pub mod init;
pub mod list;
pub mod new;
pub mod preview;
pub mod render;
pub mod show;
