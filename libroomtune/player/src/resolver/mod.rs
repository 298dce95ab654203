mod yt_dlp;

pub use yt_dlp::*;
