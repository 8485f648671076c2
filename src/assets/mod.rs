/// Media decoding through the system `ffmpeg`.
pub mod media;
