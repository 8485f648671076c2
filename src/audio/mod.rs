/// Plan-driven PCM looping and raw PCM output.
pub mod mix;
