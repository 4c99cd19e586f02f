//! Host audio device probing, used to feature-detect speech output and
//! microphone input before a session enables those channels.

pub mod device;
