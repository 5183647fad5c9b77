mod bloom;
mod dimmer;

pub use bloom::Bloom;
pub use dimmer::Dimmer;
