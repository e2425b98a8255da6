//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.
//! Each port is a single capability so tests can swap in deterministic fakes.

mod audio_publisher_port;
mod generator_port;
mod synthesizer_port;
mod transcriber_port;

#[cfg(test)]
pub use audio_publisher_port::MockAudioPublisherPort;
pub use audio_publisher_port::AudioPublisherPort;
#[cfg(test)]
pub use generator_port::MockGeneratorPort;
pub use generator_port::GeneratorPort;
#[cfg(test)]
pub use synthesizer_port::MockSynthesizerPort;
pub use synthesizer_port::SynthesizerPort;
#[cfg(test)]
pub use transcriber_port::MockTranscriberPort;
pub use transcriber_port::TranscriberPort;
