// Framework-free signal core: wire-protocol parsing, waveform synthesis and
// the bounded chart window. Nothing in here touches the serial port or egui.
pub mod chart;
pub mod generator;
pub mod protocol;
pub mod waveform;

pub use chart::ChartWindow;
pub use generator::{generate_tick, GeneratorParams, GeneratorState};
pub use protocol::{parse_line, LineAssembler, ParsedLine};
pub use waveform::{wave_value, Waveform};
