use crate::serial::PortEntry;
use crate::signal::GeneratorParams;

// Commands the GUI sends to the engine thread.
#[derive(Clone, Debug)]
pub enum GuiCommand {
    RefreshPorts,
    Connect { port: String, baud: u32 },
    Disconnect,
    SendLine(String),
    SetLocalEcho(bool),
    SetParams(GeneratorParams),
    StartGenerator,
    StopGenerator,
    CreateBridge(u8, u8),
}

// Messages the engine reports back to the GUI.
#[derive(Clone, Debug)]
pub enum EngineMessage {
    /// Timestamped entry for the traffic log.
    Log(String),
    Ports(Vec<PortEntry>),
    Connected(bool),
    GeneratorRunning(bool),
    /// One entry for the parsed-line panel; `echo` marks local echo.
    Parsed { text: String, echo: bool },
    /// Numeric values accepted by the parser, in wire order.
    Samples(Vec<f64>),
}
