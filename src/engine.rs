use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::bridge;
use crate::serial::{available_ports, SerialLink};
use crate::signal::{
    generate_tick, parse_line, GeneratorParams, GeneratorState, LineAssembler, ParsedLine,
};
use crate::types::{EngineMessage, GuiCommand};

const READ_CHUNK: usize = 512;

struct Engine {
    tx: Sender<EngineMessage>,
    link: Option<SerialLink>,
    assembler: LineAssembler,
    params: GeneratorParams,
    gen_state: GeneratorState,
    generating: bool,
    local_echo: bool,
    last_tick: Instant,
}

pub fn spawn_thread(tx: Sender<EngineMessage>, rx_cmd: Receiver<GuiCommand>) {
    thread::spawn(move || {
        let mut engine = Engine {
            tx,
            link: None,
            assembler: LineAssembler::new(),
            params: GeneratorParams::default(),
            gen_state: GeneratorState::default(),
            generating: false,
            local_echo: true,
            last_tick: Instant::now(),
        };

        engine.log("Ready.");
        engine.refresh_ports();

        loop {
            // Drain a bounded batch of GUI commands per iteration.
            for _ in 0..16 {
                match rx_cmd.try_recv() {
                    Ok(cmd) => engine.handle_command(cmd),
                    Err(std::sync::mpsc::TryRecvError::Empty) => break,
                    Err(std::sync::mpsc::TryRecvError::Disconnected) => return,
                }
            }

            if engine.link.is_some() {
                engine.pump_serial();
                engine.maybe_tick();
            } else {
                thread::sleep(Duration::from_millis(25));
            }
        }
    });
}

impl Engine {
    fn send(&self, msg: EngineMessage) {
        self.tx.send(msg).ok();
    }

    fn log(&self, text: &str) {
        info!("{text}");
        self.send(EngineMessage::Log(text.to_string()));
    }

    fn handle_command(&mut self, cmd: GuiCommand) {
        match cmd {
            GuiCommand::RefreshPorts => self.refresh_ports(),
            GuiCommand::Connect { port, baud } => self.connect(&port, baud),
            GuiCommand::Disconnect => self.disconnect(),
            GuiCommand::SendLine(line) => self.send_manual(&line),
            GuiCommand::SetLocalEcho(on) => self.local_echo = on,
            GuiCommand::SetParams(params) => self.params = params,
            GuiCommand::StartGenerator => self.start_generator(),
            GuiCommand::StopGenerator => self.stop_generator(),
            GuiCommand::CreateBridge(a, b) => match bridge::create_local_bridge(a, b) {
                Ok(()) => self.log(&format!("Bridge COM{a}<->COM{b} created.")),
                Err(e) => self.log(&format!("Bridge failed: {e:#}")),
            },
        }
    }

    fn refresh_ports(&mut self) {
        match available_ports() {
            Ok(ports) => {
                self.log(&format!("Found {} port(s).", ports.len()));
                self.send(EngineMessage::Ports(ports));
            }
            Err(e) => self.log(&format!("Port scan failed: {e}")),
        }
    }

    fn connect(&mut self, port: &str, baud: u32) {
        if self.link.is_some() {
            self.log("Port already open.");
            return;
        }
        match SerialLink::open(port, baud) {
            Ok(link) => {
                self.log(&format!("Connected to {} @ {} baud.", link.name(), baud));
                self.link = Some(link);
                self.assembler = LineAssembler::new();
                self.send(EngineMessage::Connected(true));
            }
            Err(e) => self.log(&format!("Open failed: {e}")),
        }
    }

    fn disconnect(&mut self) {
        if self.link.is_none() {
            return;
        }
        self.stop_generator();
        self.link = None;
        self.send(EngineMessage::Connected(false));
        self.log("Disconnected.");
    }

    fn send_manual(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        let Some(link) = self.link.as_mut() else {
            self.log("Port is not open.");
            return;
        };
        match link.write_line(line) {
            Ok(()) => {
                let line = line.to_string();
                self.log(&format!("TX: {line}"));
                if self.local_echo {
                    self.dispatch_line(&line, true);
                }
            }
            Err(e) => {
                warn!("write failed: {e}");
                self.log(&format!("Write failed: {e}"));
                self.disconnect();
            }
        }
    }

    fn start_generator(&mut self) {
        if self.link.is_none() {
            self.log("Connect to a port first.");
            return;
        }
        self.gen_state.reset();
        self.generating = true;
        self.last_tick = Instant::now();
        self.send(EngineMessage::GeneratorRunning(true));
        self.log(&format!(
            "Generator START (fs={} Hz).",
            self.params.sample_rate_hz
        ));
    }

    fn stop_generator(&mut self) {
        if self.generating {
            self.generating = false;
            self.send(EngineMessage::GeneratorRunning(false));
            self.log("Generator STOP.");
        }
    }

    /// Reads pending bytes and dispatches every complete line in arrival
    /// order before returning.
    fn pump_serial(&mut self) {
        let mut buf = [0u8; READ_CHUNK];
        let Some(link) = self.link.as_mut() else {
            return;
        };
        match link.read_chunk(&mut buf) {
            Ok(0) => {}
            Ok(n) => self.assembler.push_bytes(&buf[..n]),
            Err(e) => {
                self.log(&format!("Read failed: {e}"));
                self.disconnect();
                return;
            }
        }
        while let Some(line) = self.assembler.next_line() {
            if line.is_empty() {
                continue;
            }
            self.log(&format!("RX: {line}"));
            self.dispatch_line(&line, false);
        }
    }

    /// Emits at most one outbound packet per elapsed tick interval.
    fn maybe_tick(&mut self) {
        if !self.generating {
            return;
        }
        let interval = Duration::from_millis(self.params.tick_interval_ms());
        if self.last_tick.elapsed() < interval {
            return;
        }
        self.last_tick = Instant::now();

        let line = generate_tick(&self.params, &mut self.gen_state);
        let Some(link) = self.link.as_mut() else {
            return;
        };
        match link.write_line(&line) {
            Ok(()) => {
                self.log(&format!("TX: {line}"));
                if self.local_echo {
                    self.dispatch_line(&line, true);
                }
            }
            Err(e) => {
                self.log(&format!("Write failed: {e}"));
                self.disconnect();
            }
        }
    }

    /// Runs one line through the parser and forwards the outcome; `echo`
    /// marks lines we transmitted ourselves.
    fn dispatch_line(&mut self, line: &str, echo: bool) {
        let parsed = parse_line(line);
        let text = match &parsed {
            ParsedLine::OutSamples(values) if values.is_empty() => {
                Some(format!("OUT (no numbers): {line}"))
            }
            ParsedLine::OutSamples(values) => {
                Some(format!("OUT samples: {}", join_values(values)))
            }
            ParsedLine::CsvSamples(values) => {
                Some(format!("CSV samples: {}", join_values(values)))
            }
            ParsedLine::SingleSample(v) => Some(format!("Sample: {v}")),
            // Already logged verbatim by the caller; dropped silently.
            ParsedLine::Unrecognized => None,
        };
        if let Some(text) = text {
            self.send(EngineMessage::Parsed { text, echo });
        }
        let samples = parsed.samples();
        if !samples.is_empty() {
            self.send(EngineMessage::Samples(samples.to_vec()));
        }
    }
}

fn join_values(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
