use eframe::egui;
use egui::Color32;
use egui_plot::{Line, Plot, PlotBounds, PlotPoints};
use std::sync::mpsc::{channel, Receiver, Sender};

use crate::engine;
use crate::serial::PortEntry;
use crate::signal::{ChartWindow, GeneratorParams, Waveform};
use crate::types::{EngineMessage, GuiCommand};

const BAUD_RATES: [u32; 5] = [9600, 19200, 38400, 57600, 115200];
const MAX_LOG_LINES: usize = 200;

pub struct ScopeApp {
    // Connection state mirrored from the engine.
    is_connected: bool,
    is_generating: bool,

    ports: Vec<PortEntry>,
    selected_port: usize,
    baud: u32,

    send_text: String,
    local_echo: bool,

    // Edited locally, pushed to the engine when it changes.
    params: GeneratorParams,
    sent_params: GeneratorParams,

    bridge_a: u8,
    bridge_b: u8,

    chart: ChartWindow,
    log_lines: Vec<String>,
    parsed_lines: Vec<String>,

    rx: Receiver<EngineMessage>,
    tx_cmd: Sender<GuiCommand>,
}

impl Default for ScopeApp {
    fn default() -> Self {
        let (tx, rx) = channel();
        let (tx_cmd, rx_cmd) = channel();

        engine::spawn_thread(tx, rx_cmd);

        Self {
            is_connected: false,
            is_generating: false,
            ports: Vec::new(),
            selected_port: 0,
            baud: 115200,
            send_text: String::new(),
            local_echo: true,
            params: GeneratorParams::default(),
            sent_params: GeneratorParams::default(),
            bridge_a: 1,
            bridge_b: 2,
            chart: ChartWindow::default(),
            log_lines: Vec::new(),
            parsed_lines: Vec::new(),
            rx,
            tx_cmd,
        }
    }
}

impl ScopeApp {
    fn command(&self, cmd: GuiCommand) {
        self.tx_cmd.send(cmd).ok();
    }

    fn push_log(lines: &mut Vec<String>, text: String) {
        lines.push(text);
        if lines.len() > MAX_LOG_LINES {
            let excess = lines.len() - MAX_LOG_LINES;
            lines.drain(..excess);
        }
    }

    fn drain_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                EngineMessage::Log(text) => {
                    Self::push_log(&mut self.log_lines, format!("> {text}"));
                }
                EngineMessage::Ports(ports) => {
                    self.ports = ports;
                    self.selected_port = self.selected_port.min(self.ports.len().saturating_sub(1));
                }
                EngineMessage::Connected(on) => self.is_connected = on,
                EngineMessage::GeneratorRunning(on) => self.is_generating = on,
                EngineMessage::Parsed { text, echo } => {
                    let prefix = if echo { "[echo] " } else { "" };
                    Self::push_log(&mut self.parsed_lines, format!("{prefix}{text}"));
                }
                EngineMessage::Samples(values) => {
                    for v in values {
                        self.chart.push_sample(v);
                    }
                }
            }
        }
    }

    fn serial_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Serial port");
        ui.separator();

        ui.horizontal(|ui| {
            if ui.button("Refresh").clicked() {
                self.command(GuiCommand::RefreshPorts);
            }
            let selected_label = self
                .ports
                .get(self.selected_port)
                .map(PortEntry::label)
                .unwrap_or_else(|| "no ports".to_string());
            egui::ComboBox::from_id_source("port")
                .selected_text(selected_label)
                .show_ui(ui, |ui| {
                    for (i, port) in self.ports.iter().enumerate() {
                        ui.selectable_value(&mut self.selected_port, i, port.label());
                    }
                });
        });

        ui.horizontal(|ui| {
            ui.label("Baud:");
            egui::ComboBox::from_id_source("baud")
                .selected_text(self.baud.to_string())
                .show_ui(ui, |ui| {
                    for rate in BAUD_RATES {
                        ui.selectable_value(&mut self.baud, rate, rate.to_string());
                    }
                });
        });

        ui.horizontal(|ui| {
            if ui
                .add_enabled(!self.is_connected, egui::Button::new("Connect"))
                .clicked()
            {
                if let Some(port) = self.ports.get(self.selected_port) {
                    self.command(GuiCommand::Connect {
                        port: port.name.clone(),
                        baud: self.baud,
                    });
                }
            }
            if ui
                .add_enabled(self.is_connected, egui::Button::new("Disconnect"))
                .clicked()
            {
                self.command(GuiCommand::Disconnect);
            }
        });

        ui.add_space(8.0);
        egui::ScrollArea::vertical()
            .id_source("traffic_log")
            .max_height(240.0)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for line in &self.log_lines {
                    ui.monospace(line);
                }
            });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let edit = egui::TextEdit::singleline(&mut self.send_text)
                .hint_text("e.g. OUT=1,100,100,100 or 1,100,100,100");
            let response = ui.add(edit);
            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Send").clicked() || submitted {
                let line = self.send_text.trim().to_string();
                if !line.is_empty() {
                    self.command(GuiCommand::SendLine(line));
                    self.send_text.clear();
                }
            }
        });

        if ui.checkbox(&mut self.local_echo, "Local echo").changed() {
            self.command(GuiCommand::SetLocalEcho(self.local_echo));
        }

        ui.add_space(8.0);
        ui.separator();
        ui.label("Virtual port bridge");
        ui.horizontal(|ui| {
            ui.label("COM");
            ui.add(egui::DragValue::new(&mut self.bridge_a).clamp_range(1..=255));
            ui.label("<-> COM");
            ui.add(egui::DragValue::new(&mut self.bridge_b).clamp_range(1..=255));
            if ui.button("Create bridge").clicked() {
                self.command(GuiCommand::CreateBridge(self.bridge_a, self.bridge_b));
            }
        });
    }

    fn generator_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Generator");
        ui.horizontal(|ui| {
            ui.label("Amp:");
            ui.add(egui::DragValue::new(&mut self.params.amplitude).speed(0.1));
            ui.label("Freq [Hz]:");
            ui.add(
                egui::DragValue::new(&mut self.params.frequency_hz)
                    .speed(0.1)
                    .clamp_range(0.0..=1e6),
            );
            ui.label("DC:");
            ui.add(egui::DragValue::new(&mut self.params.dc_offset).speed(0.1));
        });
        ui.horizontal(|ui| {
            ui.label("Wave:");
            egui::ComboBox::from_id_source("wave")
                .selected_text(self.params.waveform.wire_name())
                .show_ui(ui, |ui| {
                    for kind in Waveform::ALL {
                        ui.selectable_value(&mut self.params.waveform, kind, kind.wire_name());
                    }
                });
            ui.label("SampleRate [Hz]:");
            ui.add(egui::DragValue::new(&mut self.params.sample_rate_hz).clamp_range(1..=5000));
            ui.label("Packet samples:");
            ui.add(egui::DragValue::new(&mut self.params.packet_samples).clamp_range(1..=1000));
        });
        ui.checkbox(
            &mut self.params.send_samples,
            "Send samples (OUT=1,s1,s2,...)",
        );
        ui.horizontal(|ui| {
            if ui
                .add_enabled(
                    self.is_connected && !self.is_generating,
                    egui::Button::new("Start"),
                )
                .clicked()
            {
                self.command(GuiCommand::StartGenerator);
            }
            if ui
                .add_enabled(self.is_generating, egui::Button::new("Stop"))
                .clicked()
            {
                self.command(GuiCommand::StopGenerator);
            }
        });

        if self.params != self.sent_params {
            self.command(GuiCommand::SetParams(self.params.clone()));
            self.sent_params = self.params.clone();
        }
    }

    fn chart_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Chart");
        Plot::new("samples")
            .height(280.0)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                let (x_min, x_max) = if self.chart.is_empty() {
                    (0.0, ChartWindow::DEFAULT_MAX_POINTS as f64)
                } else {
                    self.chart.x_range()
                };
                let (y_min, y_max) = self.chart.y_range();
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                    [x_min, y_min],
                    [x_max, y_max],
                ));
                if !self.chart.is_empty() {
                    let points: Vec<[f64; 2]> = self.chart.points().collect();
                    plot_ui.line(
                        Line::new(PlotPoints::new(points))
                            .color(Color32::from_rgb(0, 255, 255))
                            .name("Samples"),
                    );
                }
            });
    }

    fn parsed_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Received numbers");
        egui::ScrollArea::vertical()
            .id_source("parsed_log")
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for line in &self.parsed_lines {
                    ui.monospace(line);
                }
            });
    }
}

impl eframe::App for ScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_messages();

        egui::SidePanel::left("serial")
            .min_width(340.0)
            .show(ctx, |ui| {
                ui.add_space(6.0);
                self.serial_panel(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.generator_panel(ui);
            ui.separator();
            self.chart_panel(ui);
            ui.separator();
            self.parsed_panel(ui);
        });

        // Engine traffic arrives between frames; keep polling.
        ctx.request_repaint_after(std::time::Duration::from_millis(30));
    }
}
