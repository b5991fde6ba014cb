use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Vec2};
use tracing::{error, info};

use crate::charts::ChartBundle;
use crate::config::{ReportSettings, Settings};
use crate::enrichment::{EnrichmentReport, Term, load_report};
use crate::network::{NetworkFailure, NetworkScene};

mod graph;
mod plots;
mod render_utils;
mod ui;

type LoadResult = Result<EnrichmentReport, String>;

pub struct EnrichViewApp {
    report_path: PathBuf,
    settings: Settings,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ChartKind {
    Network,
    Bar,
    Dot,
    Heatmap,
}

impl ChartKind {
    const ALL: [Self; 4] = [Self::Network, Self::Bar, Self::Dot, Self::Heatmap];

    fn label(self) -> &'static str {
        match self {
            Self::Network => "Network",
            Self::Bar => "Bar",
            Self::Dot => "Dot",
            Self::Heatmap => "Heatmap",
        }
    }
}

struct ViewModel {
    report: EnrichmentReport,
    settings: Settings,
    /// Significant terms in rank order; every chart and the network read from this.
    ranked: Vec<Term>,
    charts: ChartBundle,
    network: Result<NetworkScene, NetworkFailure>,
    chart: ChartKind,
    search: String,
    selected: Option<String>,
    pan: Vec2,
    zoom: f32,
    ranking_dirty: bool,
    charts_dirty: bool,
    network_dirty: bool,
}

impl EnrichViewApp {
    pub fn new(report_path: PathBuf, settings: Settings, report: EnrichmentReport) -> Self {
        Self {
            report_path,
            state: AppState::Ready(Box::new(ViewModel::new(report, settings.clone()))),
            settings,
            reload_rx: None,
        }
    }

    fn spawn_load(report_path: PathBuf, settings: ReportSettings) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result =
                load_report(&report_path, &settings).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(&self) -> AppState {
        info!(path = %self.report_path.display(), "reloading report");
        AppState::Loading {
            rx: Self::spawn_load(self.report_path.clone(), self.settings.report.clone()),
        }
    }

    fn finish_load(&self, result: LoadResult) -> AppState {
        match result {
            Ok(report) => AppState::Ready(Box::new(ViewModel::new(report, self.settings.clone()))),
            Err(message) => {
                error!("{message}");
                AppState::Error(message)
            }
        }
    }
}

impl eframe::App for EnrichViewApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;
        let mut retry_requested = false;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(result);
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading enrichment report...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint();
            }
            AppState::Error(message) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load enrichment report");
                    ui.add_space(6.0);
                    ui.label(message.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        retry_requested = true;
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.report_path, &mut reload_requested, is_reloading);

                // Reloads keep whatever the user tuned in the side panel.
                self.settings = model.settings.clone();

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(
                        self.report_path.clone(),
                        self.settings.report.clone(),
                    ));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => transition = Some(result),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(Err("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if retry_requested {
            self.state = self.start_load();
        }

        if let Some(result) = transition {
            self.reload_rx = None;
            self.state = self.finish_load(result);
        }
    }
}
