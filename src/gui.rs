//! Thin egui front-end for the overlay.
//!
//! Rendering is deliberately simple; the interesting behaviour lives in
//! the service. This module owns two things: the [`EguiSurface`]
//! implementation of the window-surface capability (viewport visibility
//! follows the primary panel) and the demo app that feeds egui pointer
//! input into the slider controller.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use eframe::egui;

use crate::backend::MemoryBackend;
use crate::error::SurfaceError;
use crate::keyrepeat::KeyEvent;
use crate::layout::{self, PanelGeometry, PanelLayout};
use crate::overlay::{PanelKind, PanelState, Placement, Surface, SurfaceHandle};
use crate::service::OverlayService;
use crate::settings::Settings;
use crate::slider::{PointerEvent, PointerPhase};
use crate::stream::Stream;

const SCALE: f32 = 0.5;

/// Surface capability backed by the egui viewport: the window is shown
/// while the primary panel is attached and hidden otherwise.
pub struct EguiSurface {
    ctx: egui::Context,
    next_handle: u64,
    attached: HashMap<u64, PanelKind>,
}

impl EguiSurface {
    pub fn new(ctx: egui::Context) -> Self {
        Self {
            ctx,
            next_handle: 0,
            attached: HashMap::new(),
        }
    }

    fn panel_attached(&self, panel: PanelKind) -> bool {
        self.attached.values().any(|p| *p == panel)
    }
}

impl Surface for EguiSurface {
    fn attach(&mut self, panel: PanelKind, _placement: Placement) -> Result<SurfaceHandle, SurfaceError> {
        if self.panel_attached(panel) {
            return Err(SurfaceError::AlreadyAttached);
        }
        self.next_handle += 1;
        self.attached.insert(self.next_handle, panel);
        if panel == PanelKind::Primary {
            self.ctx.send_viewport_cmd(egui::ViewportCommand::Visible(true));
            self.ctx.request_repaint();
        }
        Ok(SurfaceHandle(self.next_handle))
    }

    fn detach(&mut self, handle: SurfaceHandle) -> Result<(), SurfaceError> {
        let Some(panel) = self.attached.remove(&handle.0) else {
            return Err(SurfaceError::AlreadyDetached);
        };
        if panel == PanelKind::Primary {
            self.ctx.send_viewport_cmd(egui::ViewportCommand::Visible(false));
        }
        Ok(())
    }
}

pub struct OverlayApp {
    service: OverlayService<MemoryBackend, EguiSurface>,
    keys: Receiver<KeyEvent>,
}

impl OverlayApp {
    pub fn new(ctx: &egui::Context, settings: &Settings, keys: Receiver<KeyEvent>) -> Self {
        let mut service = OverlayService::new(settings, EguiSurface::new(ctx.clone()));
        service.attach_backend(MemoryBackend::new());
        Self { service, keys }
    }

    fn draw_panel(&mut self, ui: &mut egui::Ui, panel: PanelKind, now: Instant) {
        let geometry = self.service.geometry().clone();
        let size = match panel {
            PanelKind::Primary => egui::vec2(geometry.slider_width, geometry.total_height()),
            PanelKind::Secondary => egui::vec2(geometry.secondary_width(), geometry.total_height()),
        } * SCALE;
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());

        for event in pointer_events(&response, rect, panel) {
            self.service.handle_pointer(panel, event, now);
        }

        let painter = ui.painter();
        match panel {
            PanelKind::Primary => {
                let primary = geometry.primary();
                paint_slider(
                    painter,
                    rect.min,
                    primary.slider_rect(),
                    primary.track(Stream::Media),
                    self.service.fraction(Stream::Media),
                    Stream::Media,
                );
                let expand = to_screen(rect.min, primary.expand_rect());
                painter.rect_filled(expand, expand.width() / 2.0, PANEL_BG);
                painter.text(
                    expand.center(),
                    egui::Align2::CENTER_CENTER,
                    "...",
                    egui::FontId::proportional(14.0),
                    egui::Color32::WHITE,
                );
            }
            PanelKind::Secondary => {
                let secondary = geometry.secondary();
                for stream in Stream::SECONDARY {
                    if let Some(slider) = secondary.slider_rect(stream) {
                        paint_slider(
                            painter,
                            rect.min,
                            slider,
                            secondary.track(stream),
                            self.service.fraction(stream),
                            stream,
                        );
                    }
                }
            }
        }
    }
}

const PANEL_BG: egui::Color32 = egui::Color32::from_rgba_premultiplied(40, 46, 51, 200);
const TRACK_BG: egui::Color32 = egui::Color32::from_rgba_premultiplied(20, 20, 20, 120);
const FILL: egui::Color32 = egui::Color32::from_rgb(124, 77, 255);

fn to_screen(origin: egui::Pos2, rect: layout::Rect) -> egui::Rect {
    egui::Rect::from_min_size(
        origin + egui::vec2(rect.left, rect.top) * SCALE,
        egui::vec2(rect.width(), rect.height()) * SCALE,
    )
}

fn paint_slider(
    painter: &egui::Painter,
    origin: egui::Pos2,
    slider: layout::Rect,
    track: Option<layout::Rect>,
    fraction: f32,
    stream: Stream,
) {
    let slider_rect = to_screen(origin, slider);
    painter.rect_filled(slider_rect, slider_rect.width() / 2.0, PANEL_BG);
    if let Some(track) = track {
        let track_rect = to_screen(origin, track);
        painter.rect_filled(track_rect, 6.0, TRACK_BG);
        let fill_top = track_rect.bottom() - track_rect.height() * fraction.clamp(0.0, 1.0);
        let fill = egui::Rect::from_min_max(egui::pos2(track_rect.left(), fill_top), track_rect.max);
        painter.rect_filled(fill, 6.0, FILL);
    }
    painter.text(
        egui::pos2(slider_rect.center().x, slider_rect.top() + 16.0),
        egui::Align2::CENTER_CENTER,
        stream.label(),
        egui::FontId::proportional(10.0),
        egui::Color32::WHITE,
    );
}

/// Translate an egui response into panel-local pointer events. A plain
/// click becomes a down/up pair so taps on the expand button work.
fn pointer_events(response: &egui::Response, rect: egui::Rect, panel: PanelKind) -> Vec<PointerEvent> {
    let id = match panel {
        PanelKind::Primary => 0,
        PanelKind::Secondary => 1,
    };
    let pos = response
        .interact_pointer_pos()
        .unwrap_or_else(|| rect.center());
    let local = (pos - rect.min) / SCALE;
    let at = |phase| PointerEvent {
        id,
        x: local.x,
        y: local.y,
        phase,
    };

    let mut events = Vec::new();
    if response.clicked() {
        events.push(at(PointerPhase::Down));
        events.push(at(PointerPhase::Up));
    }
    if response.drag_started() {
        events.push(at(PointerPhase::Down));
    } else if response.dragged() {
        events.push(at(PointerPhase::Move));
    } else if response.drag_stopped() {
        events.push(at(PointerPhase::Up));
    }
    events
}

impl eframe::App for OverlayApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        while let Ok(event) = self.keys.try_recv() {
            self.service.handle_key(event, now);
        }
        self.service.advance(now);

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                ui.horizontal_top(|ui| {
                    if self.service.secondary_visible() {
                        self.draw_panel(ui, PanelKind::Secondary, now);
                        ui.add_space(8.0);
                    }
                    if self.service.primary_state() != PanelState::Hidden {
                        self.draw_panel(ui, PanelKind::Primary, now);
                    }
                });
            });

        let wait = self
            .service
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .unwrap_or(Duration::from_millis(50));
        ctx.request_repaint_after(wait.min(Duration::from_millis(50)));
    }
}

/// Run the demo overlay window until it is closed.
pub fn run(settings: Settings, keys: Receiver<KeyEvent>) -> anyhow::Result<()> {
    let geometry = PanelGeometry::default();
    let width = (geometry.secondary_width() + geometry.slider_width) * SCALE + 32.0;
    let height = geometry.total_height() * SCALE + 16.0;
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width, height])
            .with_always_on_top(),
        ..Default::default()
    };

    eframe::run_native(
        "volume_overlay",
        native_options,
        Box::new(move |cc| Box::new(OverlayApp::new(&cc.egui_ctx, &settings, keys))),
    )
    .map_err(|err| anyhow::anyhow!("overlay ui failed: {err}"))
}
