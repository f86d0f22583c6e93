use eframe::egui;
use egui::{Key, KeyboardShortcut, Modifiers};
use egui_commonmark::CommonMarkCache;
use serde::{Deserialize, Serialize};

use crate::content::{self, GUIDE_TITLE};
use crate::document;
use crate::navigation::{Anchors, NavAction, Navigator, ScrollRequest};
use crate::registry::{Registry, RegistryError};

const APP_KEY: &str = "monorepo-guide-state";

/// Below this width the sidebar becomes a slide-over menu
const NARROW_WIDTH: f32 = 1024.0;
const SIDEBAR_WIDTH: f32 = 256.0;
const HEADER_HEIGHT: f32 = 64.0;
const ACCENT: egui::Color32 = egui::Color32::from_rgb(37, 99, 235);

const MIN_ZOOM: f32 = 0.5;
const MAX_ZOOM: f32 = 3.0;
const ZOOM_STEP: f32 = 0.1;

const TOGGLE_THEME: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::D);
const TOGGLE_SIDEBAR: KeyboardShortcut =
    KeyboardShortcut::new(Modifiers::COMMAND.plus(Modifiers::SHIFT), Key::O);
const QUIT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Q);
const ZOOM_IN: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Plus);
const ZOOM_IN_ALT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Equals);
const ZOOM_OUT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Minus);
const ZOOM_RESET: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Num0);

/// Viewer preferences saved between sessions. Navigation state is never saved.
#[derive(Serialize, Deserialize, Default)]
struct PersistedState {
    dark_mode: Option<bool>,
    zoom_level: Option<f32>,
    show_sidebar: Option<bool>,
}

pub struct GuideApp {
    registry: Registry,
    navigator: Navigator,
    anchors: Anchors,
    cache: CommonMarkCache,
    dark_mode: bool,
    // 1.0 = 100%
    zoom_level: f32,
    show_sidebar: bool,
    // Scroll tracking
    last_scroll_offset: Option<f32>,
    pending_scroll: Option<ScrollRequest>,
    // Section requested on the command line, applied once anchors exist
    start_section: Option<String>,
}

impl GuideApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        start_section: Option<String>,
    ) -> Result<Self, RegistryError> {
        let persisted: PersistedState = cc
            .storage
            .and_then(|s| eframe::get_value(s, APP_KEY))
            .unwrap_or_default();

        // Use persisted dark_mode, or fall back to system default
        let dark_mode = persisted
            .dark_mode
            .unwrap_or_else(|| cc.egui_ctx.style().visuals.dark_mode);

        Ok(Self::with_state(
            content::registry()?,
            dark_mode,
            persisted.zoom_level.unwrap_or(1.0),
            persisted.show_sidebar.unwrap_or(true),
            start_section,
        ))
    }

    fn with_state(
        registry: Registry,
        dark_mode: bool,
        zoom_level: f32,
        show_sidebar: bool,
        start_section: Option<String>,
    ) -> Self {
        let start_section = start_section.filter(|id| {
            let known = registry.contains(id);
            if !known {
                log::warn!("Unknown section '{}', starting at the top", id);
            }
            known
        });

        Self {
            navigator: Navigator::new(&registry),
            registry,
            anchors: Anchors::default(),
            cache: CommonMarkCache::default(),
            dark_mode,
            zoom_level: zoom_level.clamp(MIN_ZOOM, MAX_ZOOM),
            show_sidebar,
            last_scroll_offset: None,
            pending_scroll: None,
            start_section,
        }
    }

    fn window_title(&self) -> String {
        match self.navigator.active().and_then(|id| self.registry.label_of(id)) {
            Some(label) => format!("{} - {}", label, GUIDE_TITLE),
            None => GUIDE_TITLE.to_string(),
        }
    }

    fn navigate(&mut self, action: &NavAction) {
        if let Some(request) = self.navigator.apply(action, &self.registry, &self.anchors) {
            self.pending_scroll = Some(request);
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let zoom_level = self.zoom_level;
        let (toggle_sidebar, toggle_dark, quit, zoom) = ctx.input_mut(|i| {
            // Shift variants first, plain shortcuts match them logically too
            let toggle_sidebar = i.consume_shortcut(&TOGGLE_SIDEBAR);
            let zoom = if i.consume_shortcut(&ZOOM_RESET) {
                Some(1.0)
            } else if i.consume_shortcut(&ZOOM_IN) || i.consume_shortcut(&ZOOM_IN_ALT) {
                Some(zoom_level + ZOOM_STEP)
            } else if i.consume_shortcut(&ZOOM_OUT) {
                Some(zoom_level - ZOOM_STEP)
            } else if i.modifiers.command && i.raw_scroll_delta.y != 0.0 {
                Some(zoom_level + ZOOM_STEP * i.raw_scroll_delta.y.signum())
            } else {
                None
            };
            (
                toggle_sidebar,
                i.consume_shortcut(&TOGGLE_THEME),
                i.consume_shortcut(&QUIT),
                zoom,
            )
        });

        if let Some(zoom) = zoom {
            self.zoom_level = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
        self.dark_mode ^= toggle_dark;
        self.show_sidebar ^= toggle_sidebar;
        if quit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn header(&mut self, ctx: &egui::Context, narrow: bool) {
        egui::TopBottomPanel::top("header")
            .exact_height(HEADER_HEIGHT)
            .show(ctx, |ui| {
                egui::MenuBar::new().ui(ui, |ui| {
                    ui.label(egui::RichText::new("📖").size(22.0).color(ACCENT));
                    ui.label(egui::RichText::new(GUIDE_TITLE).size(18.0).strong());
                    ui.add_space(12.0);

                    ui.menu_button("View", |ui| {
                        let theme_text = if self.dark_mode { "☀ Light Mode" } else { "🌙 Dark Mode" };
                        if ui.add(egui::Button::new(theme_text).shortcut_text("Ctrl+D")).clicked() {
                            self.dark_mode = !self.dark_mode;
                            ui.close();
                        }

                        let sidebar_text = if self.show_sidebar { "✓ Show Sidebar" } else { "Show Sidebar" };
                        if ui
                            .add_enabled(!narrow, egui::Button::new(sidebar_text).shortcut_text("Ctrl+Shift+O"))
                            .clicked()
                        {
                            self.show_sidebar = !self.show_sidebar;
                            ui.close();
                        }

                        ui.separator();

                        if ui.add(egui::Button::new("Zoom In").shortcut_text("Ctrl++")).clicked() {
                            self.zoom_level = (self.zoom_level + ZOOM_STEP).min(MAX_ZOOM);
                            ui.close();
                        }
                        if ui.add(egui::Button::new("Zoom Out").shortcut_text("Ctrl+-")).clicked() {
                            self.zoom_level = (self.zoom_level - ZOOM_STEP).max(MIN_ZOOM);
                            ui.close();
                        }
                        if ui.add(egui::Button::new("Reset Zoom").shortcut_text("Ctrl+0")).clicked() {
                            self.zoom_level = 1.0;
                            ui.close();
                        }
                    });

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if narrow {
                            let icon = if self.navigator.is_menu_open() { "✕" } else { "☰" };
                            if ui.button(egui::RichText::new(icon).size(18.0)).clicked() {
                                self.navigator.toggle_menu();
                            }
                        }

                        let theme_icon = if self.dark_mode { "☀" } else { "🌙" };
                        if ui
                            .button(egui::RichText::new(theme_icon).size(16.0))
                            .on_hover_text("Toggle theme")
                            .clicked()
                        {
                            self.dark_mode = !self.dark_mode;
                        }

                        // Show zoom level if not at 100%
                        if (self.zoom_level - 1.0).abs() > 0.01 {
                            ui.label(
                                egui::RichText::new(format!("{}%", (self.zoom_level * 100.0).round() as i32))
                                    .small()
                                    .color(ui.visuals().weak_text_color()),
                            );
                        }
                    });
                });
            });
    }

    /// Sidebar or slide-over menu; returns the rows drawn this frame
    fn sidebar(&mut self, ctx: &egui::Context, narrow: bool) -> Vec<NavRow> {
        if !narrow {
            if !self.show_sidebar {
                return Vec::new();
            }
            return egui::SidePanel::left("sidebar")
                .resizable(true)
                .default_width(SIDEBAR_WIDTH)
                .min_width(180.0)
                .max_width(400.0)
                .show(ctx, |ui| navigation_panel(ui, &self.registry, &self.navigator))
                .inner;
        }

        if !self.navigator.is_menu_open() {
            return Vec::new();
        }

        let body = ctx.available_rect();

        // Dimming overlay; any click on it closes the menu
        let overlay = egui::Area::new(egui::Id::new("menu_overlay"))
            .order(egui::Order::Middle)
            .fixed_pos(body.min)
            .show(ctx, |ui| {
                ui.painter()
                    .rect_filled(body, 0.0, egui::Color32::from_black_alpha(128));
                ui.allocate_rect(body, egui::Sense::click())
            });
        if overlay.inner.clicked() {
            self.navigator.close_menu();
        }

        egui::Area::new(egui::Id::new("menu_panel"))
            .order(egui::Order::Foreground)
            .fixed_pos(body.min)
            .show(ctx, |ui| {
                egui::Frame::side_top_panel(ui.style())
                    .show(ui, |ui| {
                        ui.set_width(SIDEBAR_WIDTH);
                        ui.set_min_height(body.height());
                        navigation_panel(ui, &self.registry, &self.navigator)
                    })
                    .inner
            })
            .inner
    }

    fn content(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let scroll_output = egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show_viewport(ui, |ui, _viewport| {
                    let origin = ui.max_rect().top();

                    // Animated scroll toward the last navigation target
                    if let Some(request) = self.pending_scroll.take() {
                        let target = egui::Rect::from_min_size(
                            egui::pos2(ui.max_rect().left(), origin + request.offset),
                            egui::vec2(1.0, 1.0),
                        );
                        ui.scroll_to_rect(target, Some(egui::Align::Min));
                    }

                    document::show(ui, &mut self.cache, &mut self.anchors, origin);
                });

            let offset = scroll_output.state.offset.y;
            if self.last_scroll_offset != Some(offset) {
                self.last_scroll_offset = Some(offset);
                self.navigator.track(&self.registry, &self.anchors, offset);
            }
        });

        if !self.anchors.is_empty() {
            if let Some(id) = self.start_section.take() {
                self.pending_scroll = self.navigator.scroll_to(&id, &self.anchors);
                ctx.request_repaint();
            }
        }
    }

    /// Runs one frame and returns the navigation rows it drew
    fn show(&mut self, ctx: &egui::Context) -> Vec<NavRow> {
        ctx.set_visuals(if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });
        // Zoom keys are handled here; egui's own would be overridden by the line below
        ctx.options_mut(|o| o.zoom_with_keyboard = false);
        ctx.set_zoom_factor(self.zoom_level);

        self.handle_shortcuts(ctx);

        // An open menu stays open but hidden while the window is wide
        let narrow = ctx.available_rect().width() < NARROW_WIDTH;

        self.header(ctx, narrow);

        let rows = self.sidebar(ctx, narrow);
        // Ignore clicks while a pointer drag (e.g. panel resize) is in progress
        let is_dragging = ctx.input(|i| i.pointer.any_down());
        if !is_dragging {
            if let Some(row) = rows.iter().find(|row| row.response.clicked()) {
                self.navigate(&row.action);
            }
        }

        self.content(ctx);

        ctx.send_viewport_cmd(egui::ViewportCommand::Title(self.window_title()));
        rows
    }
}

/// One row of the navigation list as drawn in a frame
struct NavRow {
    action: NavAction,
    response: egui::Response,
}

/// Navigation list: one row per section, sub-rows for expanded groups
fn navigation_panel(ui: &mut egui::Ui, registry: &Registry, navigator: &Navigator) -> Vec<NavRow> {
    let mut rows = Vec::new();

    ui.add_space(8.0);
    egui::ScrollArea::vertical()
        .id_salt("navigation_panel")
        .auto_shrink([false, true])
        .show(ui, |ui| {
            // Justified so every row spans the panel width
            ui.with_layout(egui::Layout::top_down_justified(egui::Align::LEFT), |ui| {
                for section in registry.sections() {
                    let mut text = match &section.icon {
                        Some(icon) => format!("{}  {}", icon, section.label),
                        None => section.label.clone(),
                    };
                    let expanded = navigator.is_expanded(&section.id);
                    if section.has_group() {
                        text.push_str(if expanded { "  ▾" } else { "  ▸" });
                    }

                    rows.push(NavRow {
                        action: NavAction::Section(section.id.clone()),
                        response: ui.selectable_label(navigator.is_section_active(section), text),
                    });

                    if !(section.has_group() && expanded) {
                        continue;
                    }
                    ui.indent(&section.id, |ui| {
                        for sub in &section.subsections {
                            rows.push(NavRow {
                                action: NavAction::Subsection(sub.id.clone()),
                                response: ui.selectable_label(navigator.is_active(&sub.id), &sub.label),
                            });
                        }
                    });
                }
            });
        });

    rows
}

impl eframe::App for GuideApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let state = PersistedState {
            dark_mode: Some(self.dark_mode),
            zoom_level: Some(self.zoom_level),
            show_sidebar: Some(self.show_sidebar),
        };
        eframe::set_value(storage, APP_KEY, &state);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show(ctx);
    }
}
