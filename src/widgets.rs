use std::time::Duration;

use eframe::egui;
use egui_commonmark::{CommonMarkCache, CommonMarkViewer};

use crate::content::CalloutKind;

/// How long a code block shows its "copied" state
pub const COPY_FEEDBACK: Duration = Duration::from_millis(2000);

const CODE_BG: egui::Color32 = egui::Color32::from_rgb(3, 7, 18);
const CODE_BORDER: egui::Color32 = egui::Color32::from_rgb(31, 41, 55);
const CODE_TEXT: egui::Color32 = egui::Color32::from_rgb(243, 244, 246);
const COPIED: egui::Color32 = egui::Color32::from_rgb(74, 222, 128);

/// "Copied" indicator of a single code block, driven by egui's input clock (seconds)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CopyFeedback {
    copied_at: Option<f64>,
}

impl CopyFeedback {
    pub fn trigger(&mut self, now: f64) {
        self.copied_at = Some(now);
    }

    pub fn is_copied(&self, now: f64) -> bool {
        self.remaining(now).is_some()
    }

    /// Time left until the indicator resets, `None` once it has
    pub fn remaining(&self, now: f64) -> Option<Duration> {
        let elapsed = now - self.copied_at?;
        let left = COPY_FEEDBACK.as_secs_f64() - elapsed;
        (left > 0.0).then(|| Duration::from_secs_f64(left))
    }
}

/// Markdown paragraph. Each call should sit under its own id scope.
pub fn prose(ui: &mut egui::Ui, cache: &mut CommonMarkCache, text: &str) {
    CommonMarkViewer::new()
        .indentation_spaces(2)
        .show(ui, cache, text);
}

pub fn heading(ui: &mut egui::Ui, text: &str, size: f32) {
    ui.add(egui::Label::new(egui::RichText::new(text).size(size).strong()).wrap());
}

pub fn tag(ui: &mut egui::Ui, text: &str) {
    egui::Frame::new()
        .fill(ui.visuals().faint_bg_color)
        .corner_radius(egui::CornerRadius::same(6))
        .inner_margin(egui::Margin::symmetric(10, 4))
        .show(ui, |ui| {
            ui.label(egui::RichText::new(text).small().strong());
        });
}

/// Monospace code sample with a copy button; returns the button's response
pub fn code_block(ui: &mut egui::Ui, language: &str, code: &str) -> egui::Response {
    let id = ui.id().with("code_block");
    let now = ui.input(|i| i.time);
    let mut feedback: CopyFeedback = ui.data(|d| d.get_temp(id)).unwrap_or_default();

    let copy_button = egui::Frame::new()
        .fill(CODE_BG)
        .stroke(egui::Stroke::new(1.0, CODE_BORDER))
        .corner_radius(egui::CornerRadius::same(8))
        .inner_margin(egui::Margin::same(12))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            let copy_button = ui
                .horizontal(|ui| {
                    ui.label(egui::RichText::new(language).small().color(egui::Color32::GRAY));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let button = if feedback.is_copied(now) {
                            egui::Button::new(egui::RichText::new("✔").color(COPIED))
                        } else {
                            egui::Button::new(egui::RichText::new("🗐").color(egui::Color32::GRAY))
                        };
                        ui.add(button.small()).on_hover_text("Copy code")
                    })
                    .inner
                })
                .inner;
            egui::ScrollArea::horizontal()
                .id_salt(id.with("scroll"))
                .show(ui, |ui| {
                    ui.add(
                        egui::Label::new(egui::RichText::new(code).monospace().color(CODE_TEXT))
                            .extend(),
                    );
                });
            copy_button
        })
        .inner;

    if copy_button.clicked() {
        ui.ctx().copy_text(code.to_owned());
        feedback.trigger(now);
        log::debug!("Copied {} bytes of {} to clipboard", code.len(), language);
    }

    // Wake up exactly when the indicator flips back
    if let Some(left) = feedback.remaining(now) {
        ui.ctx().request_repaint_after(left);
    }
    ui.data_mut(|d| d.insert_temp(id, feedback));
    copy_button
}

/// Fill, border and text colours of a callout
fn callout_colors(kind: CalloutKind, dark: bool) -> [egui::Color32; 3] {
    use egui::Color32 as C;
    match (kind, dark) {
        (CalloutKind::Info, false) => [C::from_rgb(239, 246, 255), C::from_rgb(191, 219, 254), C::from_rgb(30, 58, 138)],
        (CalloutKind::Info, true) => [C::from_rgb(23, 37, 84), C::from_rgb(30, 64, 175), C::from_rgb(219, 234, 254)],
        (CalloutKind::Warning, false) => [C::from_rgb(255, 251, 235), C::from_rgb(253, 230, 138), C::from_rgb(120, 53, 15)],
        (CalloutKind::Warning, true) => [C::from_rgb(69, 26, 3), C::from_rgb(146, 64, 14), C::from_rgb(254, 243, 199)],
        (CalloutKind::Success, false) => [C::from_rgb(240, 253, 244), C::from_rgb(187, 247, 208), C::from_rgb(20, 83, 45)],
        (CalloutKind::Success, true) => [C::from_rgb(5, 46, 22), C::from_rgb(22, 101, 52), C::from_rgb(220, 252, 231)],
    }
}

pub fn callout(
    ui: &mut egui::Ui,
    cache: &mut CommonMarkCache,
    kind: CalloutKind,
    title: &str,
    body: &str,
) {
    let [fill, border, text] = callout_colors(kind, ui.visuals().dark_mode);
    egui::Frame::new()
        .fill(fill)
        .stroke(egui::Stroke::new(1.0, border))
        .corner_radius(egui::CornerRadius::same(8))
        .inner_margin(egui::Margin::same(16))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.visuals_mut().override_text_color = Some(text);
            ui.label(egui::RichText::new(title).strong());
            ui.add_space(4.0);
            prose(ui, cache, body);
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_feedback_starts_idle() {
        let feedback = CopyFeedback::default();
        assert!(!feedback.is_copied(0.0));
        assert!(feedback.remaining(100.0).is_none());
    }

    #[test]
    fn test_copy_feedback_lasts_exactly_two_seconds() {
        let mut feedback = CopyFeedback::default();
        feedback.trigger(10.0);

        assert!(feedback.is_copied(10.0));
        assert!(feedback.is_copied(11.0));
        assert!(feedback.is_copied(11.999));
        assert!(!feedback.is_copied(12.0));
        assert!(!feedback.is_copied(30.0));
        assert_eq!(feedback.remaining(10.0), Some(COPY_FEEDBACK));
    }

    #[test]
    fn test_copy_again_restarts_window() {
        let mut feedback = CopyFeedback::default();
        feedback.trigger(10.0);
        feedback.trigger(11.5);
        assert!(feedback.is_copied(13.0));
        assert!(!feedback.is_copied(13.5));
    }

    /// One frame with a single code block; returns its copy button and state id
    fn frame(
        ctx: &egui::Context,
        events: Vec<egui::Event>,
        time: f64,
    ) -> (egui::Response, egui::Id, egui::FullOutput) {
        let input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(600.0, 400.0),
            )),
            time: Some(time),
            events,
            ..Default::default()
        };
        let mut rendered = None;
        let output = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                let id = ui.id().with("code_block");
                rendered = Some((code_block(ui, "bash", "pnpm install"), id));
            });
        });
        let (button, id) = rendered.expect("code block rendered");
        (button, id, output)
    }

    fn press(pos: egui::Pos2, pressed: bool) -> egui::Event {
        egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: egui::Modifiers::NONE,
        }
    }

    #[test]
    fn test_copy_button_copies_and_shows_feedback() {
        let ctx = egui::Context::default();
        let (button, id, _) = frame(&ctx, Vec::new(), 0.0);
        let pos = button.rect.center();

        frame(&ctx, vec![egui::Event::PointerMoved(pos), press(pos, true)], 0.1);
        let (button, _, output) = frame(&ctx, vec![press(pos, false)], 0.2);

        assert!(button.clicked());
        assert!(output
            .platform_output
            .commands
            .iter()
            .any(|command| matches!(
                command,
                egui::OutputCommand::CopyText(text) if text == "pnpm install"
            )));

        let feedback: CopyFeedback = ctx.data(|d| d.get_temp(id)).unwrap_or_default();
        assert!(feedback.is_copied(2.1));
        assert!(!feedback.is_copied(2.5));
    }

    #[test]
    fn test_copy_button_idle_without_click() {
        let ctx = egui::Context::default();
        let (button, id, output) = frame(&ctx, Vec::new(), 0.0);

        assert!(!button.clicked());
        assert!(!output
            .platform_output
            .commands
            .iter()
            .any(|command| matches!(command, egui::OutputCommand::CopyText(_))));
        let feedback: CopyFeedback = ctx.data(|d| d.get_temp(id)).unwrap_or_default();
        assert!(!feedback.is_copied(0.0));
    }

    #[test]
    fn test_callout_colors_follow_theme() {
        for kind in [CalloutKind::Info, CalloutKind::Warning, CalloutKind::Success] {
            assert_ne!(callout_colors(kind, true), callout_colors(kind, false));
        }
    }
}
