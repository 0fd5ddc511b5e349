use chrono::Local;
use eframe::egui::{self, Color32, TextEdit};

use crate::{
    alarm::{Alarm, AlarmKind},
    error::AlarmError,
};

/// the contents of the new alarm form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlarmBuilder {
    pub kind: AlarmKind,
    pub time: String,
    pub webhook_url: String,
    pub label: String,
    error: Option<AlarmError>,
}

fn non_empty(input: &str) -> Option<String> {
    let input = input.trim();
    (!input.is_empty()).then(|| input.to_string())
}

impl AlarmBuilder {
    pub fn build(&self) -> Result<Alarm, AlarmError> {
        let target = self.kind.parse_target(&self.time)?;
        Ok(Alarm::new(
            target,
            non_empty(&self.webhook_url),
            non_empty(&self.label),
        ))
    }

    #[must_use]
    pub const fn error(&self) -> Option<&AlarmError> {
        self.error.as_ref()
    }

    /// Builds the alarm and clears the form, or keeps the form and remembers what was wrong.
    pub fn submit(&mut self) -> EditingState {
        match self.build() {
            Ok(alarm) => {
                self.reset();
                EditingState::Done(alarm)
            }
            Err(e) => {
                self.error = Some(e);
                EditingState::Editing
            }
        }
    }

    /// clears everything but the kind of alarm
    pub fn reset(&mut self) {
        *self = Self {
            kind: self.kind,
            ..Self::default()
        };
    }

    /// fills in the current time in the format the selected kind expects
    pub fn fill_now(&mut self) {
        let now = Local::now();
        self.time = match self.kind {
            AlarmKind::Daily => now.format("%H:%M:%S"),
            AlarmKind::Absolute => now.format("%Y-%m-%dT%H:%M:%S"),
        }
        .to_string();
    }

    pub(crate) fn render_kind_selector(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for kind in [AlarmKind::Daily, AlarmKind::Absolute] {
                if ui
                    .selectable_value(&mut self.kind, kind, kind.to_string())
                    .changed()
                {
                    // what was typed is probably in the other format
                    self.error = None;
                }
            }
        });
    }

    pub(crate) fn render_time_editor(&mut self, ui: &mut egui::Ui) {
        let hint = match self.kind {
            AlarmKind::Daily => "HH:MM:SS",
            AlarmKind::Absolute => "YYYY-MM-DDTHH:MM:SS",
        };
        ui.label("When?");
        ui.horizontal(|ui| {
            if ui
                .add(TextEdit::singleline(&mut self.time).hint_text(hint))
                .changed()
            {
                self.error = None;
            }
            if ui.button("now").on_hover_text("use the current time").clicked() {
                self.fill_now();
            }
        });
        if let Some(error) = &self.error {
            ui.colored_label(Color32::from_rgb(0xf8, 0x71, 0x71), error.to_string());
        }
    }

    pub(crate) fn render_webhook_editor(&mut self, ui: &mut egui::Ui) {
        ui.label("Webhook URL (Optional)");
        ui.add(
            TextEdit::singleline(&mut self.webhook_url)
                .hint_text("https://api.example.com/trigger"),
        );
    }

    pub(crate) fn render_label_editor(&mut self, ui: &mut egui::Ui) {
        ui.label("Label (Optional)");
        ui.add(TextEdit::singleline(&mut self.label).hint_text("Morning Routine"));
    }

    /// what pressing the form buttons does, adding wins if both were pressed
    pub(crate) fn press(&mut self, add: bool, clear: bool) -> EditingState {
        if add {
            self.submit()
        } else if clear {
            self.reset();
            EditingState::Cancelled
        } else {
            EditingState::Editing
        }
    }

    pub fn render_alarm_editor(&mut self, ui: &mut egui::Ui) -> EditingState {
        ui.group(|ui| {
            self.render_kind_selector(ui);
            self.render_time_editor(ui);
            self.render_webhook_editor(ui);
            self.render_label_editor(ui);
            let (add, clear) = ui
                .horizontal(|ui| {
                    (
                        ui.button("+ Add Trigger").clicked(),
                        ui.button("clear").clicked(),
                    )
                })
                .inner;
            self.press(add, clear)
        })
        .inner
    }
}

#[derive(Debug)]
pub enum EditingState {
    Cancelled,
    Editing,
    Done(Alarm),
}
