#![warn(clippy::pedantic, clippy::nursery, clippy::cargo)]
#![deny(clippy::use_self, rust_2018_idioms)]
#![allow(clippy::multiple_crate_versions, clippy::module_name_repetitions)]

use std::{
    f32::consts::TAU,
    path::PathBuf,
    time::{Duration, Instant},
};

use alarm::{Alarm, Target};
use alarm_edit::{AlarmBuilder, EditingState};
use board::AlarmBoard;
use chrono::{DateTime, Local, TimeZone};
use config::{Config, Theme};
use eframe::egui::{
    self, Align, Align2, Button, CentralPanel, Color32, Context, Id, LayerId, Layout, Order,
    RichText, ScrollArea, TopBottomPanel, Vec2, Window,
};
use log::{error, info};
use notification::Notification;
use store::{AlarmStore, JsonFileStore};
use webhook::Dispatcher;
use widgets::{AnalogClock, DigitalClock};

pub mod alarm;
/// implementation of alarm editing for egui
pub mod alarm_edit;
pub mod board;
pub mod communication;
pub mod config;
pub mod error;
pub mod notification;
pub mod schedule;
pub mod store;
pub mod webhook;
pub mod widgets;

const WEBHOOK_DOT: Color32 = Color32::from_rgb(0x22, 0xc5, 0x5e);

pub struct Clock {
    config: Config,
    config_path: PathBuf,
    board: AlarmBoard<JsonFileStore>,
    dispatcher: Dispatcher,
    notification: Option<Notification>,
    adding_alarm: AlarmBuilder,
    managing_alarms: bool,
}

/// how an alarm's target is shown in the alarm list
fn describe_target(alarm: &Alarm, time_format: &str) -> String {
    match alarm.target {
        Target::Absolute(at) => at.with_timezone(&Local).format(time_format).to_string(),
        Target::Daily(time) => time.to_string(),
    }
}

/// Fires everything due at `now`, every fired alarm gets its webhook sent.
///
/// Returns the notification for the last one to fire, if any did.
fn fire_due<S: AlarmStore, Tz: TimeZone>(
    board: &mut AlarmBoard<S>,
    dispatcher: &Dispatcher,
    now: &DateTime<Tz>,
    shown_for: Duration,
) -> Option<Notification> {
    let mut latest = None;
    for alarm in board.tick(now) {
        info!("alarm {} ({}) triggered", alarm.id, alarm.display_name());
        latest = Some(Notification::new(alarm.fire_message(), shown_for));
        dispatcher.dispatch(&alarm, now);
    }
    latest
}

impl Clock {
    #[must_use]
    pub fn new(
        config: Config,
        config_path: PathBuf,
        store: JsonFileStore,
        dispatcher: Dispatcher,
    ) -> Self {
        info!("alarms are saved to {}", store.path().display());
        Self {
            board: AlarmBoard::load(store),
            config,
            config_path,
            dispatcher,
            notification: None,
            adding_alarm: AlarmBuilder::default(),
            managing_alarms: false,
        }
    }

    fn check_alarms(&mut self, now: &DateTime<Local>) {
        let fired = fire_due(
            &mut self.board,
            &self.dispatcher,
            now,
            self.config.notification_duration(),
        );
        if fired.is_some() {
            self.notification = fired;
        }
    }

    fn render_header(&mut self, ctx: &Context, now: &DateTime<Local>) {
        TopBottomPanel::top("time_and_ctrl").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let theme_btn = ui.add(Button::new({
                    if self.config.theme == Theme::Dark {
                        "🌞"
                    } else {
                        "🌙"
                    }
                }));
                if theme_btn.clicked() {
                    self.config.theme = !self.config.theme;
                    self.save_config();
                }
                self.render_next_alarm(ui, now);
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.button("+").on_hover_text("alarms").clicked() {
                        self.managing_alarms = true;
                    }
                });
            });
        });
    }

    fn render_next_alarm(&self, ui: &mut egui::Ui, now: &DateTime<Local>) {
        let Some(next) = self.board.next(now) else {
            return;
        };
        let when = match next.alarm.target {
            Target::Absolute(at) => at.with_timezone(&Local).format("%H:%M").to_string(),
            Target::Daily(time) => time.to_string(),
        };
        ui.label(RichText::new("Next:").weak());
        ui.label(RichText::new(when).monospace().strong());
        if let Some(label) = &next.alarm.label {
            ui.label(RichText::new(label).small().weak());
        }
        if next.alarm.webhook_url.is_some() {
            ui.colored_label(WEBHOOK_DOT, "●")
                .on_hover_text("Webhook enabled");
        }
    }

    fn render_clock(&self, ctx: &Context, now: &DateTime<Local>) {
        CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                let available = ui.available_size();
                let radius = (available.x.min(available.y - 80.) / 2.).clamp(60., 220.);
                ui.add_space(16.);
                ui.add(AnalogClock::new(now).radius(Some(radius)));
                ui.add_space(24.);
                ui.add(DigitalClock::new(now).size((radius / 8.).clamp(16., 28.)));
            });
        });
    }

    fn render_manager(&mut self, ctx: &Context) {
        let mut open = self.managing_alarms;
        Window::new("Alarms & Webhooks")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                if let EditingState::Done(alarm) = self.adding_alarm.render_alarm_editor(ui) {
                    self.board.add(alarm);
                }
                ui.separator();
                ui.label(RichText::new("UPCOMING").small().weak());
                ScrollArea::vertical()
                    .id_salt("alarms")
                    .max_height(320.)
                    .show(ui, |ui| self.list_alarms(ui));
            });
        self.managing_alarms = open;
    }

    fn list_alarms(&mut self, ui: &mut egui::Ui) {
        if self.board.alarms().is_empty() {
            ui.label(RichText::new("No alarms set.").italics().weak());
            return;
        }
        let mut removed = None;
        for alarm in self.board.alarms() {
            ui.horizontal(|ui| {
                if ui.button("x").on_hover_text("delete alarm").clicked() {
                    removed = Some(alarm.id);
                }
                ui.vertical(|ui| {
                    ui.label(
                        RichText::new(describe_target(alarm, &self.config.time_format))
                            .monospace()
                            .size(16.),
                    );
                    ui.horizontal(|ui| {
                        if alarm.webhook_url.is_some() {
                            ui.colored_label(WEBHOOK_DOT, "●");
                        }
                        ui.label(RichText::new(alarm.display_name()).small());
                        if alarm.is_triggered() {
                            ui.label(RichText::new("triggered").small().weak());
                        }
                    });
                });
            });
            ui.separator();
        }
        if let Some(id) = removed {
            self.board.remove(id);
        }
    }

    /// pulsing tint and the alarm message over everything while the notification lasts
    fn render_effect(&mut self, ctx: &Context) {
        let now = Instant::now();
        if !self
            .notification
            .as_ref()
            .is_some_and(|notification| notification.is_visible(now))
        {
            self.notification = None;
            return;
        }
        let Some(notification) = &self.notification else {
            return;
        };
        let pulse = (notification.remaining(now).as_secs_f32() * TAU).sin().mul_add(0.5, 0.5);
        let alpha = 30. + pulse * 40.;
        ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("alarm_tint")))
            .rect_filled(
                ctx.screen_rect(),
                0.0,
                Color32::from_rgba_unmultiplied(0xef, 0x44, 0x44, alpha as u8),
            );
        egui::Area::new(Id::new("alarm_effect"))
            .order(Order::Tooltip)
            .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
            .interactable(false)
            .show(ctx, |ui| {
                ui.label(
                    RichText::new(notification.message())
                        .size(56.)
                        .strong()
                        .color(Color32::WHITE),
                );
            });
    }

    fn save_config(&self) {
        if let Err(e) = self.config.save(&self.config_path) {
            error!("couldn't save config: {e}");
        }
    }
}

impl eframe::App for Clock {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // sample once per frame, the same reading drives the alarms and both faces
        let now = Local::now();
        self.check_alarms(&now);

        ctx.set_visuals(self.config.theme.into());
        self.render_header(ctx, &now);
        self.render_manager(ctx);
        self.render_clock(ctx, &now);
        self.render_effect(ctx);
        // always update so time keeping/alarm triggers are accurate
        ctx.request_repaint();
    }
}
