use std::fmt;

use chrono::{DateTime, TimeZone, Timelike};
use eframe::egui::{Align2, Color32, FontId, Response, RichText, Sense, Stroke, Ui, Vec2, Widget};

const SECOND_HAND: Color32 = Color32::from_rgb(0xef, 0x44, 0x44);
const MINUTE_HAND: Color32 = Color32::from_rgb(0x94, 0xa3, 0xb8);

/// angles of the clock hands in degrees, clockwise from 12
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandAngles {
    pub hour: f32,
    pub minute: f32,
    pub second: f32,
}

impl HandAngles {
    #[must_use]
    pub fn at(time: &impl Timelike) -> Self {
        let hours = (time.hour() % 12) as f32;
        let minutes = time.minute() as f32;
        let seconds = time.second() as f32;
        // leap seconds show up as nanoseconds past 1e9
        let millis = (time.nanosecond() / 1_000_000).min(999) as f32;
        Self {
            // the second hand sweeps instead of ticking
            second: (seconds + millis / 1000.) * 6.,
            minute: (minutes + seconds / 60.) * 6.,
            hour: (hours + minutes / 60.) * 30.,
        }
    }
}

/// clock face with hour numbers, minute dots and three hands
pub struct AnalogClock {
    angles: HandAngles,
    radius: Option<f32>,
}

impl AnalogClock {
    #[must_use]
    pub fn new(time: &impl Timelike) -> Self {
        Self {
            angles: HandAngles::at(time),
            radius: None,
        }
    }

    /// Set how big the clock should be, defaults to filling the space available
    #[must_use]
    pub const fn radius(mut self, radius: Option<f32>) -> Self {
        self.radius = radius;
        self
    }
}

impl Widget for AnalogClock {
    fn ui(self, ui: &mut Ui) -> Response {
        let Self { angles, radius } = self;

        let radius = radius.unwrap_or_else(|| {
            let available = ui.available_size();
            available.x.min(available.y) / 2.
        });
        let (rect, response) = ui.allocate_exact_size(Vec2::splat(radius * 2.), Sense::hover());
        let visuals = ui.visuals();
        let painter = ui.painter();
        let center = rect.center();
        // everything below is laid out on a dial 100 units in radius
        let unit = radius / 100.;
        // we subtract 90 to get 0 degrees at the top
        let point = |angle: f32, distance: f32| {
            center + Vec2::angled((angle - 90.).to_radians()) * distance * unit
        };

        painter.circle_filled(center, radius, visuals.extreme_bg_color);
        painter.circle_stroke(center, radius, visuals.widgets.noninteractive.bg_stroke);

        let text_color = visuals.text_color();
        for minute in (0..60).filter(|minute| minute % 5 != 0) {
            painter.circle_filled(
                point(minute as f32 * 6., 88.),
                0.8 * unit,
                text_color.gamma_multiply(0.5),
            );
        }
        for hour in 1..=12 {
            painter.text(
                point(hour as f32 * 30., 80.),
                Align2::CENTER_CENTER,
                hour.to_string(),
                FontId::monospace(14. * unit),
                text_color,
            );
        }

        painter.line_segment(
            [center, point(angles.hour, 45.)],
            Stroke::new(4. * unit, visuals.strong_text_color()),
        );
        painter.line_segment(
            [center, point(angles.minute, 70.)],
            Stroke::new(3. * unit, MINUTE_HAND),
        );
        // the second hand pokes out a little behind the pin
        painter.line_segment(
            [point(angles.second + 180., 10.), point(angles.second, 80.)],
            Stroke::new(1.5 * unit, SECOND_HAND),
        );
        painter.circle_filled(center, 3. * unit, SECOND_HAND);
        painter.circle_filled(center, 1.5 * unit, Color32::BLACK);
        response
    }
}

/// `YYYY-MM-DDTHH:MM:SS.mmm` readout
pub struct DigitalClock {
    date: String,
    time: String,
    millis: String,
    size: f32,
}

impl DigitalClock {
    #[must_use]
    pub fn new<Tz: TimeZone>(now: &DateTime<Tz>) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        Self {
            date: now.format("%Y-%m-%d").to_string(),
            time: now.format("%H:%M:%S").to_string(),
            millis: now.format("%3f").to_string(),
            size: 24.,
        }
    }

    /// font size of the readout
    #[must_use]
    pub const fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn readout(&self) -> String {
        format!("{}T{}.{}", self.date, self.time, self.millis)
    }
}

impl Widget for DigitalClock {
    fn ui(self, ui: &mut Ui) -> Response {
        let size = self.size;
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 0.;
            ui.label(RichText::new(self.date).monospace().size(size).weak());
            ui.label(RichText::new("T").monospace().size(size).weak());
            ui.label(RichText::new(self.time).monospace().size(size).strong());
            ui.label(RichText::new(".").monospace().size(size).weak());
            ui.label(RichText::new(self.millis).monospace().size(size).color(SECOND_HAND));
        })
        .response
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveTime, Utc};

    use super::*;

    fn angles(h: u32, m: u32, s: u32, milli: u32) -> HandAngles {
        HandAngles::at(&NaiveTime::from_hms_milli_opt(h, m, s, milli).unwrap())
    }

    #[test]
    fn hands_on_the_hour() {
        assert_eq!(
            angles(3, 0, 0, 0),
            HandAngles {
                hour: 90.,
                minute: 0.,
                second: 0.
            }
        );
        // noon and midnight both point straight up
        assert_eq!(angles(12, 0, 0, 0).hour, 0.);
        assert_eq!(angles(0, 0, 0, 0).hour, 0.);
    }

    #[test]
    fn hands_move_smoothly() {
        let angles = angles(6, 30, 30, 500);
        assert!((angles.second - 183.).abs() < 1e-3);
        assert!((angles.minute - 183.).abs() < 1e-3);
        assert!((angles.hour - 195.).abs() < 1e-3);
    }

    #[test]
    fn readout_size_is_adjustable() {
        let now = Utc::now();
        assert_eq!(DigitalClock::new(&now).size, 24.);
        assert_eq!(DigitalClock::new(&now).size(18.).size, 18.);
    }

    #[test]
    fn digital_readout_has_millis() {
        let now = Utc.with_ymd_and_hms(2023, 10, 5, 14, 30, 7).unwrap()
            + chrono::Duration::milliseconds(42);
        assert_eq!(DigitalClock::new(&now).readout(), "2023-10-05T14:30:07.042");
    }
}
