//! Hours/minutes/seconds input group for typing chapter start times.
//!
//! Each unit is a two-digit field. Arrow keys step a unit in place,
//! wrapping within its own range. Overflow typed into a unit (e.g. 75
//! seconds) is resolved by carrying into the next-significant unit, but
//! only at the commit point (Enter or focus loss), never per keystroke —
//! the same preview-then-commit split the timeline drag uses.

use crate::core::time::{constants, from_hms, to_hms, Time};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Hours,
    Minutes,
    Seconds,
}

impl Unit {
    fn max(self) -> Time {
        match self {
            Unit::Hours => 23,
            Unit::Minutes | Unit::Seconds => 59,
        }
    }

    fn hint(self) -> &'static str {
        match self {
            Unit::Hours => "hh",
            Unit::Minutes => "mm",
            Unit::Seconds => "ss",
        }
    }
}

#[derive(Debug, Clone)]
struct UnitField {
    unit: Unit,
    buffer: String,
}

impl UnitField {
    fn new(unit: Unit, value: Time) -> Self {
        Self {
            unit,
            buffer: format!("{:02}", value.min(unit.max())),
        }
    }

    /// Raw typed value; may exceed the unit's range until commit.
    fn raw_value(&self) -> Time {
        self.buffer.trim().parse().unwrap_or(0)
    }

    fn set(&mut self, value: Time) {
        self.buffer = format!("{:02}", value.min(self.unit.max()));
    }

    /// Arrow-key step, wrapping within the unit's own range.
    fn step(&mut self, delta: i64) {
        let span = self.unit.max() as i64 + 1;
        let next = (self.raw_value().min(self.unit.max()) as i64 + delta).rem_euclid(span);
        self.buffer = format!("{:02}", next);
    }
}

/// The composite input. Hours are only shown for videos an hour or
/// longer, mirroring the exported timestamp width.
#[derive(Debug, Clone)]
pub struct HmsInput {
    hours: Option<UnitField>,
    minutes: UnitField,
    seconds: UnitField,
}

impl HmsInput {
    pub fn new(show_hours: bool, value: Time) -> Self {
        let mut input = Self {
            hours: show_hours.then(|| UnitField::new(Unit::Hours, 0)),
            minutes: UnitField::new(Unit::Minutes, 0),
            seconds: UnitField::new(Unit::Seconds, 0),
        };
        input.set_from_seconds(value);
        input
    }

    /// Largest time the group can display.
    fn max_total(&self) -> Time {
        match self.hours {
            Some(_) => from_hms(23, 59, 59),
            None => from_hms(0, 59, 59),
        }
    }

    pub fn set_from_seconds(&mut self, total: Time) {
        let (hours, minutes, seconds) = to_hms(total.min(self.max_total()));
        if let Some(field) = &mut self.hours {
            field.set(hours);
        }
        self.minutes.set(minutes);
        self.seconds.set(seconds);
    }

    /// Resolve carries and normalize every field, returning the committed
    /// total. Overflow ripples upward (75s becomes +1 minute, 15s); the
    /// most significant unit saturates instead of wrapping.
    pub fn commit(&mut self) -> Time {
        let hours = self.hours.as_ref().map_or(0, UnitField::raw_value);
        let raw = hours * constants::SECONDS_PER_HOUR
            + self.minutes.raw_value() * constants::SECONDS_PER_MINUTE
            + self.seconds.raw_value();

        let total = raw.min(self.max_total());
        self.set_from_seconds(total);
        total
    }

    /// Render the group. Returns the committed time when any field just
    /// resolved (Enter or focus loss), `None` while editing continues.
    pub fn show(&mut self, ui: &mut egui::Ui, enabled: bool) -> Option<Time> {
        let mut committed = false;

        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 2.0;
            if let Some(field) = &mut self.hours {
                unit_field_ui(ui, field, enabled, &mut committed);
                ui.label(":");
            }
            unit_field_ui(ui, &mut self.minutes, enabled, &mut committed);
            ui.label(":");
            unit_field_ui(ui, &mut self.seconds, enabled, &mut committed);
        });

        committed.then(|| self.commit())
    }
}

fn unit_field_ui(ui: &mut egui::Ui, field: &mut UnitField, enabled: bool, committed: &mut bool) {
    let widget = egui::TextEdit::singleline(&mut field.buffer)
        .desired_width(22.0)
        .char_limit(2)
        .hint_text(field.unit.hint());
    let response = ui.add_enabled(enabled, widget);

    if response.changed() {
        field.buffer.retain(|c| c.is_ascii_digit());
    }

    if response.has_focus() {
        if ui.input(|i| i.key_pressed(egui::Key::ArrowUp)) {
            field.step(1);
        }
        if ui.input(|i| i.key_pressed(egui::Key::ArrowDown)) {
            field.step(-1);
        }
    }

    if response.lost_focus() {
        *committed = true;
    }
}
