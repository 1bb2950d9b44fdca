//! Fixed menus and text rendering. Presentation only: nothing here touches
//! the store.

use spravy_core::message::{Menu, MenuButton};
use spravy_store::{DayBucket, ReminderInterval, TaskLists};

pub const CB_ADD_TODAY: &str = "add_today";
pub const CB_ADD_TOMORROW: &str = "add_tomorrow";
pub const CB_LIST_TASKS: &str = "list_tasks";

pub const GREETING: &str = "Привіт! Я бот для списку справ.\nОберіть дію:";
pub const CHOOSE_ACTION: &str = "Оберіть дію:";
pub const NO_TASKS: &str = "🗒 Немає справ.";
pub const REMIND_HELP: &str = "⏰ Як часто нагадувати про невиконані справи?\n\
                               /remind_1h – кожну годину\n\
                               /remind_2h – кожні 2 години\n\
                               /remind_off – не нагадувати";

/// The fixed three-option main menu.
pub fn main_menu() -> Menu {
    Menu {
        buttons: vec![
            MenuButton {
                label: "Додати справу на сьогодні".into(),
                data: CB_ADD_TODAY.into(),
            },
            MenuButton {
                label: "Додати справу на завтра".into(),
                data: CB_ADD_TOMORROW.into(),
            },
            MenuButton {
                label: "Переглянути заплановане".into(),
                data: CB_LIST_TASKS.into(),
            },
        ],
    }
}

/// Prompt shown after an "add task" selection.
pub fn add_prompt(bucket: DayBucket) -> &'static str {
    match bucket {
        DayBucket::Today => "Введіть справу на сьогодні:",
        DayBucket::Tomorrow => "Введіть справу на завтра:",
    }
}

/// Confirmation after a task is saved.
pub fn saved_confirmation(bucket: DayBucket, text: &str) -> String {
    match bucket {
        DayBucket::Today => format!("✅ Додано на сьогодні: {text}"),
        DayBucket::Tomorrow => format!("✅ Додано на завтра: {text}"),
    }
}

/// Confirmation after a reminder interval is stored.
pub fn reminder_confirmation(interval: ReminderInterval) -> String {
    let label = match interval {
        ReminderInterval::Hourly => "кожну годину",
        ReminderInterval::TwoHourly => "кожні 2 години",
        ReminderInterval::Off => "не нагадувати",
    };
    format!("🔔 Нагадування встановлено: {label}")
}

/// Render the task list: today section numbered 1..N, tomorrow section
/// numbered N+1..N+M. An empty list renders a fixed placeholder.
pub fn render_task_list(tasks: &TaskLists) -> String {
    let mut out = String::new();

    if !tasks.today.is_empty() {
        out.push_str("📅 Сьогодні:\n");
        let lines: Vec<String> = tasks
            .today
            .iter()
            .enumerate()
            .map(|(i, t)| format!("{}. {} {}", i + 1, done_glyph(t.done), t.text))
            .collect();
        out.push_str(&lines.join("\n"));
        out.push_str("\n\n");
    }

    if !tasks.tomorrow.is_empty() {
        out.push_str("📆 Завтра:\n");
        let offset = tasks.today.len();
        let lines: Vec<String> = tasks
            .tomorrow
            .iter()
            .enumerate()
            .map(|(i, t)| format!("{}. {} {}", offset + i + 1, done_glyph(t.done), t.text))
            .collect();
        out.push_str(&lines.join("\n"));
    }

    if out.is_empty() {
        out.push_str(NO_TASKS);
    }
    out
}

/// Compose the reminder push for incomplete tasks, or `None` when there is
/// nothing to remind about.
pub fn render_reminder(tasks: &TaskLists) -> Option<String> {
    let today = tasks.incomplete(DayBucket::Today);
    let tomorrow = tasks.incomplete(DayBucket::Tomorrow);
    if today.is_empty() && tomorrow.is_empty() {
        return None;
    }

    let mut out = String::from("🔔 Ви ще не виконали:\n");
    if !today.is_empty() {
        out.push_str("📅 Сьогодні:\n");
        let lines: Vec<String> = today.iter().map(|t| format!("❌ {t}")).collect();
        out.push_str(&lines.join("\n"));
        out.push('\n');
    }
    if !tomorrow.is_empty() {
        out.push_str("📆 Завтра:\n");
        let lines: Vec<String> = tomorrow.iter().map(|t| format!("❌ {t}")).collect();
        out.push_str(&lines.join("\n"));
    }
    Some(out)
}

fn done_glyph(done: bool) -> &'static str {
    if done {
        "✔️"
    } else {
        "❌"
    }
}
