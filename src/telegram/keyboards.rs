//! Inline keyboards of the customer and pro bots

use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeSet;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::core::types::{Category, Order};
use crate::telegram::callbacks::{CustomerCallback, DateChoice, ProCallback};

const CATEGORIES_PER_ROW: usize = 2;
const WEEK_DAYS: i64 = 7;
const WEEKDAYS_RU: [&str; 7] = ["Пн", "Вт", "Ср", "Чт", "Пт", "Сб", "Вс"];

fn customer_button(text: impl Into<String>, callback: CustomerCallback) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text, callback.encode())
}

fn pro_button(text: impl Into<String>, callback: ProCallback) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text, callback.encode())
}

fn cancel_button() -> InlineKeyboardButton {
    customer_button("Отмена", CustomerCallback::Home)
}

fn date_button(text: String, date: NaiveDate) -> InlineKeyboardButton {
    customer_button(text, CustomerCallback::Date(DateChoice::Day(date)))
}

/// Customer main menu: create request, callback, about
pub fn customer_main_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![customer_button("➕ Создать заявку", CustomerCallback::NewOrder)],
        vec![customer_button("📞 Обратный звонок", CustomerCallback::RequestCall)],
        vec![customer_button("ℹ️ О нас", CustomerCallback::About)],
    ])
}

/// A single "Cancel" button that returns to the main menu
pub fn cancel_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![cancel_button()]])
}

/// All categories, two per row, followed by "Cancel"
pub fn categories_keyboard() -> InlineKeyboardMarkup {
    let buttons: Vec<InlineKeyboardButton> = Category::all()
        .map(|c| customer_button(c.label(), CustomerCallback::Category(c)))
        .collect();

    let mut rows: Vec<Vec<InlineKeyboardButton>> =
        buttons.chunks(CATEGORIES_PER_ROW).map(|chunk| chunk.to_vec()).collect();
    rows.push(vec![cancel_button()]);
    InlineKeyboardMarkup::new(rows)
}

/// Short start date menu: today, tomorrow, the day after, "within a week"
pub fn dates_menu(today: NaiveDate) -> InlineKeyboardMarkup {
    let day = |offset: i64| today + Duration::days(offset);
    let label = |title: &str, date: NaiveDate| format!("{} ({})", title, date.format("%d.%m"));

    InlineKeyboardMarkup::new(vec![
        vec![date_button(label("Сегодня", day(0)), day(0))],
        vec![date_button(label("Завтра", day(1)), day(1))],
        vec![date_button(label("Послезавтра", day(2)), day(2))],
        vec![customer_button("📅 В течение недели", CustomerCallback::Date(DateChoice::Week))],
        vec![cancel_button()],
    ])
}

/// Seven days starting today, one per row, then "Back"
pub fn dates_week(today: NaiveDate) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = (0..WEEK_DAYS)
        .map(|offset| {
            let date = today + Duration::days(offset);
            let weekday = WEEKDAYS_RU[date.weekday().num_days_from_monday() as usize];
            vec![date_button(format!("{} {}", weekday, date.format("%d.%m")), date)]
        })
        .collect();
    rows.push(vec![customer_button("◀︎ Назад", CustomerCallback::Date(DateChoice::Back))]);
    InlineKeyboardMarkup::new(rows)
}

/// Pro bot menu: my categories, my phone, help
pub fn pro_main_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![pro_button("📋 Мои категории", ProCallback::ShowCategories)],
        vec![pro_button("📞 Мой телефон", ProCallback::ShowPhone)],
        vec![pro_button("ℹ️ Помощь", ProCallback::Help)],
    ])
}

/// One toggle per category (✅ marks the selected ones), then "Done"
pub fn pro_categories_keyboard(selected: &BTreeSet<Category>) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = Category::all()
        .map(|c| {
            let mark = if selected.contains(&c) { "✅ " } else { "" };
            vec![pro_button(format!("{}{}", mark, c.label()), ProCallback::ToggleCategory(c))]
        })
        .collect();
    rows.push(vec![pro_button("Готово", ProCallback::CategoriesDone)]);
    InlineKeyboardMarkup::new(rows)
}

/// "Take" / "Skip" buttons under an order card
pub fn order_card_keyboard(order: &Order) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        pro_button("👍 Беру", ProCallback::Take(order.id)),
        pro_button("👎 Пропустить", ProCallback::Skip(order.id)),
    ]])
}
