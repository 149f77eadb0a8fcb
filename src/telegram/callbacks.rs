//! Callback data carried by inline buttons
//!
//! Telegram caps callback data at 64 bytes, so categories travel as their
//! list index rather than their (Cyrillic) label.

use chrono::NaiveDate;

use crate::core::types::Category;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Buttons of the customer bot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerCallback {
    NewOrder,
    RequestCall,
    About,
    Home,
    Category(Category),
    Date(DateChoice),
}

/// Buttons of the start date picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateChoice {
    Day(NaiveDate),
    /// Expand to the next seven days
    Week,
    /// Collapse back to the short menu
    Back,
}

impl CustomerCallback {
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "cb:new" => return Some(Self::NewOrder),
            "cb:call" => return Some(Self::RequestCall),
            "cb:about" => return Some(Self::About),
            "cb:home" => return Some(Self::Home),
            _ => {}
        }

        if let Some(index) = data.strip_prefix("cbcat:") {
            return parse_category(index).map(Self::Category);
        }

        let date = data.strip_prefix("cbdate:")?;
        let choice = match date {
            "week" => DateChoice::Week,
            "back" => DateChoice::Back,
            day => DateChoice::Day(NaiveDate::parse_from_str(day, DATE_FORMAT).ok()?),
        };
        Some(Self::Date(choice))
    }

    pub fn encode(&self) -> String {
        match self {
            Self::NewOrder => "cb:new".into(),
            Self::RequestCall => "cb:call".into(),
            Self::About => "cb:about".into(),
            Self::Home => "cb:home".into(),
            Self::Category(category) => format!("cbcat:{}", category.index()),
            Self::Date(DateChoice::Week) => "cbdate:week".into(),
            Self::Date(DateChoice::Back) => "cbdate:back".into(),
            Self::Date(DateChoice::Day(date)) => format!("cbdate:{}", date.format(DATE_FORMAT)),
        }
    }
}

/// Buttons of the pro bot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProCallback {
    ShowCategories,
    ShowPhone,
    Help,
    ToggleCategory(Category),
    CategoriesDone,
    Take(u64),
    Skip(u64),
    /// A take/skip button whose order id did not parse
    BadOrderRef,
}

impl ProCallback {
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "pro:cats" => return Some(Self::ShowCategories),
            "pro:phone" => return Some(Self::ShowPhone),
            "pro:help" => return Some(Self::Help),
            "pro:cats_ok" => return Some(Self::CategoriesDone),
            _ => {}
        }

        if let Some(index) = data.strip_prefix("procat:") {
            return parse_category(index).map(Self::ToggleCategory);
        }
        if let Some(id) = data.strip_prefix("take:") {
            return Some(id.parse().map(Self::Take).unwrap_or(Self::BadOrderRef));
        }
        if let Some(id) = data.strip_prefix("skip:") {
            return Some(id.parse().map(Self::Skip).unwrap_or(Self::BadOrderRef));
        }
        None
    }

    pub fn encode(&self) -> String {
        match self {
            Self::ShowCategories => "pro:cats".into(),
            Self::ShowPhone => "pro:phone".into(),
            Self::Help => "pro:help".into(),
            Self::CategoriesDone => "pro:cats_ok".into(),
            Self::ToggleCategory(category) => format!("procat:{}", category.index()),
            Self::Take(id) => format!("take:{}", id),
            Self::Skip(id) => format!("skip:{}", id),
            Self::BadOrderRef => "take:?".into(),
        }
    }
}

fn parse_category(index: &str) -> Option<Category> {
    index.parse::<usize>().ok().and_then(Category::from_index)
}
